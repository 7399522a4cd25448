//! Cache store for previously fetched equipment summaries.
//!
//! Provides a `load`/`save` key-value store keyed by equipment name.
//!
//! Supported backends:
//! - File (default, JSON on disk)
//! - Memory
//! - None (no-op)

pub mod config;
mod core;
mod factory;
mod file;
mod memory;
mod noop;

pub use core::{CacheEntry, CacheMap, CacheResult, CacheStore, CacheStoreError};

pub use config::{CacheBackend, CacheStoreConfig};
pub use factory::create_cache_store;
pub use file::JsonFileCacheStore;
pub use memory::MemoryCacheStore;
pub use noop::NoOpCacheStore;
