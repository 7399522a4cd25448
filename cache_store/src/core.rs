// core.rs
//
// Core types for the cache store: the persisted entry, the full mapping,
// the error type and the backend trait.

use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A previously fetched summary for one equipment name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub summary: String,
    pub url: String,
}

impl CacheEntry {
    pub fn new(summary: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            url: url.into(),
        }
    }
}

/// Full cache contents, keyed by the trimmed equipment name.
///
/// Ordered so that the persisted file is stable across rewrites.
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Result alias for cache store operations
pub type CacheResult<T> = Result<T, CacheStoreError>;

/// Error type for cache store operations
#[derive(Debug, thiserror::Error)]
pub enum CacheStoreError {
    #[error("Cache file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheStoreError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CacheStoreError::Corrupt { .. })
    }
}

/// Whole-mapping persistence contract.
///
/// `load` returns the complete persisted mapping (empty when nothing has been
/// persisted yet). `save` replaces the persisted mapping with `entries`.
/// Backends make no attempt to serialize concurrent load-modify-save cycles;
/// the last `save` wins.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    async fn load(&self) -> CacheResult<CacheMap>;

    async fn save(&self, entries: &CacheMap) -> CacheResult<()>;

    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}
