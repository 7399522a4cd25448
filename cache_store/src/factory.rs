//! Backend factory.

use std::sync::Arc;

use tracing::info;

use crate::{
    config::{CacheBackend, CacheStoreConfig},
    core::CacheStore,
    file::JsonFileCacheStore,
    memory::MemoryCacheStore,
    noop::NoOpCacheStore,
};

/// Build the cache store selected by `config`.
pub fn create_cache_store(config: &CacheStoreConfig) -> Result<Arc<dyn CacheStore>, String> {
    config.validate()?;

    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::File => {
            info!(path = %config.path.display(), "Using JSON file cache");
            Arc::new(JsonFileCacheStore::new(config.path.clone()))
        }
        CacheBackend::Memory => {
            info!("Using in-memory cache");
            Arc::new(MemoryCacheStore::new())
        }
        CacheBackend::None => {
            info!("Cache persistence disabled");
            Arc::new(NoOpCacheStore::new())
        }
    };

    Ok(store)
}
