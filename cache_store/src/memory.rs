//! In-memory cache backend

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::core::*;

/// Process-local cache; contents vanish with the process.
#[derive(Default, Clone)]
pub struct MemoryCacheStore {
    inner: Arc<RwLock<CacheMap>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries.
    pub fn with_entries(entries: CacheMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self) -> CacheResult<CacheMap> {
        Ok(self.inner.read().clone())
    }

    async fn save(&self, entries: &CacheMap) -> CacheResult<()> {
        *self.inner.write() = entries.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
