//! NoOp cache implementation
//!
//! Used when persistence is disabled: nothing is ever remembered, so every
//! name missing from the static table goes to the summary fetcher.

use async_trait::async_trait;

use super::core::*;

#[derive(Default, Debug, Clone, Copy)]
pub struct NoOpCacheStore;

impl NoOpCacheStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStore for NoOpCacheStore {
    async fn load(&self) -> CacheResult<CacheMap> {
        Ok(CacheMap::new())
    }

    async fn save(&self, _entries: &CacheMap) -> CacheResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
