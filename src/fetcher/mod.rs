//! Summary fetcher boundary.
//!
//! The lookup resolver only sees [`SummaryFetcher::fetch_summary`] and its
//! three failure kinds; whatever the implementation does on the wire stays
//! behind this trait.

mod wikipedia;

use async_trait::async_trait;
use cache_store::CacheEntry;

pub use wikipedia::WikipediaFetcher;

/// Most alternative titles reported for an ambiguous name.
pub const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The name maps to a disambiguation page.
    #[error("ambiguous title, candidates: {0:?}")]
    Ambiguous(Vec<String>),

    #[error("no page found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait SummaryFetcher: Send + Sync + 'static {
    /// Fetch a short summary and the canonical page URL for `name`.
    async fn fetch_summary(&self, name: &str) -> Result<CacheEntry, FetchError>;
}
