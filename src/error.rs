//! Error types.
//!
//! `LookupError` is the taxonomy surfaced to callers as `{"error": ...}`
//! payloads; `ConfigError` covers startup (config and catalog loading).

use cache_store::CacheStoreError;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Weapon name must not be empty")]
    EmptyName,

    /// The name resolved to a disambiguation page.
    #[error("Too many results for '{name}'. Try one of: {}", format_candidates(.candidates))]
    AmbiguousName {
        name: String,
        candidates: Vec<String>,
    },

    #[error("No Wikipedia page found for: {0}")]
    NameNotFound(String),

    #[error("Unexpected error: {0}")]
    UnexpectedFetchFailure(String),

    #[error("No equipment found for category: {0}")]
    UnknownCategory(String),

    /// The persisted cache exists but is not valid cache data.
    #[error("Cache is unreadable: {0}")]
    CorruptCache(#[source] CacheStoreError),

    /// The persisted cache could not be read at all (permissions, I/O).
    #[error("Failed to read cache: {0}")]
    CacheRead(#[source] CacheStoreError),

    #[error("Failed to persist cache: {0}")]
    CacheWrite(#[source] CacheStoreError),
}

impl LookupError {
    /// Stable machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::EmptyName => "empty_name",
            LookupError::AmbiguousName { .. } => "ambiguous_name",
            LookupError::NameNotFound(_) => "name_not_found",
            LookupError::UnexpectedFetchFailure(_) => "unexpected_fetch_failure",
            LookupError::UnknownCategory(_) => "unknown_category",
            LookupError::CorruptCache(_) => "corrupt_cache",
            LookupError::CacheRead(_) => "cache_read",
            LookupError::CacheWrite(_) => "cache_write",
        }
    }
}

/// Render candidate titles as a bracketed, quoted list: `['A', 'B']`.
fn format_candidates(candidates: &[String]) -> String {
    let quoted: Vec<String> = candidates.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
