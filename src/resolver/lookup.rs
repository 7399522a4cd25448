//! Equipment lookup: static table, then cache, then the summary fetcher.

use std::{sync::Arc, time::Instant};

use cache_store::{CacheEntry, CacheStore};
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::{
    catalog::{Catalog, EquipmentRecord},
    error::LookupError,
    fetcher::{FetchError, SummaryFetcher, MAX_CANDIDATES},
    metrics::LookupMetrics,
};

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    Local,
    Cache,
    Wikipedia,
}

impl LookupSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Local => "local",
            LookupSource::Cache => "cache",
            LookupSource::Wikipedia => "wikipedia",
        }
    }
}

impl std::fmt::Display for LookupSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`LookupResolver::tech_info`].
///
/// Serializes to a flat object: `{source, weapon, ...fields}` on success,
/// `{error}` on failure.
#[derive(Debug)]
pub enum LookupResult {
    Local {
        weapon: String,
        record: EquipmentRecord,
    },
    Cached {
        weapon: String,
        entry: CacheEntry,
    },
    Fetched {
        weapon: String,
        entry: CacheEntry,
    },
    Error(LookupError),
}

impl LookupResult {
    pub fn source(&self) -> Option<LookupSource> {
        match self {
            LookupResult::Local { .. } => Some(LookupSource::Local),
            LookupResult::Cached { .. } => Some(LookupSource::Cache),
            LookupResult::Fetched { .. } => Some(LookupSource::Wikipedia),
            LookupResult::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LookupResult::Error(_))
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupResult::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct SuccessPayload<'a, T: Serialize> {
    source: LookupSource,
    weapon: &'a str,
    #[serde(flatten)]
    fields: &'a T,
}

#[derive(Serialize)]
struct ErrorPayload {
    error: String,
}

impl Serialize for LookupResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LookupResult::Local { weapon, record } => SuccessPayload {
                source: LookupSource::Local,
                weapon,
                fields: record,
            }
            .serialize(serializer),
            LookupResult::Cached { weapon, entry } => SuccessPayload {
                source: LookupSource::Cache,
                weapon,
                fields: entry,
            }
            .serialize(serializer),
            LookupResult::Fetched { weapon, entry } => SuccessPayload {
                source: LookupSource::Wikipedia,
                weapon,
                fields: entry,
            }
            .serialize(serializer),
            LookupResult::Error(err) => ErrorPayload {
                error: err.to_string(),
            }
            .serialize(serializer),
        }
    }
}

/// Three-tier equipment lookup.
///
/// The cache's load-modify-save cycle is not serialized: two concurrent misses
/// for different names can both load the same snapshot, and the later `save`
/// drops the earlier one's entry. That entry is simply fetched again on its
/// next lookup.
pub struct LookupResolver {
    catalog: Arc<Catalog>,
    cache: Arc<dyn CacheStore>,
    fetcher: Arc<dyn SummaryFetcher>,
    metrics: Arc<LookupMetrics>,
}

impl LookupResolver {
    pub fn new(
        catalog: Arc<Catalog>,
        cache: Arc<dyn CacheStore>,
        fetcher: Arc<dyn SummaryFetcher>,
    ) -> Self {
        Self {
            catalog,
            cache,
            fetcher,
            metrics: Arc::new(LookupMetrics::new()),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LookupMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<LookupMetrics> {
        &self.metrics
    }

    /// Resolve `name` (trimmed, case-sensitive) to equipment information.
    ///
    /// Never fails: every error is folded into [`LookupResult::Error`].
    pub async fn tech_info(&self, name: &str) -> LookupResult {
        let weapon = name.trim();
        let result = self.resolve(weapon).await;
        self.metrics.record_lookup(result.source());

        match &result {
            LookupResult::Error(err) => warn!(
                weapon = %weapon,
                error_kind = err.kind(),
                error = %err,
                "Equipment lookup failed"
            ),
            other => {
                if let Some(source) = other.source() {
                    info!(weapon = %weapon, source = %source, "Equipment lookup resolved");
                }
            }
        }
        result
    }

    async fn resolve(&self, weapon: &str) -> LookupResult {
        if weapon.is_empty() {
            return LookupResult::Error(LookupError::EmptyName);
        }

        if let Some(record) = self.catalog.equipment(weapon) {
            return LookupResult::Local {
                weapon: weapon.to_string(),
                record: record.clone(),
            };
        }

        let mut cache = match self.cache.load().await {
            Ok(cache) => cache,
            Err(e) if e.is_corrupt() => {
                return LookupResult::Error(LookupError::CorruptCache(e));
            }
            Err(e) => return LookupResult::Error(LookupError::CacheRead(e)),
        };
        if let Some(entry) = cache.get(weapon) {
            return LookupResult::Cached {
                weapon: weapon.to_string(),
                entry: entry.clone(),
            };
        }

        debug!(weapon = %weapon, "Not in table or cache, fetching summary");
        let started = Instant::now();
        let fetched = self.fetcher.fetch_summary(weapon).await;
        self.metrics
            .record_fetch(fetched.is_ok(), started.elapsed().as_millis() as u64);

        match fetched {
            Ok(entry) => {
                cache.insert(weapon.to_string(), entry.clone());
                if let Err(e) = self.cache.save(&cache).await {
                    return LookupResult::Error(LookupError::CacheWrite(e));
                }
                LookupResult::Fetched {
                    weapon: weapon.to_string(),
                    entry,
                }
            }
            Err(FetchError::Ambiguous(mut candidates)) => {
                candidates.truncate(MAX_CANDIDATES);
                LookupResult::Error(LookupError::AmbiguousName {
                    name: weapon.to_string(),
                    candidates,
                })
            }
            Err(FetchError::NotFound) => {
                LookupResult::Error(LookupError::NameNotFound(weapon.to_string()))
            }
            Err(FetchError::Other(message)) => {
                LookupResult::Error(LookupError::UnexpectedFetchFailure(message))
            }
        }
    }
}
