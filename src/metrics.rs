//! Lookup metrics.
//!
//! Lock-free counters for each resolution tier plus fetch latency. They never
//! influence lookup results; the binary logs a snapshot on shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::resolver::LookupSource;

pub struct LookupMetrics {
    // Equipment lookups
    total_lookups: AtomicU64,
    local_hits: AtomicU64,
    cache_hits: AtomicU64,
    fetched: AtomicU64,
    failed_lookups: AtomicU64,

    // External fetches
    fetch_errors: AtomicU64,
    fetch_latency: LatencyStats,

    // Category reads
    category_hits: AtomicU64,
    category_misses: AtomicU64,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self {
            total_lookups: AtomicU64::new(0),
            local_hits: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            fetched: AtomicU64::new(0),
            failed_lookups: AtomicU64::new(0),
            fetch_errors: AtomicU64::new(0),
            fetch_latency: LatencyStats::new(),
            category_hits: AtomicU64::new(0),
            category_misses: AtomicU64::new(0),
        }
    }

    /// Record a finished lookup: `Some(source)` on success, `None` on error.
    pub fn record_lookup(&self, source: Option<LookupSource>) {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        let counter = match source {
            Some(LookupSource::Local) => &self.local_hits,
            Some(LookupSource::Cache) => &self.cache_hits,
            Some(LookupSource::Wikipedia) => &self.fetched,
            None => &self.failed_lookups,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one call to the summary fetcher.
    pub fn record_fetch(&self, success: bool, duration_ms: u64) {
        if !success {
            self.fetch_errors.fetch_add(1, Ordering::Relaxed);
        }
        self.fetch_latency.record(duration_ms);
    }

    pub fn record_category(&self, found: bool) {
        if found {
            self.category_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.category_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_lookups: self.total_lookups.load(Ordering::Relaxed),
            local_hits: self.local_hits.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            failed_lookups: self.failed_lookups.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            category_hits: self.category_hits.load(Ordering::Relaxed),
            category_misses: self.category_misses.load(Ordering::Relaxed),
            fetch_latency: self.fetch_latency.snapshot(),
        }
    }
}

impl Default for LookupMetrics {
    fn default() -> Self {
        Self::new()
    }
}

struct LatencyStats {
    count: AtomicU64,
    total_ms: AtomicU64,
    min_ms: AtomicU64,
    max_ms: AtomicU64,
}

impl LatencyStats {
    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            total_ms: AtomicU64::new(0),
            min_ms: AtomicU64::new(u64::MAX),
            max_ms: AtomicU64::new(0),
        }
    }

    fn record(&self, ms: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ms.fetch_add(ms, Ordering::Relaxed);
        self.min_ms.fetch_min(ms, Ordering::Relaxed);
        self.max_ms.fetch_max(ms, Ordering::Relaxed);
    }

    fn snapshot(&self) -> LatencySnapshot {
        let count = self.count.load(Ordering::Relaxed);
        let total = self.total_ms.load(Ordering::Relaxed);
        let min = self.min_ms.load(Ordering::Relaxed);

        LatencySnapshot {
            count,
            avg_ms: if count > 0 { total / count } else { 0 },
            min_ms: if min == u64::MAX { 0 } else { min },
            max_ms: self.max_ms.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub total_lookups: u64,
    pub local_hits: u64,
    pub cache_hits: u64,
    pub fetched: u64,
    pub failed_lookups: u64,
    pub fetch_errors: u64,
    pub category_hits: u64,
    pub category_misses: u64,
    pub fetch_latency: LatencySnapshot,
}

impl MetricsSnapshot {
    /// Share of successful lookups served without a network call, in percent.
    pub fn offline_rate(&self) -> f64 {
        let served = self.local_hits + self.cache_hits + self.fetched;
        if served == 0 {
            100.0
        } else {
            ((self.local_hits + self.cache_hits) as f64 / served as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencySnapshot {
    pub count: u64,
    pub avg_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}
