//! Category listing.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    catalog::{normalize_category, Catalog},
    error::LookupError,
    metrics::LookupMetrics,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    pub category: String,
    pub items: Vec<String>,
}

pub struct CategoryResolver {
    catalog: Arc<Catalog>,
    metrics: Arc<LookupMetrics>,
}

impl CategoryResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            metrics: Arc::new(LookupMetrics::new()),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LookupMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Members of `category`, matched trimmed and case-insensitively.
    ///
    /// Members are returned verbatim; they are not checked against the
    /// equipment table.
    pub fn get_category_equipment(&self, category: &str) -> Result<CategoryListing, LookupError> {
        let category = normalize_category(category);
        let result = match self.catalog.category(&category) {
            Some(items) if !items.is_empty() => Ok(CategoryListing {
                category,
                items: items.to_vec(),
            }),
            _ => Err(LookupError::UnknownCategory(category)),
        };

        self.metrics.record_category(result.is_ok());
        if let Err(err) = &result {
            debug!(error = %err, "Category lookup missed");
        }
        result
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.catalog.category_names()
    }
}

/// Wire shape of a category read: the listing, or `{error}`.
pub fn category_payload(result: &Result<CategoryListing, LookupError>) -> Value {
    match result {
        Ok(listing) => json!({
            "category": listing.category,
            "items": listing.items,
        }),
        Err(err) => json!({ "error": err.to_string() }),
    }
}
