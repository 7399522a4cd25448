//! Defense equipment lookup service exposed over the Model Context Protocol.
//!
//! ## Modules
//!
//! - [`catalog`]: static equipment table and category index
//! - [`fetcher`]: external summary fetcher boundary (Wikipedia)
//! - [`resolver`]: three-tier equipment lookup and category listing
//! - [`server`]: MCP tool/resource surface
//!
//! The persisted summary cache lives in the `cache_store` crate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod metrics;
pub mod resolver;
pub mod server;

pub use catalog::{Catalog, EquipmentRecord, RangeKm};
pub use config::{ConfigOverrides, FetcherConfig, ServerConfig};
pub use error::{ConfigError, LookupError};
pub use fetcher::{FetchError, SummaryFetcher, WikipediaFetcher};
pub use metrics::{LookupMetrics, MetricsSnapshot};
pub use resolver::{
    category_payload, CategoryListing, CategoryResolver, LookupResolver, LookupResult,
    LookupSource,
};
pub use server::DefenseTechServer;
