use std::path::PathBuf;

use cache_store::CacheBackend;
use clap::Parser;
use defense_tech::{
    logging::{init_logging, LoggingConfig},
    ConfigOverrides, DefenseTechServer, ServerConfig,
};
use rmcp::{transport::stdio, ServiceExt};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "defense-tech",
    version,
    about = "MCP server answering defense equipment lookups over stdio"
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "DEFENSE_TECH_CONFIG")]
    config: Option<PathBuf>,

    /// YAML equipment catalog replacing the built-in table
    #[arg(long, env = "DEFENSE_TECH_CATALOG")]
    catalog: Option<PathBuf>,

    /// Cache backend: file, memory or none
    #[arg(long, env = "DEFENSE_TECH_CACHE_BACKEND")]
    cache_backend: Option<CacheBackend>,

    /// Cache file location (file backend)
    #[arg(long, env = "DEFENSE_TECH_CACHE_PATH")]
    cache_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "DEFENSE_TECH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "DEFENSE_TECH_LOG_JSON")]
    log_json: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            catalog_path: self.catalog.clone(),
            cache_backend: self.cache_backend,
            cache_path: self.cache_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    })?;

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path).await?,
        None => ServerConfig::default(),
    }
    .with_overrides(cli.overrides());

    let server = DefenseTechServer::from_config(&config).await?;
    let metrics = server.metrics().clone();

    info!(version = env!("CARGO_PKG_VERSION"), "Serving DefenseTech over stdio");
    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| error!(error = %e, "Failed to start MCP service"))?;
    let reason = service.waiting().await?;

    let snapshot = metrics.snapshot();
    info!(
        reason = ?reason,
        lookups = snapshot.total_lookups,
        local = snapshot.local_hits,
        cache = snapshot.cache_hits,
        wikipedia = snapshot.fetched,
        failed = snapshot.failed_lookups,
        offline_pct = snapshot.offline_rate(),
        fetch_avg_ms = snapshot.fetch_latency.avg_ms,
        categories_found = snapshot.category_hits,
        categories_missed = snapshot.category_misses,
        "DefenseTech server stopped"
    );
    Ok(())
}
