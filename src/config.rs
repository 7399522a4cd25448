//! Server configuration.
//!
//! Everything is optional: an absent config file means the built-in catalog,
//! a `cache.json` file cache in the working directory, and English Wikipedia.
//! Command-line flags are applied on top via [`ConfigOverrides`].

use std::path::{Path, PathBuf};

use cache_store::{CacheBackend, CacheStoreConfig};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::{
    catalog::Catalog,
    error::{ConfigError, ConfigResult},
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// YAML equipment catalog replacing the built-in table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub cache: CacheStoreConfig,

    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Wikipedia summary fetcher settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FetcherConfig {
    /// Full MediaWiki API endpoint; overrides `language` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Wikipedia language edition, e.g. "en", "fr"
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Intro sentences kept in a summary (MediaWiki caps this at 10)
    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: u32,

    /// Resolve names through Wikipedia's search suggestion first
    #[serde(default = "default_true")]
    pub auto_suggest: bool,

    /// Per-request timeout. Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    format!("defense-tech-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn default_summary_sentences() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            language: default_language(),
            user_agent: default_user_agent(),
            summary_sentences: default_summary_sentences(),
            auto_suggest: true,
            timeout_secs: None,
        }
    }
}

impl FetcherConfig {
    /// Resolve the MediaWiki API endpoint.
    pub fn api_endpoint(&self) -> Result<Url, String> {
        let raw = match &self.api_url {
            Some(url) => url.trim().to_string(),
            None => format!("https://{}.wikipedia.org/w/api.php", self.language.trim()),
        };
        let url = Url::parse(&raw).map_err(|e| format!("invalid api_url '{raw}': {e}"))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(format!("unsupported api_url scheme: {scheme}")),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_none() {
            let lang = self.language.trim();
            if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(format!("invalid wikipedia language: '{}'", self.language));
            }
        }
        self.api_endpoint()?;

        if !(1..=10).contains(&self.summary_sentences) {
            return Err(format!(
                "summary_sentences must be between 1 and 10, got {}",
                self.summary_sentences
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Values supplied on the command line, applied over the file config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub cache_backend: Option<CacheBackend>,
    pub cache_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub async fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.catalog_path {
            self.catalog_path = Some(path);
        }
        if let Some(backend) = overrides.cache_backend {
            self.cache.backend = backend;
        }
        if let Some(path) = overrides.cache_path {
            self.cache.path = path;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.cache.validate().map_err(ConfigError::Invalid)?;
        self.fetcher.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Build the equipment catalog: the configured file, or the built-in table.
    pub async fn load_catalog(&self) -> ConfigResult<Catalog> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::from_file(path).await?;
                info!(
                    path = %path.display(),
                    equipment = catalog.equipment_count(),
                    "Loaded equipment catalog"
                );
                catalog
            }
            None => Catalog::builtin(),
        };
        catalog.warn_dangling_members();
        Ok(catalog)
    }
}
