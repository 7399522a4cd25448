//! Cache backend configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Cache backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    File,
    Memory,
    None,
}

impl std::str::FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CacheBackend::File),
            "memory" => Ok(CacheBackend::Memory),
            "none" => Ok(CacheBackend::None),
            other => Err(format!(
                "unknown cache backend '{other}' (expected file, memory or none)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStoreConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Location of the JSON cache file (file backend only)
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("cache.json")
}

impl CacheStoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == CacheBackend::File && self.path.as_os_str().is_empty() {
            return Err("cache path must not be empty for the file backend".to_string());
        }
        Ok(())
    }
}

impl Default for CacheStoreConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            path: default_cache_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheStoreConfig::default();
        assert_eq!(config.backend, CacheBackend::File);
        assert_eq!(config.path, PathBuf::from("cache.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_backend_names() {
        let config: CacheStoreConfig =
            serde_yaml::from_str("backend: memory").expect("parse yaml");
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.path, PathBuf::from("cache.json"));

        let config: CacheStoreConfig =
            serde_yaml::from_str("backend: none\npath: /tmp/x.json").expect("parse yaml");
        assert_eq!(config.backend, CacheBackend::None);
        assert_eq!(config.path, PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("FILE".parse::<CacheBackend>(), Ok(CacheBackend::File));
        assert_eq!(" memory ".parse::<CacheBackend>(), Ok(CacheBackend::Memory));
        assert!("redis".parse::<CacheBackend>().is_err());
    }

    #[test]
    fn test_empty_path_rejected_for_file_backend() {
        let config = CacheStoreConfig {
            backend: CacheBackend::File,
            path: PathBuf::new(),
        };
        assert!(config.validate().is_err());

        let config = CacheStoreConfig {
            backend: CacheBackend::Memory,
            path: PathBuf::new(),
        };
        assert!(config.validate().is_ok());
    }
}
