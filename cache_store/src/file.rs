//! JSON file cache backend.
//!
//! The whole mapping lives in a single human-readable file: 4-space indent,
//! UTF-8, non-ASCII characters written as-is. Every `load` re-reads the file
//! and every `save` rewrites it in full, so the latest persisted state is
//! always what a fresh process sees.

use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use super::core::*;

#[derive(Debug, Clone)]
pub struct JsonFileCacheStore {
    path: PathBuf,
}

impl JsonFileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CacheStoreError {
        CacheStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn to_pretty_json(entries: &CacheMap) -> CacheResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut serializer)?;
    Ok(buf)
}

/// Stage `bytes` in a fresh temp file next to `path`, then rename it over
/// `path`. Each call gets its own staging file, so overlapping saves never
/// share one.
fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn load(&self) -> CacheResult<CacheMap> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache file yet, starting empty");
                return Ok(CacheMap::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&content).map_err(|source| CacheStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, entries: &CacheMap) -> CacheResult<()> {
        let bytes = to_pretty_json(entries)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&path, &bytes))
            .await
            .map_err(|e| self.io_error(std::io::Error::other(e)))?
            .map_err(|e| self.io_error(e))?;

        debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "Cache file rewritten"
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
