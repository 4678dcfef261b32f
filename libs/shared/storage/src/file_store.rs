// libs/shared/storage/src/file_store.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::document::{DocumentStore, StorageError};

/// Stores each document as a pretty-printed JSON file under a data directory.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.data_dir.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key);
        debug!("Loading document from {}", path.display());

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Document {} does not exist yet", path.display());
                return Ok(None);
            }
            Err(source) => {
                error!("Failed to read {}: {}", path.display(), source);
                return Err(StorageError::Io { key: key.to_string(), source });
            }
        };

        let value = serde_json::from_slice(&raw).map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })?;

        Ok(Some(value))
    }

    async fn save(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(document).map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })?;

        let io_err = |source| StorageError::Io { key: key.to_string(), source };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        // Write to a sibling file first so a crash never leaves a truncated ledger
        tokio::fs::write(&tmp_path, &body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|source| {
            error!("Failed to replace {}: {}", path.display(), source);
            StorageError::Io { key: key.to_string(), source }
        })?;

        debug!("Saved document {} ({} bytes)", path.display(), body.len());
        Ok(())
    }
}
