// libs/shared/storage/src/document.rs
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on document '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable documents addressed by a fixed key. Documents are always read and
/// written whole; there are no partial or delta writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `None` when no document has been stored under `key` yet.
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn save(&self, key: &str, document: &Value) -> Result<(), StorageError>;
}

/// Loads a document and decodes it, falling back to `T::default()` when the
/// document does not exist.
pub async fn load_typed<T>(store: &dyn DocumentStore, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    match store.load(key).await? {
        Some(value) => serde_json::from_value(value).map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        }),
        None => Ok(T::default()),
    }
}

pub async fn save_typed<T>(store: &dyn DocumentStore, key: &str, data: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(data).map_err(|source| StorageError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &value).await
}
