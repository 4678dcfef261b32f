use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::document::{DocumentStore, StorageError};

/// Process-local store, mainly for tests. Writes can be made to fail on demand
/// to exercise persistence error paths.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, Value>>,
    fail_writes: AtomicBool,
    save_count: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_document(self, key: &str, document: Value) -> Self {
        self.documents.write().await.insert(key.to_string(), document);
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self, key: &str) -> Option<Value> {
        self.documents.read().await.get(key).cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("writes to '{}' are disabled", key)));
        }

        self.documents.write().await.insert(key.to_string(), document.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
