//! # In-Memory Store
//!
//! A `KeyValueStore` that lives and dies with the process. Used by tests
//! and by sessions configured with the `memory` backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageResult;
use crate::store::KeyValueStore;

/// Process-local key-value map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with one entry.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStore {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("nope").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::with_item("k", "old");
        store.set_item("k", "new").await.unwrap();

        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.len().await, 1);
    }
}
