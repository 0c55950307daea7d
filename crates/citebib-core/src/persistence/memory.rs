//! In-memory snapshot store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SnapshotStore;
use crate::error::PersistenceError;

/// Clones share the same underlying map
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
