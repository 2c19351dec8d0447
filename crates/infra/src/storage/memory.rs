use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{KeyValueStorage, StorageError};

/// In-memory storage for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: RwLock<HashMap<(bool, String), String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across both scopes.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get(&self, key: &str, durable: bool) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        Ok(map.get(&(durable, key.to_string())).cloned())
    }

    async fn set(&self, key: &str, value: &str, durable: bool) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".to_string()))?;
        map.insert((durable, key.to_string()), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scopes_are_independent() {
        let storage = InMemoryStorage::new();
        storage.set("inv_items", "[1]", true).await.unwrap();
        storage.set("inv_items", "[2]", false).await.unwrap();

        assert_eq!(storage.get("inv_items", true).await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.get("inv_items", false).await.unwrap().as_deref(), Some("[2]"));
        assert_eq!(storage.get("inv_tx", true).await.unwrap(), None);
        assert_eq!(storage.len(), 2);
    }
}
