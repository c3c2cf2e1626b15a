use crate::storage::{KvStore, StorageResult};
use async_trait::async_trait;
use dashmap::DashMap;

/// Process-local store, used for ephemeral sessions and tests
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn list_keys(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear(&self) -> StorageResult<()> {
        self.entries.clear();
        Ok(())
    }
}
