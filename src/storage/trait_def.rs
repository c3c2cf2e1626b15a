use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value persistence provider holding JSON-encoded text values
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> StorageResult<()>;

    /// Get the raw value stored under a key
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or replace the value stored under a key
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key, returning whether it existed
    async fn remove(&self, key: &str) -> StorageResult<bool>;

    /// List every stored key in ascending order
    async fn list_keys(&self) -> StorageResult<Vec<String>>;

    /// Remove every stored key
    async fn clear(&self) -> StorageResult<()>;
}
