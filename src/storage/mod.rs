pub mod memory;
pub mod response_cache;
pub mod sqlite;
pub mod trait_def;

pub use memory::MemoryStore;
pub use response_cache::{ResponseCache, CACHE_PREFIX};
pub use sqlite::SqliteStore;
pub use trait_def::{KvStore, StorageError, StorageResult};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Read and decode a JSON value, clearing the key if the stored text is malformed.
///
/// Backend failures are returned; a corrupt value is reported as absent.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed stored value");
            if let Err(remove_err) = store.remove(key).await {
                warn!(key, error = %remove_err, "Failed to remove malformed stored value");
            }
            Ok(None)
        }
    }
}

/// Encode a value as JSON and store it under `key` in a single write
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Other(e.into()))?;
    store.set(key, &raw).await
}

/// Open and initialize the configured storage backend
pub async fn open_store(
    config: &crate::config::StorageConfig,
) -> anyhow::Result<std::sync::Arc<dyn KvStore>> {
    use crate::config::StorageBackend;
    use std::sync::Arc;

    let store: Arc<dyn KvStore> = match config.backend {
        StorageBackend::Sqlite => {
            tracing::info!("Using SQLite storage: {}", config.url);
            Arc::new(SqliteStore::new(&config.url, config.max_connections).await?)
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage; data will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };

    store.init().await?;
    Ok(store)
}
