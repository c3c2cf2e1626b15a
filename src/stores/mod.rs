//! Persisted user state: search history, favorites, quota, and preferences
//!
//! Each store does a read-modify-write against the key-value store with a
//! single write per mutation. Writers inside one process are serialized by a
//! per-store lock; separate processes sharing a database are not coordinated.

pub mod favorites;
pub mod history;
pub mod preferences;
pub mod quota;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use history::{HistoryStore, HISTORY_KEY};
pub use preferences::{PreferenceStore, SELECTED_PROVIDER_KEY};
pub use quota::{QuotaStore, QUOTA_KEY};

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::storage::{read_json, KvStore};

/// Load a persisted list for display. Backend failures are logged and read as empty.
pub(crate) async fn load_list<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Vec<T> {
    match read_json::<Vec<T>>(store, key).await {
        Ok(list) => list.unwrap_or_default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted list");
            Vec::new()
        }
    }
}
