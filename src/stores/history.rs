use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::SearchHistoryEntry;
use crate::storage::{read_json, write_json, KvStore, StorageResult};
use crate::stores::load_list;

pub const HISTORY_KEY: &str = "keyword_history";

/// Most-recent-first search history, de-duplicated by keyword
pub struct HistoryStore {
    store: Arc<dyn KvStore>,
    limit: usize,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KvStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> Vec<SearchHistoryEntry> {
        load_list(self.store.as_ref(), HISTORY_KEY).await
    }

    /// Move `entry` to the front, dropping any older entry for the same keyword,
    /// and return the persisted list.
    pub async fn record(&self, entry: SearchHistoryEntry) -> StorageResult<Vec<SearchHistoryEntry>> {
        let _guard = self.write_lock.lock().await;

        let current: Vec<SearchHistoryEntry> = read_json(self.store.as_ref(), HISTORY_KEY)
            .await?
            .unwrap_or_default();

        let key = entry.key();
        let mut next = Vec::with_capacity(self.limit.min(current.len() + 1));
        next.push(entry);
        next.extend(current.into_iter().filter(|item| item.key() != key));
        next.truncate(self.limit);

        write_json(self.store.as_ref(), HISTORY_KEY, &next).await?;
        Ok(next)
    }

    pub async fn clear(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(HISTORY_KEY).await?;
        Ok(())
    }
}
