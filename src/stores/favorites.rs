use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{normalize_keyword, KeywordAnalysis};
use crate::storage::{read_json, write_json, KvStore, StorageResult};
use crate::stores::load_list;

pub const FAVORITES_KEY: &str = "keyword_favorites";

/// Saved analyses, most recently favorited first
pub struct FavoritesStore {
    store: Arc<dyn KvStore>,
    limit: usize,
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KvStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> Vec<KeywordAnalysis> {
        load_list(self.store.as_ref(), FAVORITES_KEY).await
    }

    pub async fn contains(&self, keyword: &str) -> bool {
        let key = normalize_keyword(keyword);
        self.load().await.iter().any(|fav| fav.key() == key)
    }

    /// Remove the analysis if its keyword is already saved, otherwise save it
    /// at the front. Returns the persisted list.
    pub async fn toggle(&self, analysis: KeywordAnalysis) -> StorageResult<Vec<KeywordAnalysis>> {
        let _guard = self.write_lock.lock().await;

        let mut favorites: Vec<KeywordAnalysis> = read_json(self.store.as_ref(), FAVORITES_KEY)
            .await?
            .unwrap_or_default();

        let key = analysis.key();
        let before = favorites.len();
        favorites.retain(|fav| fav.key() != key);

        if favorites.len() == before {
            favorites.insert(0, analysis);
            favorites.truncate(self.limit);
        }

        write_json(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;
        Ok(favorites)
    }

    pub async fn clear(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(FAVORITES_KEY).await?;
        Ok(())
    }
}
