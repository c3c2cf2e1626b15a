//! Search quota counter
//!
//! Each search spends one unit. At zero the caller must replenish the quota
//! (the rewarded-unlock flow) before searching again.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::{KeywordError, KeywordResult};
use crate::storage::{read_json, write_json, KvStore, StorageResult};

pub const QUOTA_KEY: &str = "search_quota";

pub struct QuotaStore {
    store: Arc<dyn KvStore>,
    default_quota: u32,
    write_lock: Mutex<()>,
}

impl QuotaStore {
    pub fn new(store: Arc<dyn KvStore>, default_quota: u32) -> Self {
        Self {
            store,
            default_quota,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> StorageResult<u32> {
        Ok(read_json::<u32>(self.store.as_ref(), QUOTA_KEY)
            .await?
            .unwrap_or(self.default_quota))
    }

    pub async fn remaining(&self) -> u32 {
        match self.read().await {
            Ok(remaining) => remaining,
            Err(e) => {
                warn!(error = %e, "Failed to read search quota");
                self.default_quota
            }
        }
    }

    /// Spend one search, returning what is left
    pub async fn consume(&self) -> KeywordResult<u32> {
        let _guard = self.write_lock.lock().await;

        let remaining = self.read().await?;
        if remaining == 0 {
            return Err(KeywordError::QuotaExhausted);
        }

        let next = remaining - 1;
        write_json(self.store.as_ref(), QUOTA_KEY, &next).await?;
        Ok(next)
    }

    /// Grant a full quota again
    pub async fn replenish(&self) -> StorageResult<u32> {
        self.set(self.default_quota).await
    }

    pub async fn set(&self, remaining: u32) -> StorageResult<u32> {
        let _guard = self.write_lock.lock().await;
        write_json(self.store.as_ref(), QUOTA_KEY, &remaining).await?;
        Ok(remaining)
    }
}
