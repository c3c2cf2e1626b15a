use crate::storage::{KvStore, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
}

impl SqliteStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn other(e: sqlx::Error) -> StorageError {
    StorageError::Other(e.into())
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn init(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value FROM kv_store
            WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now_millis())
        .execute(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(self.pool.as_ref())
            .await
            .map_err(other)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_keys(&self) -> StorageResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(other)?;

        Ok(keys)
    }

    async fn clear(&self) -> StorageResult<()> {
        sqlx::query("DELETE FROM kv_store")
            .execute(self.pool.as_ref())
            .await
            .map_err(other)?;

        Ok(())
    }
}
