use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use calc_core::{KeyValueStore, StoreError};

/// Connection strings that select an ephemeral database.
const IN_MEMORY: [&str; 3] = ["", ":memory:", "sqlite::memory:"];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database named by `connection_string`: a `sqlite:` URL, a
    /// bare file path (created if missing), or `:memory:`.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = if IN_MEMORY.contains(&connection_string) {
            // every pooled connection to :memory: is a separate database
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .context("Failed to open in-memory database")?
        } else {
            let options = if connection_string.starts_with("sqlite:") {
                SqliteConnectOptions::from_str(connection_string)
                    .with_context(|| format!("Invalid database URL: {connection_string}"))?
            } else {
                SqliteConnectOptions::new().filename(Path::new(connection_string))
            };
            SqlitePoolOptions::new()
                .connect_with(options.create_if_missing(true))
                .await
                .with_context(|| format!("Failed to connect to database: {connection_string}"))?
        };
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(|r| r.try_get::<Vec<u8>, _>("value"))
            .transpose()
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: &[u8],
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!(key, bytes = value.len(), "kv_store upsert");
        Ok(())
    }

    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use calc_core::history::{CALCULATOR_HISTORY_KEY, DEFAULT_CAPACITY, load_history, save_history};
    use calc_core::History;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn setup_test_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let store = SqliteStore::new_with_pool(pool).await;
        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = setup_test_store().await;

        assert_eq!(store.get("absent").await, Ok(None));
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let store = setup_test_store().await;

        store.set("k", b"first").await.unwrap();
        store.set("k", b"second").await.unwrap();

        assert_eq!(store.get("k").await, Ok(Some(b"second".to_vec())));
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn set_records_timestamp() {
        let store = setup_test_store().await;
        store.set("k", b"v").await.unwrap();

        let updated_at: String = sqlx::query_scalar("SELECT updated_at FROM kv_store WHERE key = 'k'")
            .fetch_one(store.pool())
            .await
            .unwrap();

        assert!(chrono::DateTime::parse_from_rfc3339(&updated_at).is_ok());
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let store = setup_test_store().await;
        store.set("k", b"v").await.unwrap();

        assert_eq!(store.delete("k").await, Ok(()));
        assert_eq!(store.get("k").await, Ok(None));
        assert_eq!(store.delete("k").await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn history_round_trip() {
        let store = setup_test_store().await;
        let mut history = History::calculator();
        history.push("sqrt(16) = 4");
        history.push("2 ^ 10 = 1024");

        save_history(&store, &history).await;
        let loaded = load_history(&store, CALCULATOR_HISTORY_KEY, DEFAULT_CAPACITY).await;

        assert_eq!(loaded.entries(), history.entries());
    }

    #[tokio::test]
    async fn new_accepts_memory_alias() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.run_migrations().await.unwrap();

        store.set("k", b"v").await.unwrap();
        assert_eq!(store.get("k").await, Ok(Some(b"v".to_vec())));
    }
}
