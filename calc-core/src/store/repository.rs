use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Byte-oriented key-value store injected into whatever needs persisted
/// state. Compute functions never see it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been set (or was deleted).
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Inserts or overwrites the value under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Removes `key`; [`StoreError::NotFound`] if it was absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
