use async_trait::async_trait;
use tracing::info;

use calc_core::store::StoreFactory;
use calc_core::{KeyValueStore, StoreError};

use crate::store::SqliteStore;

/// The `"sqlite"` backend. Histories survive between runs.
///
/// ```rust,no_run
/// use calc_core::store::{MemoryStoreFactory, StoreRegistry};
/// use calc_store_sqlite::SqliteStoreFactory;
///
/// let registry = StoreRegistry::new()
///     .with(MemoryStoreFactory)
///     .with(SqliteStoreFactory);
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn needs_location(&self) -> bool {
        true
    }

    /// Opens the database at `location` and runs pending migrations.
    ///
    /// Accepted values: a bare file path such as `"calc.db"` (created if it
    /// does not exist), a `sqlite:` URL, or `":memory:"`.
    async fn open(&self, location: &str) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteStore::new(location)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Database(format!("{e:#}")))?;
        info!(location, "sqlite history store ready");
        Ok(Box::new(store))
    }
}
