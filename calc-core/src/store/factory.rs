//! Picks the history backend named in the configuration.
//!
//! Each backend crate contributes a [`StoreFactory`]; the binary lists them
//! once in a [`StoreRegistry`] and opens whichever one `[store] backend`
//! names. Names are matched case-insensitively, so `--backend SQLite` works.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::repository::{KeyValueStore, StoreError};

/// The `[store]` table of the configuration file.
///
/// | backend  | location                   |
/// |----------|----------------------------|
/// | `memory` | ignored                    |
/// | `sqlite` | `calc.db`, `:memory:`      |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: String,
    /// Where the backend keeps its data; empty for `memory`.
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl StoreConfig {
    /// Histories that last for one run only.
    pub fn memory() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: String::new(),
        }
    }

    /// Histories kept in a SQLite file (or `":memory:"`).
    pub fn sqlite(location: impl Into<String>) -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: location.into(),
        }
    }

    fn location(&self) -> &str {
        self.connection_string.trim()
    }
}

/// Opens one kind of [`KeyValueStore`].
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Lowercase name used in `[store] backend`.
    fn backend_name(&self) -> &'static str;

    /// Whether the backend refuses an empty `connection_string`.
    fn needs_location(&self) -> bool {
        false
    }

    /// Opens the store at `location`, creating it (and its schema) if needed.
    async fn open(&self, location: &str) -> Result<Box<dyn KeyValueStore>, StoreError>;
}

/// The backends a binary was built with, in registration order.
#[derive(Default)]
pub struct StoreRegistry {
    factories: Vec<Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A later factory with the same name wins.
    pub fn with(
        mut self,
        factory: impl StoreFactory + 'static,
    ) -> Self {
        let name = factory.backend_name();
        self.factories.retain(|f| f.backend_name() != name);
        self.factories.push(Box::new(factory));
        self
    }

    pub fn backends(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.backend_name()).collect()
    }

    fn find(
        &self,
        name: &str,
    ) -> Option<&dyn StoreFactory> {
        let name = name.trim();
        self.factories
            .iter()
            .find(|f| f.backend_name().eq_ignore_ascii_case(name))
            .map(|f| &**f)
    }

    /// Opens the backend `config` names.
    ///
    /// # Errors
    /// * [`StoreError::Configuration`] for an unknown backend, or an empty
    ///   location where the backend needs one.
    /// * Whatever the backend reports while opening.
    pub async fn open(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let factory = self.find(&config.backend).ok_or_else(|| {
            StoreError::Configuration(format!(
                "unknown history backend '{}'; choose one of: {}",
                config.backend,
                self.backends().join(", ")
            ))
        })?;

        let location = config.location();
        if factory.needs_location() && location.is_empty() {
            return Err(StoreError::Configuration(format!(
                "the {} backend needs a connection_string, e.g. calc.db",
                factory.backend_name()
            )));
        }

        debug!(backend = factory.backend_name(), location, "opening history store");
        factory.open(location).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::memory::MemoryStore;

    /// Records every location it is asked to open.
    struct RecordingFactory {
        name: &'static str,
        needs_location: bool,
        opened: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingFactory {
        fn new(
            name: &'static str,
            needs_location: bool,
        ) -> (Self, Arc<Mutex<Vec<String>>>) {
            let opened = Arc::new(Mutex::new(Vec::new()));
            let factory = Self {
                name,
                needs_location,
                opened: opened.clone(),
            };
            (factory, opened)
        }
    }

    #[async_trait]
    impl StoreFactory for RecordingFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        fn needs_location(&self) -> bool {
            self.needs_location
        }

        async fn open(&self, location: &str) -> Result<Box<dyn KeyValueStore>, StoreError> {
            self.opened.lock().unwrap().push(location.to_string());
            Ok(Box::new(MemoryStore::new()))
        }
    }

    struct UnreachableFactory;

    #[async_trait]
    impl StoreFactory for UnreachableFactory {
        fn backend_name(&self) -> &'static str {
            "remote"
        }

        async fn open(&self, location: &str) -> Result<Box<dyn KeyValueStore>, StoreError> {
            Err(StoreError::Connection(format!("{location} unreachable")))
        }
    }

    #[test]
    fn default_config_keeps_history_in_memory() {
        assert_eq!(StoreConfig::default(), StoreConfig::memory());
        assert_eq!(StoreConfig::sqlite("calc.db").backend, "sqlite");
    }

    #[test]
    fn backends_keep_registration_order_and_replace_duplicates() {
        let (memory, _) = RecordingFactory::new("memory", false);
        let (first_sqlite, _) = RecordingFactory::new("sqlite", true);
        let (second_sqlite, _) = RecordingFactory::new("sqlite", true);

        let registry = StoreRegistry::new()
            .with(first_sqlite)
            .with(memory)
            .with(second_sqlite);

        assert_eq!(registry.backends(), vec!["memory", "sqlite"]);
    }

    #[tokio::test]
    async fn open_passes_trimmed_location_to_matching_backend() {
        let (memory, memory_opened) = RecordingFactory::new("memory", false);
        let (sqlite, sqlite_opened) = RecordingFactory::new("sqlite", true);
        let registry = StoreRegistry::new().with(memory).with(sqlite);

        registry
            .open(&StoreConfig {
                backend: " SQLite ".to_string(),
                connection_string: "  history.db ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(*sqlite_opened.lock().unwrap(), vec!["history.db".to_string()]);
        assert!(memory_opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_backend_without_location_is_a_configuration_error() {
        let (sqlite, opened) = RecordingFactory::new("sqlite", true);
        let registry = StoreRegistry::new().with(sqlite);

        let err = registry.open(&StoreConfig::sqlite("   ")).await.err();

        assert!(matches!(err, Some(StoreError::Configuration(msg)) if msg.contains("calc.db")));
        assert!(opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_backend_ignores_empty_location() {
        let (memory, opened) = RecordingFactory::new("memory", false);
        let registry = StoreRegistry::new().with(memory);

        assert!(registry.open(&StoreConfig::memory()).await.is_ok());
        assert_eq!(*opened.lock().unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn unknown_backend_lists_the_choices() {
        let (memory, _) = RecordingFactory::new("memory", false);
        let (sqlite, _) = RecordingFactory::new("sqlite", true);
        let registry = StoreRegistry::new().with(memory).with(sqlite);

        let config = StoreConfig {
            backend: "redis".to_string(),
            ..StoreConfig::memory()
        };

        match registry.open(&config).await {
            Err(StoreError::Configuration(msg)) => assert_eq!(
                msg,
                "unknown history backend 'redis'; choose one of: memory, sqlite"
            ),
            other => panic!("expected Configuration error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn backend_failure_is_passed_through() {
        let registry = StoreRegistry::new().with(UnreachableFactory);
        let config = StoreConfig {
            backend: "remote".to_string(),
            connection_string: "db.example".to_string(),
        };

        let err = registry.open(&config).await.err();

        assert_eq!(err, Some(StoreError::Connection("db.example unreachable".to_string())));
    }
}
