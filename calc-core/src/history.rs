//! Capped, newest-first calculation history.
//!
//! The history is a convenience cache: it is persisted as a JSON array of
//! strings under a fixed key in a [`KeyValueStore`], overwritten wholesale on
//! every save. Read failures yield an empty history and write failures are
//! logged and dropped; neither ever reaches a calculation.

use tracing::{debug, warn};

use crate::store::repository::KeyValueStore;

/// Store key of the scientific calculator's history.
pub const CALCULATOR_HISTORY_KEY: &str = "calculatorHistory";
/// Store key of the password generator's history.
pub const PASSWORD_HISTORY_KEY: &str = "passwordHistory";
/// Store key of the random number generator's history.
pub const RANDOM_HISTORY_KEY: &str = "randomNumberHistory";

/// Entries kept for the scientific calculator.
pub const DEFAULT_CAPACITY: usize = 100;
/// Entries kept for the generator pages.
pub const GENERATOR_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    key: String,
    capacity: usize,
    entries: Vec<String>,
}

impl History {
    pub fn new(
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            key: key.into(),
            capacity,
            entries: Vec::new(),
        }
    }

    /// Empty scientific-calculator history (100 entries).
    pub fn calculator() -> Self {
        Self::new(CALCULATOR_HISTORY_KEY, DEFAULT_CAPACITY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry at the front, dropping the oldest beyond capacity.
    pub fn push(
        &mut self,
        entry: impl Into<String>,
    ) {
        self.entries.insert(0, entry.into());
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// JSON array encoding used in the store.
    pub fn to_json(&self) -> Vec<u8> {
        // Serializing a Vec<String> cannot fail.
        serde_json::to_vec(&self.entries).unwrap_or_else(|_| b"[]".to_vec())
    }

    /// Decodes a stored array, keeping at most `capacity` entries.
    pub fn from_json(
        key: impl Into<String>,
        capacity: usize,
        bytes: &[u8],
    ) -> Result<Self, serde_json::Error> {
        let mut entries: Vec<String> = serde_json::from_slice(bytes)?;
        entries.truncate(capacity);
        Ok(Self {
            key: key.into(),
            capacity,
            entries,
        })
    }
}

/// Loads a history, treating a missing, unreadable or corrupt entry as empty.
pub async fn load_history(
    store: &dyn KeyValueStore,
    key: &str,
    capacity: usize,
) -> History {
    match store.get(key).await {
        Ok(Some(bytes)) => History::from_json(key, capacity, &bytes).unwrap_or_else(|error| {
            warn!(key, %error, "discarding corrupt history");
            History::new(key, capacity)
        }),
        Ok(None) => History::new(key, capacity),
        Err(error) => {
            warn!(key, %error, "history read failed");
            History::new(key, capacity)
        }
    }
}

/// Persists a history. Failures are logged and otherwise ignored.
pub async fn save_history(
    store: &dyn KeyValueStore,
    history: &History,
) {
    match store.set(history.key(), &history.to_json()).await {
        Ok(()) => debug!(key = history.key(), entries = history.len(), "history saved"),
        Err(error) => warn!(key = history.key(), %error, "history write failed"),
    }
}
