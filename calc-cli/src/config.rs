//! Application configuration loaded from an optional TOML file.
//!
//! ```toml
//! log_level = "warn"
//! log_file = "calc.log"
//! history_capacity = 100
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "calc.db"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calc_core::history::DEFAULT_CAPACITY;
use calc_core::store::StoreConfig;
use serde::Deserialize;
use tracing::debug;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "calc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// EnvFilter directive, e.g. `"info"` or `"calc_core=debug"`.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub store: StoreConfig,
    /// Entries kept in the scientific calculator history.
    pub history_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_file: None,
            store: StoreConfig::default(),
            history_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("invalid configuration")?;
        if config.history_capacity == 0 {
            anyhow::bail!("history_capacity must be at least 1");
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("in '{}'", path.display()))
    }

    /// Loads `explicit` if given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    debug!(path = %fallback.display(), "using default config file");
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn default_store_is_memory() {
        let config = AppConfig::default();

        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.history_capacity, 100);
    }

    #[test]
    fn full_file_parses() {
        let config = AppConfig::from_toml_str(
            r#"
log_level = "debug"
log_file = "/tmp/calc.log"
history_capacity = 25

[store]
backend = "sqlite"
connection_string = "calc.db"
"#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/calc.log")));
        assert_eq!(config.history_capacity, 25);
        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.connection_string, "calc.db");
    }

    #[test]
    fn partial_store_table_keeps_other_defaults() {
        let config = AppConfig::from_toml_str("[store]\nbackend = \"sqlite\"\n").unwrap();

        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.connection_string, "");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(AppConfig::from_toml_str("colour = \"blue\"").is_err());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(AppConfig::from_toml_str("history_capacity = 0").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/calc.toml")));

        assert!(result.is_err());
    }
}
