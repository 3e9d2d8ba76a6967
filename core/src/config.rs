//! Store configuration.
//!
//! Controls which database file is used and how strictly the record layer
//! treats integrity and missing rows. Every field has a default, so a partial
//! or absent file yields a working configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! database: flight_management.db
//! foreign_keys: true
//! missing_rows: ignore
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database file used when none is configured.
pub const DEFAULT_DATABASE: &str = "flight_management.db";

/// Errors reading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// What updates and deletes do when no row matches the given key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRowPolicy {
    /// Report zero affected rows and succeed.
    #[default]
    Ignore,
    /// Fail with a not-found error.
    Error,
}

/// Configuration for opening a flight store.
///
/// # Examples
///
/// ```
/// use flightdesk_core::{MissingRowPolicy, StoreConfig};
///
/// let config = StoreConfig::default();
/// assert!(config.foreign_keys);
/// assert_eq!(config.missing_rows, MissingRowPolicy::Ignore);
/// assert_eq!(config.database.to_str(), Some("flight_management.db"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file, created on first open.
    pub database: PathBuf,
    /// Enforce foreign-key constraints on every statement.
    pub foreign_keys: bool,
    /// Behavior of updates and deletes that match no row.
    pub missing_rows: MissingRowPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            foreign_keys: true,
            missing_rows: MissingRowPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or
    /// [`ConfigError::YamlError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads configuration from `path`, or returns defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if updates and deletes on missing rows must fail.
    pub fn is_strict(&self) -> bool {
        self.missing_rows == MissingRowPolicy::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: StoreConfig = serde_yaml::from_str("missing_rows: error\n").unwrap();
        assert!(config.is_strict());
        assert!(config.foreign_keys);
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(serde_yaml::from_str::<StoreConfig>("missing_rows: maybe\n").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flightdesk.yml");

        let config = StoreConfig {
            database: dir.path().join("flights.db"),
            foreign_keys: false,
            missing_rows: MissingRowPolicy::Error,
        };
        config.save(&path).unwrap();

        assert_eq!(StoreConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load_or_default(dir.path().join("absent.yml")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            StoreConfig::load(dir.path().join("absent.yml")),
            Err(ConfigError::IoError(_))
        ));
    }
}
