//! Owned store handle with an explicit lifecycle.
//!
//! [`FlightStore`] holds the single connection used for the lifetime of the
//! process. The schema, record, and query layers borrow it, so they cannot
//! outlive the store. [`close`](FlightStore::close) reports errors from
//! closing; dropping the store closes the connection silently, which covers
//! early returns and error paths.

use std::path::Path;

use flightdesk_core::{MissingRowPolicy, StoreConfig};
use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::migration::Migration;
use crate::query::FlightQuery;
use crate::records::Records;

/// Connection-level options taken from a [`StoreConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Enforce foreign-key constraints.
    pub foreign_keys: bool,
    /// Behavior of updates and deletes that match no row.
    pub missing_rows: MissingRowPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            missing_rows: MissingRowPolicy::Ignore,
        }
    }
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            foreign_keys: config.foreign_keys,
            missing_rows: config.missing_rows,
        }
    }
}

/// Handle owning the database connection.
///
/// # Examples
///
/// ```no_run
/// use flightdesk_core::StoreConfig;
/// use flightdesk_sqlite::FlightStore;
///
/// let store = FlightStore::open(&StoreConfig::default()).unwrap();
/// store.migration().reset().unwrap();
/// println!("{} pilots", store.query().pilots().unwrap().len());
/// store.close().unwrap();
/// ```
pub struct FlightStore {
    conn: Connection,
    options: StoreOptions,
}

impl FlightStore {
    /// Opens (creating if needed) the database file named by the config.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::open_path(&config.database, StoreOptions::from(config))
    }

    /// Opens the database file at `path`.
    pub fn open_path(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        Self::from_connection(Connection::open(path)?, options)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(options: StoreOptions) -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, options)
    }

    /// Wraps an existing connection, applying the foreign-key setting.
    pub fn from_connection(conn: Connection, options: StoreOptions) -> Result<Self> {
        let pragma = if options.foreign_keys {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = OFF;"
        };
        conn.execute_batch(pragma)?;
        Ok(Self { conn, options })
    }

    /// Schema lifecycle and seeding.
    pub fn migration(&self) -> Migration<'_> {
        Migration::new(&self.conn)
    }

    /// Inserts, updates and deletes.
    pub fn records(&self) -> Records<'_> {
        Records::new(&self.conn, self.options.missing_rows)
    }

    /// Reads and reports.
    pub fn query(&self) -> FlightQuery<'_> {
        FlightQuery::new(&self.conn)
    }

    /// The options this store was opened with.
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Returns `true` if SQLite is currently enforcing foreign keys.
    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        let enabled: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        Ok(enabled == 1)
    }

    /// Closes the connection, reporting any failure.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| StoreError::from(err))?;
        debug!("database closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_follow_options() {
        let store = FlightStore::open_in_memory(StoreOptions::default()).unwrap();
        assert!(store.foreign_keys_enabled().unwrap());

        let store = FlightStore::open_in_memory(StoreOptions {
            foreign_keys: false,
            ..Default::default()
        })
        .unwrap();
        assert!(!store.foreign_keys_enabled().unwrap());
        assert!(!store.options().foreign_keys);
    }

    #[test]
    fn test_options_from_config() {
        let config = StoreConfig {
            foreign_keys: false,
            missing_rows: MissingRowPolicy::Error,
            ..Default::default()
        };
        assert_eq!(
            StoreOptions::from(&config),
            StoreOptions {
                foreign_keys: false,
                missing_rows: MissingRowPolicy::Error,
            }
        );
    }

    #[test]
    fn test_file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            database: dir.path().join("flights.db"),
            ..Default::default()
        };

        let store = FlightStore::open(&config).unwrap();
        store.migration().reset().unwrap();
        store.close().unwrap();

        let store = FlightStore::open(&config).unwrap();
        assert_eq!(store.migration().status().unwrap().flight_count, 15);
        store.close().unwrap();
    }
}
