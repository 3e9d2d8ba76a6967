//! Lifecycle operations for the flight tables.
//!
//! Provides [`Migration`] for creating, dropping, resetting, and seeding the
//! three tables. Every operation runs inside a transaction, so a failure
//! part-way through leaves the previous state intact.
//!
//! # Example
//!
//! ```no_run
//! use flightdesk_core::StoreConfig;
//! use flightdesk_sqlite::FlightStore;
//!
//! let store = FlightStore::open(&StoreConfig::default()).unwrap();
//! let migration = store.migration();
//!
//! // Drop whatever was there and create empty tables
//! migration.initialize().unwrap();
//!
//! // Load the sample destinations, pilots and flights
//! let report = migration.seed().unwrap();
//! assert_eq!(report.flights_inserted, 15);
//!
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! ```

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::schema::{TABLES, generate_drop_sql, generate_schema_sql};
use crate::seed;

/// Manages the lifecycle of the flight tables on a borrowed connection.
///
/// [`initialize`](Self::initialize) is destructive: it drops existing
/// tables before recreating them. [`up`](Self::up) only creates what is
/// missing.
pub struct Migration<'a> {
    conn: &'a Connection,
}

impl<'a> Migration<'a> {
    /// Creates a migration manager for the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Drops any existing tables and creates empty ones.
    ///
    /// All prior data is destroyed. Failures propagate to the caller and
    /// leave the database as it was.
    pub fn initialize(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(generate_drop_sql())?;
        tx.execute_batch(generate_schema_sql())?;
        tx.commit()?;
        info!("flight tables initialized");
        Ok(())
    }

    /// Creates any tables and indexes that do not exist yet.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS` so it is safe to call repeatedly.
    pub fn up(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(generate_schema_sql())?;
        tx.commit()?;
        Ok(())
    }

    /// Drops all tables in reverse dependency order.
    ///
    /// Uses `DROP TABLE IF EXISTS` so it is safe on an empty database.
    pub fn down(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(generate_drop_sql())?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts the fixed sample destinations, pilots, and flights.
    ///
    /// Must run after [`initialize`](Self::initialize) or [`up`](Self::up).
    /// Seeding again without resetting duplicates every row; nothing
    /// prevents it.
    pub fn seed(&self) -> Result<SeedReport> {
        let tx = self.conn.unchecked_transaction()?;
        let report = seed::insert_sample_data(&tx)?;
        tx.commit()?;
        info!(
            destinations = report.destinations_inserted,
            pilots = report.pilots_inserted,
            flights = report.flights_inserted,
            "sample data seeded"
        );
        Ok(report)
    }

    /// Initializes the tables and seeds them.
    ///
    /// Equivalent to [`initialize`](Self::initialize) followed by
    /// [`seed`](Self::seed).
    pub fn reset(&self) -> Result<SeedReport> {
        self.initialize()?;
        self.seed()
    }

    /// Returns whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus::default());
        }

        Ok(MigrationStatus {
            tables_exist: true,
            destination_count: self.count_rows("destinations")?,
            pilot_count: self.count_rows("pilots")?,
            flight_count: self.count_rows("flights")?,
        })
    }

    /// Checks whether all three tables exist.
    fn tables_exist(&self) -> Result<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2, ?3)",
        )?;
        let count: i64 = stmt.query_row(TABLES, |row| row.get(0))?;
        Ok(count == TABLES.len() as i64)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let mut stmt = self.conn.prepare(&format!("SELECT COUNT(*) FROM {table}"))?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Snapshot of the tables returned by [`Migration::status`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether all three tables exist.
    pub tables_exist: bool,
    pub destination_count: usize,
    pub pilot_count: usize,
    pub flight_count: usize,
}

/// Rows inserted by [`Migration::seed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub destinations_inserted: usize,
    pub pilots_inserted: usize,
    pub flights_inserted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    #[test]
    fn test_status_on_empty_database() {
        let conn = connection();
        let status = Migration::new(&conn).status().unwrap();
        assert!(!status.tables_exist);
        assert_eq!(status.flight_count, 0);
    }

    #[test]
    fn test_initialize_and_status() {
        let conn = connection();
        let migration = Migration::new(&conn);
        migration.initialize().unwrap();
        assert_eq!(
            migration.status().unwrap(),
            MigrationStatus {
                tables_exist: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_initialize_discards_existing_rows() {
        let conn = connection();
        let migration = Migration::new(&conn);
        migration.initialize().unwrap();
        migration.seed().unwrap();
        assert_eq!(migration.status().unwrap().flight_count, 15);

        migration.initialize().unwrap();
        let status = migration.status().unwrap();
        assert!(status.tables_exist);
        assert_eq!(status.destination_count, 0);
        assert_eq!(status.pilot_count, 0);
        assert_eq!(status.flight_count, 0);
    }

    #[test]
    fn test_up_is_idempotent_and_keeps_rows() {
        let conn = connection();
        let migration = Migration::new(&conn);
        migration.up().unwrap();
        migration.seed().unwrap();
        migration.up().unwrap();
        assert_eq!(migration.status().unwrap().pilot_count, 15);
    }

    #[test]
    fn test_down_removes_tables() {
        let conn = connection();
        let migration = Migration::new(&conn);
        migration.down().unwrap(); // Nothing to drop yet
        migration.up().unwrap();
        migration.down().unwrap();
        assert!(!migration.status().unwrap().tables_exist);
    }

    #[test]
    fn test_seed_counts() {
        let conn = connection();
        let migration = Migration::new(&conn);
        let report = migration.reset().unwrap();
        assert_eq!(
            report,
            SeedReport {
                destinations_inserted: 15,
                pilots_inserted: 15,
                flights_inserted: 15,
            }
        );
    }

    #[test]
    fn test_seed_twice_duplicates_rows() {
        let conn = connection();
        let migration = Migration::new(&conn);
        migration.reset().unwrap();
        migration.seed().unwrap();

        let status = migration.status().unwrap();
        assert_eq!(status.destination_count, 30);
        assert_eq!(status.pilot_count, 30);
        assert_eq!(status.flight_count, 30);
    }

    #[test]
    fn test_seed_without_tables_fails() {
        let conn = connection();
        assert!(Migration::new(&conn).seed().is_err());
    }
}
