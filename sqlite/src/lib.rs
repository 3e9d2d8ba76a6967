//! SQLite storage for flights, pilots, and destinations.
//!
//! This crate is the data-access layer of the flightdesk tool. It owns every
//! statement issued against the database; callers pass typed values from
//! [`flightdesk_core`] and get back ids, affected-row counts, or rows.
//!
//! # Architecture
//!
//! - **`schema`** — DDL for the three tables and their indexes
//! - **`migration`** — initialize/up/down/seed/reset/status
//! - **`seed`** — the fixed sample data
//! - **`records`** — single-statement inserts, updates, and deletes
//! - **`query`** — joined listings, filters, and rankings
//! - **`convert`** — domain types ↔ SQL values and rows
//! - **`store`** — the connection-owning handle tying the layers together
//!
//! # Quick start
//!
//! ```no_run
//! use flightdesk_core::{FlightStatus, FlightUpdate, StoreConfig};
//! use flightdesk_sqlite::FlightStore;
//!
//! let store = FlightStore::open(&StoreConfig::default()).unwrap();
//! store.migration().reset().unwrap();
//!
//! store
//!     .records()
//!     .update_flight(1, FlightUpdate::Status(FlightStatus::Cancelled))
//!     .unwrap();
//!
//! let scheduled = store.query().flights_by_status(FlightStatus::Scheduled).unwrap();
//! println!("{} scheduled flights", scheduled.len());
//!
//! store.close().unwrap();
//! ```
//!
//! # Integrity checking
//!
//! With foreign keys enforced (the default), inserting a flight that points
//! at a missing destination or pilot, or deleting a destination that flights
//! still use, fails with [`StoreError::Integrity`]. With enforcement off the
//! same operations succeed and leave dangling references, which the joined
//! queries tolerate.

mod convert;
mod error;
mod migration;
mod query;
mod records;
mod schema;
mod seed;
mod store;

pub use error::{Result, StoreError};
pub use migration::{Migration, MigrationStatus, SeedReport};
pub use query::{FlightQuery, RANKING_LIMIT};
pub use records::Records;
pub use store::{FlightStore, StoreOptions};
