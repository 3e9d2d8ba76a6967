//! Core domain types for the flightdesk data-management tool.
//!
//! This crate defines the vocabulary shared by the storage layer and the
//! command-line shell:
//!
//! - [`Destination`], [`Pilot`], [`Flight`]: stored entities keyed by
//!   surrogate ids.
//! - [`NewDestination`], [`NewPilot`], [`NewFlight`]: validated inputs for
//!   inserts.
//! - [`FlightUpdate`]: a single-column change to one flight.
//! - [`FlightView`], [`PilotFlightCount`], [`DestinationPopularity`],
//!   [`PilotScheduleRow`]: denormalized rows returned by reporting queries.
//! - [`StoreConfig`]: YAML configuration for opening a store.
//!
//! Validation ([`parse_date`], [`parse_time`], [`ValidationError`]) rejects
//! malformed input at the boundary instead of correcting it.
//!
//! # Example
//!
//! ```
//! use flightdesk_core::*;
//!
//! let flight = NewFlight {
//!     date: parse_date("2025-02-01").unwrap(),
//!     time: parse_time("08:30").unwrap(),
//!     origin_id: 1,
//!     destination_id: 2,
//!     pilot_id: 3,
//!     status: "scheduled".parse().unwrap(),
//! };
//! assert!(flight.validate().is_ok());
//! assert_eq!(flight.status, FlightStatus::Scheduled);
//! ```

mod config;
mod types;
mod validate;

pub use config::{ConfigError, DEFAULT_DATABASE, MissingRowPolicy, StoreConfig};
pub use types::{
    Destination, DestinationPopularity, Flight, FlightField, FlightStatus, FlightUpdate,
    FlightView, NewDestination, NewFlight, NewPilot, Pilot, PilotFlightCount, PilotScheduleRow,
};
pub use validate::{DATE_FORMAT, TIME_FORMAT, ValidationError, parse_date, parse_time, require_text};
