//! Record access: single-statement inserts, updates, and deletes.
//!
//! Each mutation is one auto-committed statement. Inputs are validated
//! before they reach SQLite; references to missing rows are left to the
//! foreign-key constraints and come back as
//! [`StoreError::Integrity`](crate::StoreError::Integrity) when enforcement
//! is on.
//!
//! Updates and deletes return the number of affected rows. When nothing
//! matches, the [`MissingRowPolicy`] decides between returning `0` and
//! failing with [`StoreError::NotFound`].

use flightdesk_core::{FlightUpdate, MissingRowPolicy, NewDestination, NewFlight, NewPilot};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::convert;
use crate::error::{Result, StoreError};

/// Mutation interface over a borrowed connection.
///
/// # Examples
///
/// ```no_run
/// use flightdesk_core::{FlightStatus, FlightUpdate, StoreConfig};
/// use flightdesk_sqlite::FlightStore;
///
/// let store = FlightStore::open(&StoreConfig::default()).unwrap();
/// let records = store.records();
///
/// records
///     .update_flight(1, FlightUpdate::Status(FlightStatus::Cancelled))
///     .unwrap();
/// let removed = records.delete_destinations_by_airport("Gatwick").unwrap();
/// println!("removed {removed} destination(s)");
/// ```
pub struct Records<'a> {
    conn: &'a Connection,
    missing_rows: MissingRowPolicy,
}

impl<'a> Records<'a> {
    /// Creates a record interface with the given missing-row policy.
    pub fn new(conn: &'a Connection, missing_rows: MissingRowPolicy) -> Self {
        Self { conn, missing_rows }
    }

    /// Inserts a flight and returns its generated id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if origin and destination are the
    /// same, or [`StoreError::Integrity`] if a referenced destination or
    /// pilot does not exist and foreign keys are enforced.
    pub fn insert_flight(&self, flight: &NewFlight) -> Result<i64> {
        flight.validate()?;
        let flight_id = convert::insert_flight(self.conn, flight)?;
        debug!(flight_id, "inserted flight");
        Ok(flight_id)
    }

    /// Changes one column of one flight.
    ///
    /// Returns the number of rows updated, which is `0` or `1`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Integrity`] if a new reference does not exist,
    /// or [`StoreError::NotFound`] under [`MissingRowPolicy::Error`] when no
    /// flight has the given id.
    pub fn update_flight(&self, flight_id: i64, update: FlightUpdate) -> Result<usize> {
        let column = update.field().column();
        let rows = self.conn.execute(
            &format!("UPDATE flights SET {column} = ?1 WHERE flight_id = ?2"),
            params![convert::update_value(&update), flight_id],
        )?;
        debug!(flight_id, column, rows, "updated flight");
        self.check_affected(rows, "flight", flight_id.to_string())
    }

    /// Deletes a flight by id.
    pub fn delete_flight(&self, flight_id: i64) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM flights WHERE flight_id = ?1", params![flight_id])?;
        debug!(flight_id, rows, "deleted flight");
        self.check_affected(rows, "flight", flight_id.to_string())
    }

    /// Inserts a destination and returns its generated id.
    pub fn insert_destination(&self, destination: &NewDestination) -> Result<i64> {
        destination.validate()?;
        let destination_id = convert::insert_destination(self.conn, destination)?;
        debug!(destination_id, airport = %destination.airport, "inserted destination");
        Ok(destination_id)
    }

    /// Deletes a destination by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Integrity`] while any flight still departs from
    /// or arrives at it and foreign keys are enforced.
    pub fn delete_destination(&self, destination_id: i64) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM destinations WHERE destination_id = ?1",
            params![destination_id],
        )?;
        debug!(destination_id, rows, "deleted destination");
        self.check_affected(rows, "destination", destination_id.to_string())
    }

    /// Deletes every destination whose airport name matches exactly.
    ///
    /// Airport names are not unique, so this may remove several rows. The
    /// delete is a single statement: if any matching row is still referenced
    /// under foreign-key enforcement, none are removed.
    pub fn delete_destinations_by_airport(&self, airport: &str) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM destinations WHERE airport = ?1", params![airport])?;
        debug!(airport, rows, "deleted destinations by airport");
        self.check_affected(rows, "destination", airport.to_string())
    }

    /// Inserts a pilot and returns the generated id.
    ///
    /// Pilots cannot be deleted once stored.
    pub fn insert_pilot(&self, pilot: &NewPilot) -> Result<i64> {
        pilot.validate()?;
        let pilot_id = convert::insert_pilot(self.conn, pilot)?;
        debug!(pilot_id, "inserted pilot");
        Ok(pilot_id)
    }

    fn check_affected(&self, rows: usize, entity: &'static str, key: String) -> Result<usize> {
        if rows == 0 && self.missing_rows == MissingRowPolicy::Error {
            return Err(StoreError::NotFound { entity, key });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::Migration;
    use flightdesk_core::{FlightStatus, ValidationError, parse_date, parse_time};

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        Migration::new(&conn).reset().unwrap();
        conn
    }

    fn new_flight(origin_id: i64, destination_id: i64, pilot_id: i64) -> NewFlight {
        NewFlight {
            date: parse_date("2025-02-01").unwrap(),
            time: parse_time("09:00").unwrap(),
            origin_id,
            destination_id,
            pilot_id,
            status: FlightStatus::Scheduled,
        }
    }

    #[test]
    fn test_insert_flight_returns_increasing_ids() {
        let conn = seeded();
        let records = Records::new(&conn, MissingRowPolicy::Ignore);
        let first = records.insert_flight(&new_flight(1, 2, 3)).unwrap();
        let second = records.insert_flight(&new_flight(2, 1, 3)).unwrap();
        assert_eq!(first, 16);
        assert_eq!(second, 17);
    }

    #[test]
    fn test_insert_flight_same_origin_rejected_before_store() {
        let conn = seeded();
        let records = Records::new(&conn, MissingRowPolicy::Ignore);
        let err = records.insert_flight(&new_flight(3, 3, 1)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::SameOriginAndDestination(3))
        ));
    }

    #[test]
    fn test_insert_destination_rejects_blank_fields() {
        let conn = seeded();
        let records = Records::new(&conn, MissingRowPolicy::Ignore);
        let err = records
            .insert_destination(&NewDestination::new("", "London", "UK"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyField("airport"))
        ));
    }

    #[test]
    fn test_update_unknown_pilot_is_integrity_error() {
        let conn = seeded();
        let records = Records::new(&conn, MissingRowPolicy::Ignore);
        let err = records
            .update_flight(1, FlightUpdate::PilotId(999))
            .unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_check_affected_policies() {
        let conn = seeded();
        let lenient = Records::new(&conn, MissingRowPolicy::Ignore);
        assert_eq!(lenient.check_affected(0, "flight", "9".into()).unwrap(), 0);

        let strict = Records::new(&conn, MissingRowPolicy::Error);
        assert_eq!(strict.check_affected(1, "flight", "1".into()).unwrap(), 1);
        assert!(strict
            .check_affected(0, "flight", "9".into())
            .unwrap_err()
            .is_not_found());
    }
}
