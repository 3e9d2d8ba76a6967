//! Conversion between domain types and SQLite rows.
//!
//! Dates and times are stored as text in the formats fixed by
//! [`flightdesk_core::DATE_FORMAT`] and [`flightdesk_core::TIME_FORMAT`];
//! statuses are stored as their variant names. Values read back that do not
//! parse surface as [`rusqlite::Error::FromSqlConversionFailure`], which the
//! error layer turns into [`StoreError::Conversion`](crate::StoreError::Conversion).
//!
//! The insert helpers are shared by [`Migration::seed`](crate::Migration::seed)
//! and [`Records`](crate::Records).

use chrono::{NaiveDate, NaiveTime};
use flightdesk_core::{
    DATE_FORMAT, Destination, DestinationPopularity, Flight, FlightStatus, FlightUpdate, FlightView,
    NewDestination, NewFlight, NewPilot, Pilot, PilotFlightCount, PilotScheduleRow, TIME_FORMAT,
    ValidationError, parse_date, parse_time,
};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, Row, params};

use crate::error::Result;

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn time_to_sql(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Converts the new value of a flight update into a bindable SQL value.
pub(crate) fn update_value(update: &FlightUpdate) -> Value {
    match *update {
        FlightUpdate::Date(date) => Value::Text(date_to_sql(date)),
        FlightUpdate::Time(time) => Value::Text(time_to_sql(time)),
        FlightUpdate::Status(status) => Value::Text(status.as_str().to_string()),
        FlightUpdate::PilotId(id)
        | FlightUpdate::OriginId(id)
        | FlightUpdate::DestinationId(id) => Value::Integer(id),
    }
}

fn conversion_failure(column: usize, err: ValidationError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn column_date(row: &Row<'_>, column: usize) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(column)?
        .map(|raw| parse_date(&raw).map_err(|e| conversion_failure(column, e)))
        .transpose()
}

fn column_time(row: &Row<'_>, column: usize) -> rusqlite::Result<Option<NaiveTime>> {
    row.get::<_, Option<String>>(column)?
        .map(|raw| parse_time(&raw).map_err(|e| conversion_failure(column, e)))
        .transpose()
}

fn column_status(row: &Row<'_>, column: usize) -> rusqlite::Result<Option<FlightStatus>> {
    row.get::<_, Option<String>>(column)?
        .map(|raw| {
            raw.parse::<FlightStatus>()
                .map_err(|e| conversion_failure(column, e))
        })
        .transpose()
}

/// Reads a column that the query guarantees is non-null.
fn required<T>(row: &Row<'_>, column: usize, value: Option<T>) -> rusqlite::Result<T> {
    value.ok_or_else(|| {
        let name = row
            .as_ref()
            .column_name(column)
            .map(str::to_string)
            .unwrap_or_else(|_| column.to_string());
        rusqlite::Error::InvalidColumnType(column, name, Type::Null)
    })
}

/// Inserts a destination and returns its row id.
pub fn insert_destination(conn: &Connection, destination: &NewDestination) -> Result<i64> {
    conn.execute(
        "INSERT INTO destinations (airport, city, country) VALUES (?1, ?2, ?3)",
        params![destination.airport, destination.city, destination.country],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a pilot and returns its row id.
pub fn insert_pilot(conn: &Connection, pilot: &NewPilot) -> Result<i64> {
    conn.execute(
        "INSERT INTO pilots (forename, surname, license_no, years_of_xp, email, phone) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            pilot.forename,
            pilot.surname,
            pilot.license_no,
            pilot.years_of_xp,
            pilot.email,
            pilot.phone,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a flight and returns its row id.
pub fn insert_flight(conn: &Connection, flight: &NewFlight) -> Result<i64> {
    conn.execute(
        "INSERT INTO flights (date, time, origin_id, destination_id, pilot_id, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date_to_sql(flight.date),
            time_to_sql(flight.time),
            flight.origin_id,
            flight.destination_id,
            flight.pilot_id,
            flight.status.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Columns expected by [`destination_from_row`].
pub(crate) const DESTINATION_COLUMNS: &str = "destination_id, airport, city, country";

pub(crate) fn destination_from_row(row: &Row<'_>) -> rusqlite::Result<Destination> {
    Ok(Destination {
        destination_id: row.get(0)?,
        airport: row.get(1)?,
        city: row.get(2)?,
        country: row.get(3)?,
    })
}

/// Columns expected by [`pilot_from_row`].
pub(crate) const PILOT_COLUMNS: &str =
    "pilot_id, forename, surname, license_no, years_of_xp, email, phone";

pub(crate) fn pilot_from_row(row: &Row<'_>) -> rusqlite::Result<Pilot> {
    Ok(Pilot {
        pilot_id: row.get(0)?,
        forename: row.get(1)?,
        surname: row.get(2)?,
        license_no: row.get(3)?,
        years_of_xp: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
    })
}

/// Columns expected by [`flight_from_row`].
pub(crate) const FLIGHT_COLUMNS: &str =
    "flight_id, date, time, origin_id, destination_id, pilot_id, status";

pub(crate) fn flight_from_row(row: &Row<'_>) -> rusqlite::Result<Flight> {
    Ok(Flight {
        flight_id: row.get(0)?,
        date: required(row, 1, column_date(row, 1)?)?,
        time: required(row, 2, column_time(row, 2)?)?,
        origin_id: row.get(3)?,
        destination_id: row.get(4)?,
        pilot_id: row.get(5)?,
        status: required(row, 6, column_status(row, 6)?)?,
    })
}

/// Flight joined to both destinations and the pilot.
///
/// Outer joins keep flights whose references dangle; filters and ordering
/// are appended by the caller.
pub(crate) const FLIGHT_VIEW_SELECT: &str = "\
SELECT f.flight_id, f.date, f.time, f.status,
       o.airport, o.city, o.country,
       d.airport, d.city, d.country,
       p.pilot_id, p.forename, p.surname
FROM flights f
LEFT JOIN destinations o ON f.origin_id = o.destination_id
LEFT JOIN destinations d ON f.destination_id = d.destination_id
LEFT JOIN pilots p ON f.pilot_id = p.pilot_id";

pub(crate) fn flight_view_from_row(row: &Row<'_>) -> rusqlite::Result<FlightView> {
    Ok(FlightView {
        flight_id: row.get(0)?,
        date: required(row, 1, column_date(row, 1)?)?,
        time: required(row, 2, column_time(row, 2)?)?,
        status: required(row, 3, column_status(row, 3)?)?,
        origin_airport: row.get(4)?,
        origin_city: row.get(5)?,
        origin_country: row.get(6)?,
        destination_airport: row.get(7)?,
        destination_city: row.get(8)?,
        destination_country: row.get(9)?,
        pilot_id: row.get(10)?,
        pilot_forename: row.get(11)?,
        pilot_surname: row.get(12)?,
    })
}

pub(crate) fn pilot_flight_count_from_row(row: &Row<'_>) -> rusqlite::Result<PilotFlightCount> {
    Ok(PilotFlightCount {
        pilot_id: row.get(0)?,
        forename: row.get(1)?,
        surname: row.get(2)?,
        flights: row.get(3)?,
    })
}

pub(crate) fn popularity_from_row(row: &Row<'_>) -> rusqlite::Result<DestinationPopularity> {
    Ok(DestinationPopularity {
        country: row.get(0)?,
        airport: row.get(1)?,
        city: row.get(2)?,
        arrivals: row.get(3)?,
    })
}

pub(crate) fn schedule_row_from_row(row: &Row<'_>) -> rusqlite::Result<PilotScheduleRow> {
    Ok(PilotScheduleRow {
        pilot_id: row.get(0)?,
        forename: row.get(1)?,
        surname: row.get(2)?,
        flight_id: row.get(3)?,
        date: column_date(row, 4)?,
        time: column_time(row, 5)?,
        status: column_status(row, 6)?,
        origin_airport: row.get(7)?,
        destination_airport: row.get(8)?,
    })
}
