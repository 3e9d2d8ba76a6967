//! Read and reporting queries.
//!
//! Every call re-executes its statement and returns the full, ordered
//! result. Flight listings come from a three-way outer join, so a flight
//! whose origin, destination or pilot no longer exists still appears with
//! those columns empty.
//!
//! # Example
//!
//! ```no_run
//! use flightdesk_core::{FlightStatus, StoreConfig};
//! use flightdesk_sqlite::FlightStore;
//!
//! let store = FlightStore::open(&StoreConfig::default()).unwrap();
//! let query = store.query();
//!
//! for flight in query.flights_by_status(FlightStatus::Scheduled).unwrap() {
//!     println!("{} {} -> {:?}", flight.flight_id, flight.date, flight.destination_city);
//! }
//!
//! let busiest = query.most_popular_destinations().unwrap();
//! println!("busiest: {:?}", busiest.first());
//! ```

use chrono::NaiveDate;
use flightdesk_core::{
    Destination, DestinationPopularity, Flight, FlightStatus, FlightView, Pilot, PilotFlightCount,
    PilotScheduleRow,
};
use rusqlite::{Connection, OptionalExtension, Params, Row, params};

use crate::convert::{
    self, DESTINATION_COLUMNS, FLIGHT_COLUMNS, FLIGHT_VIEW_SELECT, PILOT_COLUMNS, date_to_sql,
};
use crate::error::Result;

/// Number of rows returned by the top and bottom rankings.
pub const RANKING_LIMIT: usize = 3;

/// Query interface over a borrowed connection.
pub struct FlightQuery<'a> {
    conn: &'a Connection,
}

impl<'a> FlightQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All flights, ordered by id.
    pub fn flights(&self) -> Result<Vec<FlightView>> {
        self.flight_views("", [])
    }

    /// A single flight by id, or `None` if it does not exist.
    pub fn flight(&self, flight_id: i64) -> Result<Option<FlightView>> {
        let flight = self
            .conn
            .query_row(
                &format!("{FLIGHT_VIEW_SELECT} WHERE f.flight_id = ?1"),
                params![flight_id],
                convert::flight_view_from_row,
            )
            .optional()?;
        Ok(flight)
    }

    /// A single flight as stored, with its raw foreign keys.
    ///
    /// Unlike [`flight`](Self::flight) this reads only the flights table, so
    /// the stored ids come back even when the rows they point at are gone.
    pub fn flight_record(&self, flight_id: i64) -> Result<Option<Flight>> {
        let flight = self
            .conn
            .query_row(
                &format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE flight_id = ?1"),
                params![flight_id],
                convert::flight_from_row,
            )
            .optional()?;
        Ok(flight)
    }

    /// Flights arriving at an airport, matched by exact name.
    pub fn flights_by_airport(&self, airport: &str) -> Result<Vec<FlightView>> {
        self.flight_views("WHERE d.airport = ?1", params![airport])
    }

    /// Flights arriving in a city, matched by exact name.
    pub fn flights_by_city(&self, city: &str) -> Result<Vec<FlightView>> {
        self.flight_views("WHERE d.city = ?1", params![city])
    }

    /// Flights with the given status.
    pub fn flights_by_status(&self, status: FlightStatus) -> Result<Vec<FlightView>> {
        self.flight_views("WHERE f.status = ?1", params![status.as_str()])
    }

    /// Flights departing on the given date.
    pub fn flights_by_date(&self, date: NaiveDate) -> Result<Vec<FlightView>> {
        self.flight_views("WHERE f.date = ?1", params![date_to_sql(date)])
    }

    /// All destinations, ordered by id.
    pub fn destinations(&self) -> Result<Vec<Destination>> {
        self.collect(
            &format!("SELECT {DESTINATION_COLUMNS} FROM destinations ORDER BY destination_id"),
            [],
            convert::destination_from_row,
        )
    }

    /// A single destination by id.
    pub fn destination(&self, destination_id: i64) -> Result<Option<Destination>> {
        let destination = self
            .conn
            .query_row(
                &format!("SELECT {DESTINATION_COLUMNS} FROM destinations WHERE destination_id = ?1"),
                params![destination_id],
                convert::destination_from_row,
            )
            .optional()?;
        Ok(destination)
    }

    /// All pilots, ordered by id.
    pub fn pilots(&self) -> Result<Vec<Pilot>> {
        self.collect(
            &format!("SELECT {PILOT_COLUMNS} FROM pilots ORDER BY pilot_id"),
            [],
            convert::pilot_from_row,
        )
    }

    /// A single pilot by id.
    pub fn pilot(&self, pilot_id: i64) -> Result<Option<Pilot>> {
        let pilot = self
            .conn
            .query_row(
                &format!("SELECT {PILOT_COLUMNS} FROM pilots WHERE pilot_id = ?1"),
                params![pilot_id],
                convert::pilot_from_row,
            )
            .optional()?;
        Ok(pilot)
    }

    /// Number of flights per pilot, busiest first.
    ///
    /// Grouping starts from the flights table, so pilots with no flights are
    /// absent. Equal counts are ordered by pilot id.
    pub fn flight_counts_by_pilot(&self) -> Result<Vec<PilotFlightCount>> {
        self.collect(
            "SELECT f.pilot_id, p.forename, p.surname, COUNT(*) AS flights \
             FROM flights f \
             LEFT JOIN pilots p ON f.pilot_id = p.pilot_id \
             GROUP BY f.pilot_id \
             ORDER BY flights DESC, f.pilot_id",
            [],
            convert::pilot_flight_count_from_row,
        )
    }

    /// The three pilots with the most years of experience.
    ///
    /// Order among equal experience is whatever SQLite produces.
    pub fn most_experienced_pilots(&self) -> Result<Vec<Pilot>> {
        self.pilots_by_experience("DESC")
    }

    /// The three pilots with the fewest years of experience.
    pub fn least_experienced_pilots(&self) -> Result<Vec<Pilot>> {
        self.pilots_by_experience("ASC")
    }

    /// The three destinations with the most arriving flights.
    ///
    /// Destinations no flight arrives at are never ranked. Order among
    /// equal counts is unspecified.
    pub fn most_popular_destinations(&self) -> Result<Vec<DestinationPopularity>> {
        self.destinations_by_arrivals("DESC")
    }

    /// The three destinations with the fewest arriving flights, ignoring
    /// destinations with none.
    pub fn least_popular_destinations(&self) -> Result<Vec<DestinationPopularity>> {
        self.destinations_by_arrivals("ASC")
    }

    /// A pilot's flights in chronological order.
    ///
    /// A pilot with no flights yields one row with the flight columns empty;
    /// an unknown pilot yields no rows.
    pub fn pilot_schedule(&self, pilot_id: i64) -> Result<Vec<PilotScheduleRow>> {
        self.collect(
            "SELECT p.pilot_id, p.forename, p.surname, \
                    f.flight_id, f.date, f.time, f.status, \
                    o.airport, d.airport \
             FROM pilots p \
             LEFT JOIN flights f ON f.pilot_id = p.pilot_id \
             LEFT JOIN destinations o ON f.origin_id = o.destination_id \
             LEFT JOIN destinations d ON f.destination_id = d.destination_id \
             WHERE p.pilot_id = ?1 \
             ORDER BY f.date, f.time, f.flight_id",
            params![pilot_id],
            convert::schedule_row_from_row,
        )
    }

    fn pilots_by_experience(&self, direction: &str) -> Result<Vec<Pilot>> {
        self.collect(
            &format!(
                "SELECT {PILOT_COLUMNS} FROM pilots ORDER BY years_of_xp {direction} LIMIT {RANKING_LIMIT}"
            ),
            [],
            convert::pilot_from_row,
        )
    }

    fn destinations_by_arrivals(&self, direction: &str) -> Result<Vec<DestinationPopularity>> {
        self.collect(
            &format!(
                "SELECT d.country, d.airport, d.city, COUNT(*) AS arrivals \
                 FROM flights f \
                 JOIN destinations d ON f.destination_id = d.destination_id \
                 GROUP BY d.country, d.airport, d.city \
                 ORDER BY arrivals {direction} \
                 LIMIT {RANKING_LIMIT}"
            ),
            [],
            convert::popularity_from_row,
        )
    }

    fn flight_views<P: Params>(&self, filter: &str, params: P) -> Result<Vec<FlightView>> {
        self.collect(
            &format!("{FLIGHT_VIEW_SELECT} {filter} ORDER BY f.flight_id"),
            params,
            convert::flight_view_from_row,
        )
    }

    fn collect<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::Migration;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        Migration::new(&conn).reset().unwrap();
        conn
    }

    #[test]
    fn test_flights_ordered_by_id() {
        let conn = seeded();
        let ids: Vec<i64> = FlightQuery::new(&conn)
            .flights()
            .unwrap()
            .iter()
            .map(|f| f.flight_id)
            .collect();
        assert_eq!(ids, (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn test_flight_joins_both_destinations() {
        let conn = seeded();
        let flight = FlightQuery::new(&conn).flight(1).unwrap().unwrap();
        assert_eq!(flight.origin_airport.as_deref(), Some("Heathrow"));
        assert_eq!(flight.destination_airport.as_deref(), Some("JFK International"));
        assert_eq!(flight.pilot_surname.as_deref(), Some("Smith"));
        assert_eq!(flight.status, FlightStatus::Arrived);
    }

    #[test]
    fn test_flight_missing() {
        let conn = seeded();
        assert!(FlightQuery::new(&conn).flight(404).unwrap().is_none());
    }

    #[test]
    fn test_filter_by_city_and_airport() {
        let conn = seeded();
        let query = FlightQuery::new(&conn);
        let to_new_york: Vec<i64> = query
            .flights_by_city("New York")
            .unwrap()
            .iter()
            .map(|f| f.flight_id)
            .collect();
        assert_eq!(to_new_york, vec![1, 11, 14]);
        assert_eq!(query.flights_by_airport("JFK International").unwrap().len(), 3);
        // Exact match only
        assert!(query.flights_by_airport("jfk international").unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_date() {
        let conn = seeded();
        let date = flightdesk_core::parse_date("2025-01-10").unwrap();
        let flights = FlightQuery::new(&conn).flights_by_date(date).unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].flight_id, 10);
        assert_eq!(flights[0].status, FlightStatus::Boarding);
    }

    #[test]
    fn test_experience_rankings() {
        let conn = seeded();
        let query = FlightQuery::new(&conn);
        let most: Vec<u32> = query
            .most_experienced_pilots()
            .unwrap()
            .iter()
            .map(|p| p.years_of_xp)
            .collect();
        assert_eq!(most, vec![20, 15, 13]);

        let least: Vec<u32> = query
            .least_experienced_pilots()
            .unwrap()
            .iter()
            .map(|p| p.years_of_xp)
            .collect();
        assert_eq!(least, vec![1, 2, 3]);
    }

    #[test]
    fn test_most_popular_destination() {
        let conn = seeded();
        let ranking = FlightQuery::new(&conn).most_popular_destinations().unwrap();
        assert_eq!(ranking.len(), RANKING_LIMIT);
        assert_eq!(ranking[0].airport, "JFK International");
        assert_eq!(ranking[0].arrivals, 3);
        assert!(ranking[1..].iter().all(|d| d.arrivals == 1));
    }

    #[test]
    fn test_pilot_schedule() {
        let conn = seeded();
        let schedule = FlightQuery::new(&conn).pilot_schedule(8).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].surname, "Martinez");
        assert_eq!(schedule[0].flight_id, Some(8));
        assert_eq!(schedule[0].origin_airport.as_deref(), Some("Incheon"));
        assert_eq!(schedule[0].destination_airport.as_deref(), Some("Suvarnabhumi"));
    }

    #[test]
    fn test_pilot_schedule_unknown_pilot() {
        let conn = seeded();
        assert!(FlightQuery::new(&conn).pilot_schedule(99).unwrap().is_empty());
    }
}
