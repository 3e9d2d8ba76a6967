//! Fixed sample data for bootstrapping a demo database.
//!
//! Flights reference destinations and pilots by their 1-based position in
//! the lists below. The positions are resolved to the row ids produced by
//! this seeding run, so seeding twice duplicates rows without crossing
//! references between the two copies.

use flightdesk_core::{
    FlightStatus, NewDestination, NewFlight, NewPilot, parse_date, parse_time,
};
use rusqlite::Connection;
use tracing::debug;

use crate::convert;
use crate::error::Result;
use crate::migration::SeedReport;

/// `(airport, city, country)`
pub(crate) const DESTINATIONS: [(&str, &str, &str); 15] = [
    ("Heathrow", "London", "UK"),
    ("JFK International", "New York", "USA"),
    ("Haneda", "Tokyo", "Japan"),
    ("Charles de Gaulle", "Paris", "France"),
    ("Frankfurt Airport", "Frankfurt", "Germany"),
    ("Dubai International", "Dubai", "UAE"),
    ("Changi", "Singapore", "Singapore"),
    ("Sydney Kingsford Smith", "Sydney", "Australia"),
    ("Incheon", "Seoul", "South Korea"),
    ("Suvarnabhumi", "Bangkok", "Thailand"),
    ("Amsterdam Schiphol", "Amsterdam", "Netherlands"),
    ("Barcelona El Prat", "Barcelona", "Spain"),
    ("Toronto Pearson", "Toronto", "Canada"),
    ("Los Angeles Intl", "Los Angeles", "USA"),
    ("Beijing Capital", "Beijing", "China"),
];

/// `(forename, surname, license_no, years_of_xp, email, phone)`
pub(crate) const PILOTS: [(&str, &str, &str, u32, &str, &str); 15] = [
    ("John", "Smith", "LIC12345", 5, "john.smith@example.com", "555-1111"),
    ("Sarah", "Johnson", "LIC67890", 12, "sarah.j@example.com", "555-2222"),
    ("Michael", "Brown", "LIC54321", 8, "michael.b@example.com", "555-3333"),
    ("Emily", "Davis", "LIC98765", 3, "emily.d@example.com", "555-4444"),
    ("David", "Wilson", "LIC13579", 10, "david.w@example.com", "555-5555"),
    ("Jessica", "Garcia", "LIC24680", 15, "jessica.g@example.com", "555-6666"),
    ("Robert", "Miller", "LIC11223", 6, "robert.m@example.com", "555-7777"),
    ("Linda", "Martinez", "LIC44556", 20, "linda.m@example.com", "555-8888"),
    ("Paul", "Robinson", "LIC77889", 2, "paul.r@example.com", "555-9999"),
    ("Karen", "Clark", "LIC99000", 7, "karen.c@example.com", "555-0000"),
    ("Steven", "Lewis", "LIC99991", 9, "steven.l@example.com", "555-0101"),
    ("Nancy", "Lee", "LIC88882", 4, "nancy.l@example.com", "555-0202"),
    ("Richard", "Walker", "LIC77773", 11, "richard.w@example.com", "555-0303"),
    ("Elizabeth", "Hall", "LIC66664", 13, "elizabeth.h@example.com", "555-0404"),
    ("Daniel", "Allen", "LIC55555", 1, "daniel.a@example.com", "555-0505"),
];

/// `(date, time, origin, destination, pilot, status)`; references are
/// 1-based positions in [`DESTINATIONS`] and [`PILOTS`].
pub(crate) const FLIGHTS: [(&str, &str, usize, usize, usize, FlightStatus); 15] = [
    ("2025-01-01", "08:00", 1, 2, 1, FlightStatus::Arrived),
    ("2025-01-02", "09:30", 3, 5, 2, FlightStatus::Cancelled),
    ("2025-01-03", "14:15", 5, 6, 3, FlightStatus::Arrived),
    ("2025-01-04", "11:00", 2, 1, 4, FlightStatus::Cancelled),
    ("2025-01-05", "16:45", 6, 7, 5, FlightStatus::Arrived),
    ("2025-01-06", "07:20", 4, 3, 6, FlightStatus::Arrived),
    ("2025-01-07", "19:00", 8, 9, 7, FlightStatus::Departed),
    ("2025-01-08", "05:10", 9, 10, 8, FlightStatus::Departed),
    ("2025-01-09", "12:30", 11, 13, 9, FlightStatus::Departed),
    ("2025-01-10", "18:25", 7, 12, 10, FlightStatus::Boarding),
    ("2025-01-11", "20:00", 14, 2, 11, FlightStatus::Scheduled),
    ("2025-01-12", "06:15", 10, 4, 12, FlightStatus::Scheduled),
    ("2025-01-13", "13:50", 2, 14, 13, FlightStatus::Scheduled),
    ("2025-01-14", "10:10", 15, 2, 14, FlightStatus::Scheduled),
    ("2025-01-15", "15:05", 3, 15, 15, FlightStatus::Scheduled),
];

/// Inserts destinations, pilots, then flights, in that order.
///
/// Callers provide the transaction; nothing here commits.
pub(crate) fn insert_sample_data(conn: &Connection) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let mut destination_ids = Vec::with_capacity(DESTINATIONS.len());
    for (airport, city, country) in DESTINATIONS {
        let id = convert::insert_destination(conn, &NewDestination::new(airport, city, country))?;
        destination_ids.push(id);
        report.destinations_inserted += 1;
    }

    let mut pilot_ids = Vec::with_capacity(PILOTS.len());
    for (forename, surname, license_no, years_of_xp, email, phone) in PILOTS {
        let pilot = NewPilot {
            forename: forename.to_string(),
            surname: surname.to_string(),
            license_no: license_no.to_string(),
            years_of_xp,
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
        };
        pilot_ids.push(convert::insert_pilot(conn, &pilot)?);
        report.pilots_inserted += 1;
    }

    for (date, time, origin, destination, pilot, status) in FLIGHTS {
        let flight = NewFlight {
            date: parse_date(date)?,
            time: parse_time(time)?,
            origin_id: destination_ids[origin - 1],
            destination_id: destination_ids[destination - 1],
            pilot_id: pilot_ids[pilot - 1],
            status,
        };
        convert::insert_flight(conn, &flight)?;
        report.flights_inserted += 1;
    }

    debug!(
        destinations = report.destinations_inserted,
        pilots = report.pilots_inserted,
        flights = report.flights_inserted,
        "inserted sample data"
    );
    Ok(report)
}
