//! Entity and row type definitions.
//!
//! Stored entities mirror the three tables one-to-one. The `New*` types are
//! insert inputs without surrogate keys, and the view types are the
//! denormalized shapes produced by joins, where every column from an outer
//! side of a `LEFT JOIN` is optional.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, parse_date, parse_time, require_text};

/// Operational state of a flight.
///
/// Stored as its variant name in a `TEXT` column. Parsing is
/// case-insensitive so `"scheduled"` and `"Scheduled"` are both accepted.
///
/// # Examples
///
/// ```
/// use flightdesk_core::FlightStatus;
///
/// let status: FlightStatus = "boarding".parse().unwrap();
/// assert_eq!(status, FlightStatus::Boarding);
/// assert_eq!(status.as_str(), "Boarding");
/// assert!("Delayed".parse::<FlightStatus>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    Arrived,
    Cancelled,
}

impl FlightStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [FlightStatus; 5] = [
        FlightStatus::Scheduled,
        FlightStatus::Boarding,
        FlightStatus::Departed,
        FlightStatus::Arrived,
        FlightStatus::Cancelled,
    ];

    /// Returns the stored representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::Boarding => "Boarding",
            FlightStatus::Departed => "Departed",
            FlightStatus::Arrived => "Arrived",
            FlightStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlightStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// An airport that flights depart from or arrive at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub destination_id: i64,
    pub airport: String,
    pub city: String,
    pub country: String,
}

/// A pilot who can be assigned to flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub pilot_id: i64,
    pub forename: String,
    pub surname: String,
    pub license_no: String,
    pub years_of_xp: u32,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A flight as stored, with raw foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_id: i64,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub origin_id: i64,
    pub destination_id: i64,
    pub pilot_id: i64,
    pub status: FlightStatus,
}

/// Input for inserting a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDestination {
    pub airport: String,
    pub city: String,
    pub country: String,
}

impl NewDestination {
    pub fn new(
        airport: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            airport: airport.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    /// Checks that every required text field is non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("airport", &self.airport)?;
        require_text("city", &self.city)?;
        require_text("country", &self.country)?;
        Ok(())
    }
}

/// Input for inserting a pilot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPilot {
    pub forename: String,
    pub surname: String,
    pub license_no: String,
    pub years_of_xp: u32,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewPilot {
    /// Checks the required name and license fields.
    ///
    /// Optional contact fields are accepted as given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("forename", &self.forename)?;
        require_text("surname", &self.surname)?;
        require_text("license_no", &self.license_no)?;
        Ok(())
    }
}

/// Input for inserting a flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub origin_id: i64,
    pub destination_id: i64,
    pub pilot_id: i64,
    pub status: FlightStatus,
}

impl NewFlight {
    /// Rejects a flight whose origin and destination are the same airport.
    ///
    /// Whether the referenced rows exist is left to the store's foreign keys.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.origin_id == self.destination_id {
            return Err(ValidationError::SameOriginAndDestination(self.origin_id));
        }
        Ok(())
    }
}

/// A single updatable column of the flights table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightField {
    Date,
    Time,
    Status,
    PilotId,
    OriginId,
    DestinationId,
}

impl FlightField {
    /// Column name in the flights table.
    pub fn column(&self) -> &'static str {
        match self {
            FlightField::Date => "date",
            FlightField::Time => "time",
            FlightField::Status => "status",
            FlightField::PilotId => "pilot_id",
            FlightField::OriginId => "origin_id",
            FlightField::DestinationId => "destination_id",
        }
    }
}

impl fmt::Display for FlightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for FlightField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(FlightField::Date),
            "time" => Ok(FlightField::Time),
            "status" => Ok(FlightField::Status),
            "pilot" | "pilot_id" => Ok(FlightField::PilotId),
            "origin" | "origin_id" => Ok(FlightField::OriginId),
            "destination" | "destination_id" => Ok(FlightField::DestinationId),
            _ => Err(ValidationError::UnknownField(s.to_string())),
        }
    }
}

/// A typed change to exactly one column of one flight.
///
/// # Examples
///
/// ```
/// use flightdesk_core::{FlightField, FlightStatus, FlightUpdate};
///
/// let update = FlightUpdate::parse(FlightField::Status, "Cancelled").unwrap();
/// assert_eq!(update, FlightUpdate::Status(FlightStatus::Cancelled));
/// assert!(FlightUpdate::parse(FlightField::PilotId, "abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightUpdate {
    Date(NaiveDate),
    Time(NaiveTime),
    Status(FlightStatus),
    PilotId(i64),
    OriginId(i64),
    DestinationId(i64),
}

impl FlightUpdate {
    /// Parses a raw value for the given field.
    pub fn parse(field: FlightField, value: &str) -> Result<Self, ValidationError> {
        let parse_id = |value: &str| {
            value
                .parse::<i64>()
                .ok()
                .filter(|id| id.to_string() == value)
                .ok_or_else(|| ValidationError::InvalidId {
                    field: field.column(),
                    value: value.to_string(),
                })
        };

        match field {
            FlightField::Date => parse_date(value).map(FlightUpdate::Date),
            FlightField::Time => parse_time(value).map(FlightUpdate::Time),
            FlightField::Status => value.parse().map(FlightUpdate::Status),
            FlightField::PilotId => parse_id(value).map(FlightUpdate::PilotId),
            FlightField::OriginId => parse_id(value).map(FlightUpdate::OriginId),
            FlightField::DestinationId => parse_id(value).map(FlightUpdate::DestinationId),
        }
    }

    /// Returns the column this update targets.
    pub fn field(&self) -> FlightField {
        match self {
            FlightUpdate::Date(_) => FlightField::Date,
            FlightUpdate::Time(_) => FlightField::Time,
            FlightUpdate::Status(_) => FlightField::Status,
            FlightUpdate::PilotId(_) => FlightField::PilotId,
            FlightUpdate::OriginId(_) => FlightField::OriginId,
            FlightUpdate::DestinationId(_) => FlightField::DestinationId,
        }
    }
}

/// A flight joined with its origin, destination, and pilot.
///
/// The joins are outer joins, so a flight with a dangling reference is still
/// returned with the missing side left as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightView {
    pub flight_id: i64,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub status: FlightStatus,
    pub origin_airport: Option<String>,
    pub origin_city: Option<String>,
    pub origin_country: Option<String>,
    pub destination_airport: Option<String>,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub pilot_id: Option<i64>,
    pub pilot_forename: Option<String>,
    pub pilot_surname: Option<String>,
}

/// Number of flights assigned to one pilot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilotFlightCount {
    pub pilot_id: i64,
    pub forename: Option<String>,
    pub surname: Option<String>,
    pub flights: u32,
}

/// Number of flights arriving at one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationPopularity {
    pub country: String,
    pub airport: String,
    pub city: String,
    pub arrivals: u32,
}

/// One line of a pilot's schedule.
///
/// A pilot without flights yields a single row whose flight side is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilotScheduleRow {
    pub pilot_id: i64,
    pub forename: String,
    pub surname: String,
    pub flight_id: Option<i64>,
    pub date: Option<NaiveDate>,
    #[serde(with = "hhmm::option")]
    pub time: Option<NaiveTime>,
    pub status: Option<FlightStatus>,
    pub origin_airport: Option<String>,
    pub destination_airport: Option<String>,
}

/// Serializes times as `HH:MM`, the stored format.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::validate::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in FlightStatus::ALL {
            assert_eq!(status.as_str().parse::<FlightStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            "CANCELLED".parse::<FlightStatus>().unwrap(),
            FlightStatus::Cancelled
        );
        assert!(matches!(
            "Landed".parse::<FlightStatus>(),
            Err(ValidationError::UnknownStatus(s)) if s == "Landed"
        ));
    }

    #[test]
    fn test_new_destination_requires_all_fields() {
        assert!(NewDestination::new("Gatwick", "London", "UK").validate().is_ok());
        assert_eq!(
            NewDestination::new("Gatwick", "  ", "UK").validate(),
            Err(ValidationError::EmptyField("city"))
        );
    }

    #[test]
    fn test_new_pilot_contact_fields_optional() {
        let pilot = NewPilot {
            forename: "Ada".into(),
            surname: "Lovelace".into(),
            license_no: "LIC00001".into(),
            years_of_xp: 0,
            email: None,
            phone: None,
        };
        assert!(pilot.validate().is_ok());

        let unlicensed = NewPilot {
            license_no: String::new(),
            ..pilot
        };
        assert_eq!(
            unlicensed.validate(),
            Err(ValidationError::EmptyField("license_no"))
        );
    }

    #[test]
    fn test_new_flight_rejects_same_origin_and_destination() {
        let flight = NewFlight {
            date: parse_date("2025-03-01").unwrap(),
            time: parse_time("10:00").unwrap(),
            origin_id: 4,
            destination_id: 4,
            pilot_id: 1,
            status: FlightStatus::Scheduled,
        };
        assert_eq!(
            flight.validate(),
            Err(ValidationError::SameOriginAndDestination(4))
        );
    }

    #[test]
    fn test_flight_field_aliases() {
        assert_eq!("pilot".parse::<FlightField>().unwrap(), FlightField::PilotId);
        assert_eq!(
            "destination_id".parse::<FlightField>().unwrap(),
            FlightField::DestinationId
        );
        assert!("flight_id".parse::<FlightField>().is_err());
    }

    #[test]
    fn test_flight_update_parse() {
        let update = FlightUpdate::parse(FlightField::Time, "23:45").unwrap();
        assert_eq!(update.field(), FlightField::Time);
        assert_eq!(
            FlightUpdate::parse(FlightField::DestinationId, "7").unwrap(),
            FlightUpdate::DestinationId(7)
        );
        assert!(matches!(
            FlightUpdate::parse(FlightField::DestinationId, " 7 "),
            Err(ValidationError::InvalidId { field: "destination_id", .. })
        ));
        assert!(FlightUpdate::parse(FlightField::PilotId, "+7").is_err());
        assert!(FlightUpdate::parse(FlightField::PilotId, "007").is_err());
        assert!(matches!(
            FlightUpdate::parse(FlightField::Time, "8:5"),
            Err(ValidationError::InvalidTime(_))
        ));
        assert!(matches!(
            FlightUpdate::parse(FlightField::Date, "01/02/2025"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_flight_view_serializes_time_as_hhmm() {
        let view = FlightView {
            flight_id: 1,
            date: parse_date("2025-01-01").unwrap(),
            time: parse_time("08:00").unwrap(),
            status: FlightStatus::Arrived,
            origin_airport: None,
            origin_city: None,
            origin_country: None,
            destination_airport: Some("Haneda".into()),
            destination_city: Some("Tokyo".into()),
            destination_country: Some("Japan".into()),
            pilot_id: None,
            pilot_forename: None,
            pilot_surname: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["time"], "08:00");
        assert_eq!(json["date"], "2025-01-01");
        assert_eq!(json["status"], "Arrived");
        assert!(json["origin_airport"].is_null());
    }
}
