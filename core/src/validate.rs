//! Input validation for values crossing into the store.
//!
//! Dates and times are kept as text in SQLite, so their formats are fixed
//! here and shared by the conversion code in the storage crate. Malformed
//! values are rejected, never normalized.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Storage and input format for flight dates (ISO 8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage and input format for flight times (24-hour clock).
pub const TIME_FORMAT: &str = "%H:%M";

/// Missing or malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    /// Status is not one of the known flight states.
    #[error("unknown flight status '{0}' (expected Scheduled, Boarding, Departed, Arrived or Cancelled)")]
    UnknownStatus(String),
    /// Date is not in `YYYY-MM-DD` form or is not a calendar date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    /// Time is not in 24-hour `HH:MM` form.
    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),
    /// Flight column name that cannot be updated.
    #[error("unknown flight field '{0}' (expected date, time, status, pilot_id, origin_id or destination_id)")]
    UnknownField(String),
    /// Identifier that is not an integer.
    #[error("invalid {field} '{value}': expected an integer id")]
    InvalidId { field: &'static str, value: String },
    /// Flight would depart from and arrive at the same destination.
    #[error("origin and destination must differ (both are {0})")]
    SameOriginAndDestination(i64),
}

/// Rejects empty or whitespace-only text for a required field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Examples
///
/// ```
/// use flightdesk_core::parse_date;
///
/// assert!(parse_date("2025-01-15").is_ok());
/// assert!(parse_date("2025-02-30").is_err());
/// assert!(parse_date("2025-1-5").is_err());
/// ```
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == value)
        .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

/// Parses an `HH:MM` time on the 24-hour clock.
///
/// # Examples
///
/// ```
/// use flightdesk_core::parse_time;
///
/// assert!(parse_time("18:25").is_ok());
/// assert!(parse_time("24:00").is_err());
/// ```
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .ok()
        .filter(|time| time.format(TIME_FORMAT).to_string() == value)
        .ok_or_else(|| ValidationError::InvalidTime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("airport", "Heathrow").is_ok());
        assert_eq!(
            require_text("airport", ""),
            Err(ValidationError::EmptyField("airport"))
        );
        assert_eq!(
            require_text("airport", " \t"),
            Err(ValidationError::EmptyField("airport"))
        );
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2025-01-09").unwrap();
        assert_eq!(date.format(DATE_FORMAT).to_string(), "2025-01-09");
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("09-01-2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_date_requires_padded_fields() {
        assert_eq!(
            parse_date("2025-1-5"),
            Err(ValidationError::InvalidDate("2025-1-5".into()))
        );
        assert!(parse_date(" 2025-01-05").is_err());
    }

    #[test]
    fn test_parse_time() {
        let time = parse_time("05:10").unwrap();
        assert_eq!(time.format(TIME_FORMAT).to_string(), "05:10");
        assert!(parse_time("5pm").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("12:00:00").is_err());
    }

    #[test]
    fn test_parse_time_requires_padded_fields() {
        assert_eq!(
            parse_time("8:5"),
            Err(ValidationError::InvalidTime("8:5".into()))
        );
        assert!(parse_time("8:05").is_err());
        assert!(parse_time("08:05 ").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::EmptyField("country").to_string(),
            "country cannot be empty"
        );
        assert_eq!(
            ValidationError::InvalidTime("25:00".into()).to_string(),
            "invalid time '25:00': expected HH:MM"
        );
    }
}
