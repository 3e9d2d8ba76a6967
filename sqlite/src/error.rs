//! Error types for flight store operations.
//!
//! Raw SQLite failures are classified on the way in: constraint violations
//! become [`StoreError::Integrity`], column values that cannot be read back
//! into domain types become [`StoreError::Conversion`], and everything else
//! stays a [`StoreError::DatabaseError`].

use flightdesk_core::ValidationError;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during flight store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before reaching the database.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Foreign-key or other constraint violation reported by SQLite.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// No row matched the key of an update or delete in strict mode.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A stored value could not be converted back into a domain type.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Connection or I/O failure from the underlying engine.
    #[error("database error: {0}")]
    DatabaseError(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Integrity(message.unwrap_or_else(|| failure.to_string()))
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
                StoreError::Conversion(format!("column {column}: {source}"))
            }
            other => StoreError::DatabaseError(other),
        }
    }
}

impl StoreError {
    /// Returns `true` for foreign-key and other constraint violations.
    pub fn is_integrity(&self) -> bool {
        matches!(self, StoreError::Integrity(_))
    }

    /// Returns `true` if a strict-mode update or delete matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_foreign_key_failure_is_integrity() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (parent_id INTEGER REFERENCES parent(id));",
        )
        .unwrap();

        let err: StoreError = conn
            .execute("INSERT INTO child (parent_id) VALUES (42)", [])
            .unwrap_err()
            .into();
        assert!(err.is_integrity(), "unexpected error: {err}");
    }

    #[test]
    fn test_syntax_error_stays_database_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err: StoreError = conn.execute_batch("CREATE TABLEZ oops;").unwrap_err().into();
        assert!(matches!(err, StoreError::DatabaseError(_)));
    }

    #[test]
    fn test_not_found_message() {
        let err = StoreError::NotFound {
            entity: "flight",
            key: "99".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "flight not found: 99");
    }
}
