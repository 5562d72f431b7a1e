//! Error types for record validation and conversion.

use thiserror::Error;

/// Result type alias using RecordError.
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised when a record does not have the persisted shape.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Invalid date '{0}': expected YYYYMMDD or empty")]
    InvalidDate(String),

    #[error("Non-finite value for '{field}': {value}")]
    NonFinite { field: &'static str, value: f64 },
}
