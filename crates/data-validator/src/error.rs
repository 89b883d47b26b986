//! Validation Error Types

use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Configured range is inverted or exceeds what the field can store
    #[error("{field} range [{min}, {max}] is invalid")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// More than one field failed
    #[error("Invalid vehicle input: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Rejected(Vec<ValidationError>),
}
