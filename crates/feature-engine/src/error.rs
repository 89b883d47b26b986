//! Encoding Error Types

use thiserror::Error;

/// Errors while encoding attributes into features
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Value was not present when the encoder was fitted
    #[error("Unseen {field} value '{value}'")]
    UnseenCategory { field: &'static str, value: String },
}
