//! API Error Types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use feature_engine::EncodingError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Failures that stop the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    /// Model or dataset file absent or unreadable
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Rate limiter setup failed: {0}")]
    RateLimit(String),

    #[error("Metrics exporter setup failed: {0}")]
    Metrics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request failures, mapped to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Body is not JSON or not a JSON object
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Encoding(_) | ApiError::MalformedBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::Encoding(_) | ApiError::MalformedBody(_) => "encoding_failure",
            ApiError::NotFound(_) => "not_found",
            ApiError::Inference(_) => "inference_failure",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
