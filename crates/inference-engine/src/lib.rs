//! ONNX Inference Engine
//!
//! Loads the pre-trained price model once and runs it on assembled feature
//! vectors. A mock backend stands in when no model artifact is available.

mod engine;
mod importance;

pub use engine::{InferenceEngine, InferenceResult, ModelBackend, PricePrediction, DEFAULT_CONFIDENCE_BAND};
pub use importance::{FeatureImportance, RankedFeature};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model file not found: {0}")]
    ModelNotFound(String),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Feature importance table invalid: {0}")]
    InvalidImportance(String),
}
