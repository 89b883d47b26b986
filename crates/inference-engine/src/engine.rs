//! Inference Engine Implementation

use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Relative width of the reported price band (±15%)
pub const DEFAULT_CONFIDENCE_BAND: f64 = 0.15;

/// Which model implementation to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// ONNX artifact executed with tract
    #[default]
    Onnx,
    /// Deterministic heuristic, no artifact needed
    Mock,
}

/// Price estimate for one vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePrediction {
    /// Point estimate
    pub price: f64,
    /// Lower edge of the confidence band
    pub lower_bound: f64,
    /// Upper edge of the confidence band
    pub upper_bound: f64,
    /// Timestamp when prediction was made
    pub timestamp_ms: u64,
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: PricePrediction,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

type PriceModel = TypedRunnableModel<TypedModel>;

enum Backend {
    Onnx(PriceModel),
    Mock,
}

/// Price model, loaded once and shared read-only
pub struct InferenceEngine {
    /// Model path
    model_path: String,
    /// Loaded backend
    backend: Backend,
    /// Relative half-width of the price band
    confidence_band: f64,
}

impl InferenceEngine {
    /// Load an ONNX price model taking a `[1, 43]` f32 input
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = model_path.as_ref();
        if !path.is_file() {
            return Err(InferenceError::ModelNotFound(path.display().to_string()));
        }

        info!("Loading price model from {}", path.display());

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;

        info!("Model loaded successfully");

        Ok(Self {
            model_path: path.display().to_string(),
            backend: Backend::Onnx(model),
            confidence_band: DEFAULT_CONFIDENCE_BAND,
        })
    }

    /// Create a mock inference engine for development and testing
    pub fn mock() -> Self {
        info!("Creating mock inference engine");
        Self {
            model_path: "mock".to_string(),
            backend: Backend::Mock,
            confidence_band: DEFAULT_CONFIDENCE_BAND,
        }
    }

    /// Open the engine for a configured backend
    pub fn open(backend: ModelBackend, model_path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        match backend {
            ModelBackend::Onnx => Self::load(model_path),
            ModelBackend::Mock => Ok(Self::mock()),
        }
    }

    /// Set the relative half-width of the reported price band
    pub fn with_confidence_band(mut self, band: f64) -> Self {
        self.confidence_band = band.clamp(0.0, 1.0);
        self
    }

    /// Run inference on a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        if features.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: features.len(),
            });
        }

        let price = match &self.backend {
            Backend::Onnx(model) => Self::run_onnx(model, features)?,
            Backend::Mock => Self::mock_price(features),
        };

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!("Inference completed in {}ms: {:.0}", latency_ms, price);

        Ok(InferenceResult {
            prediction: PricePrediction {
                price,
                lower_bound: price * (1.0 - self.confidence_band),
                upper_bound: price * (1.0 + self.confidence_band),
                timestamp_ms,
            },
            latency_ms,
        })
    }

    fn run_onnx(model: &PriceModel, features: &FeatureVector) -> Result<f64, InferenceError> {
        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], &features.to_f32())
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = model
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        view.iter()
            .next()
            .map(|&v| v as f64)
            .ok_or_else(|| InferenceError::InferenceFailed("empty model output".to_string()))
    }

    /// Depreciation heuristic over the positional features
    fn mock_price(features: &FeatureVector) -> f64 {
        let v = &features.values;
        let (mileage, year, power, damage, severity) = (v[0], v[1], v[3], v[5], v[11]);

        let age = (2024.0 - year).max(0.0);
        let base = 1_500_000.0 * 0.92_f64.powf(age);
        let price = base - mileage * 1.5 + (power - 100.0) * 3_000.0 - damage * 0.5 - severity * 40_000.0;

        price.max(50_000.0)
    }

    /// Check if running without a model artifact
    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock)
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Relative half-width of the price band
    pub fn confidence_band(&self) -> f64 {
        self.confidence_band
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(mileage: f64, year: f64, severity: f64) -> FeatureVector {
        let mut vector = FeatureVector::default();
        vector.values[0] = mileage;
        vector.values[1] = year;
        vector.values[2] = 1600.0;
        vector.values[3] = 120.0;
        vector.values[4] = 2000.0;
        vector.values[11] = severity;
        vector
    }

    #[test]
    fn test_mock_prediction_band() {
        let engine = InferenceEngine::mock();
        let result = engine.predict(&features(50_000.0, 2020.0, 0.0)).unwrap();

        let p = result.prediction;
        assert!(p.price > 0.0);
        assert!((p.lower_bound - p.price * 0.85).abs() < 1e-6);
        assert!((p.upper_bound - p.price * 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_mock_depreciation() {
        let engine = InferenceEngine::mock();
        let newer = engine.predict(&features(50_000.0, 2022.0, 0.0)).unwrap();
        let older = engine.predict(&features(50_000.0, 2012.0, 0.0)).unwrap();
        let damaged = engine.predict(&features(50_000.0, 2022.0, 2.0)).unwrap();

        assert!(newer.prediction.price > older.prediction.price);
        assert!(newer.prediction.price > damaged.prediction.price);
    }

    #[test]
    fn test_invalid_shape() {
        let engine = InferenceEngine::mock();
        let short = FeatureVector { values: vec![0.0; 12] };
        assert!(matches!(
            engine.predict(&short),
            Err(InferenceError::InvalidInputShape { expected: 43, actual: 12 })
        ));
    }

    #[test]
    fn test_missing_model_file() {
        let err = InferenceEngine::load("/nonexistent/best_car_price_model.onnx").err();
        assert!(matches!(err, Some(InferenceError::ModelNotFound(_))));
    }

    #[test]
    fn test_open_mock_backend() {
        let engine = InferenceEngine::open(ModelBackend::Mock, "ignored.onnx")
            .unwrap()
            .with_confidence_band(0.1);
        assert!(engine.is_mock());
        assert_eq!(engine.confidence_band(), 0.1);
    }
}
