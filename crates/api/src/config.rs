//! Application configuration
//!
//! Layered with the `config` crate: an optional TOML file, then environment
//! variables prefixed `CARPRICE` with `__` between nested keys
//! (`CARPRICE__SERVER__ADDR=127.0.0.1:9000`).

use crate::error::StartupError;
use crate::rate_limit::RateLimitConfig;
use config::{Config, Environment, File};
use data_validator::ValidationConfig;
use inference_engine::{ModelBackend, DEFAULT_CONFIDENCE_BAND};
use reference_data::ColumnMapping;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File read when no path is given on the command line
const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub logging: LoggingConfig,
    pub model: ModelConfig,
    pub validation: ValidationConfig,
    pub rate_limit: RateLimitConfig,
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Files loaded at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// ONNX price model
    pub model_path: PathBuf,
    /// Reference listings CSV
    pub dataset_path: PathBuf,
    /// JSON array of per-slot importance scores
    pub importance_path: Option<PathBuf>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/best_car_price_model.onnx"),
            dataset_path: PathBuf::from("data/vehicle_listings.csv"),
            importance_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of plain text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,
    /// Relative half-width of the price band
    pub confidence_band: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Onnx,
            confidence_band: DEFAULT_CONFIDENCE_BAND,
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise `config/default.toml` is read
    /// if present. Environment variables override both.
    pub fn load(path: Option<&Path>) -> Result<Self, StartupError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("CARPRICE").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that deserialize but cannot be used
    pub fn validate(&self) -> Result<(), StartupError> {
        self.validation
            .check()
            .map_err(|e| StartupError::InvalidConfig(e.to_string()))
    }
}
