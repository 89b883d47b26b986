//! Process-wide application state

use crate::config::AppConfig;
use crate::error::StartupError;
use data_validator::Validator;
use feature_engine::{FeatureAssembler, FeatureSchema};
use inference_engine::{FeatureImportance, InferenceEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use reference_data::Repository;
use std::time::Instant;
use tracing::{info, warn};

/// Everything loaded at startup. Shared as `Arc<AppState>` and never mutated.
pub struct AppState {
    pub validator: Validator,
    /// Encoders fitted on the repository vocabulary
    pub assembler: FeatureAssembler,
    /// Slot names for `assembler` output
    pub schema: FeatureSchema,
    pub repository: Repository,
    pub engine: InferenceEngine,
    pub importance: Option<FeatureImportance>,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Fit the encoders on the repository and bundle the loaded artifacts
    pub fn new(
        validator: Validator,
        repository: Repository,
        engine: InferenceEngine,
        importance: Option<FeatureImportance>,
    ) -> Self {
        let assembler = FeatureAssembler::fit(repository.vocabulary());
        let schema = assembler.schema();

        Self {
            validator,
            assembler,
            schema,
            repository,
            engine,
            importance,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Load every artifact named in the config.
    ///
    /// A missing model or dataset is fatal. A missing importance table only
    /// disables the explanation endpoint.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let artifacts = &config.artifacts;

        let repository = Repository::load(&artifacts.dataset_path, &config.columns)
            .map_err(|e| StartupError::MissingArtifact(e.to_string()))?;

        let engine = InferenceEngine::open(config.model.backend, &artifacts.model_path)
            .map_err(|e| StartupError::MissingArtifact(e.to_string()))?
            .with_confidence_band(config.model.confidence_band);

        let importance = match &artifacts.importance_path {
            Some(path) => match FeatureImportance::load(path) {
                Ok(table) => Some(table),
                Err(e) => {
                    warn!("Feature importance unavailable: {}", e);
                    None
                }
            },
            None => None,
        };

        let state = Self::new(Validator::new(config.validation.clone()), repository, engine, importance);
        info!(
            "Application state ready: {} listings, model {}, importance {}",
            state.repository.len(),
            state.engine.model_path(),
            if state.importance.is_some() { "loaded" } else { "absent" }
        );

        Ok(state)
    }

    /// Attach the Prometheus handle used by `GET /metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
