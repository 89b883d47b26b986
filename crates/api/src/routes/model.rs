//! Model Information Routes

use axum::{extract::State, Json};
use feature_engine::FEATURE_DIMENSION;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Loaded model and the data its encoders were fitted on
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    /// "onnx" or "mock"
    pub backend: &'static str,
    pub model_path: String,
    pub feature_count: usize,
    /// Slot names in model input order
    pub feature_names: Vec<String>,
    /// Reference listings the encoders were fitted on
    pub reference_rows: usize,
    pub confidence_band: f64,
    pub importance_loaded: bool,
}

/// GET /api/v1/model/info
pub async fn get_model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfo> {
    Json(ModelInfo {
        backend: if state.engine.is_mock() { "mock" } else { "onnx" },
        model_path: state.engine.model_path().to_string(),
        feature_count: FEATURE_DIMENSION,
        feature_names: state.schema.names().to_vec(),
        reference_rows: state.repository.len(),
        confidence_band: state.engine.confidence_band(),
        importance_loaded: state.importance.is_some(),
    })
}
