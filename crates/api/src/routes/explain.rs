//! Explanation Routes

use axum::{
    extract::{Query, State},
    Json,
};
use feature_engine::FEATURE_DIMENSION;
use inference_engine::RankedFeature;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Query parameters for the importance endpoint
#[derive(Debug, Deserialize)]
pub struct ImportanceQuery {
    /// Number of features to return
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct ImportanceResponse {
    pub features: Vec<RankedFeature>,
    pub count: usize,
}

/// GET /api/v1/explain/importance?top=N
pub async fn get_importance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImportanceQuery>,
) -> Result<Json<ImportanceResponse>, ApiError> {
    let importance = state
        .importance
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("feature importance table not loaded".to_string()))?;

    let features = importance.ranked(&state.schema, params.top.min(FEATURE_DIMENSION));

    Ok(Json(ImportanceResponse {
        count: features.len(),
        features,
    }))
}
