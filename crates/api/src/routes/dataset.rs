//! Reference Dataset Routes

use axum::{
    extract::{Path, State},
    Json,
};
use reference_data::DatasetSummary;
use serde::Serialize;
use std::sync::Arc;

use super::predict::{estimate, PredictionResponse};
use crate::error::ApiError;
use crate::AppState;

/// Model estimate next to the listed price of a dataset row
#[derive(Debug, Serialize)]
pub struct ListingPrediction {
    pub index: usize,
    pub listed_price: Option<f64>,
    pub prediction: PredictionResponse,
}

/// GET /api/v1/listings/:index/predict
pub async fn predict_listing(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ListingPrediction>, ApiError> {
    let listing = state
        .repository
        .listing(index)
        .map_err(|e| ApiError::NotFound(e.to_string()))?;

    let prediction = estimate(&state, &listing.input)?;

    Ok(Json(ListingPrediction {
        index,
        listed_price: listing.price,
        prediction,
    }))
}

/// GET /api/v1/dataset/summary
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<DatasetSummary> {
    Json(state.repository.summary())
}
