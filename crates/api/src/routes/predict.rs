//! Prediction Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use data_validator::{clean_input, RawVehicleInput, VehicleAttributes};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// Price estimate returned to clients
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub latency_ms: u64,
    pub timestamp_ms: u64,
    /// The input after cleaning, as fed to the encoder
    pub attributes: VehicleAttributes,
}

/// Clean, encode and price one form
pub(crate) fn estimate(state: &AppState, input: &RawVehicleInput) -> Result<PredictionResponse, ApiError> {
    let result = run_pipeline(state, input);

    match &result {
        Ok(response) => {
            metrics::counter!("predictions_total").increment(1);
            metrics::histogram!("prediction_latency_ms").record(response.latency_ms as f64);
        }
        Err(_) => metrics::counter!("prediction_failures_total").increment(1),
    }

    result
}

fn run_pipeline(state: &AppState, input: &RawVehicleInput) -> Result<PredictionResponse, ApiError> {
    let attributes = clean_input(input, &state.validator)?;
    let features = state.assembler.assemble(&attributes)?;
    let result = state.engine.predict(&features)?;

    info!(
        "Predicted {:.0} for {} {} {} ({}ms)",
        result.prediction.price, attributes.brand, attributes.series, attributes.model, result.latency_ms
    );

    Ok(PredictionResponse {
        price: result.prediction.price,
        lower_bound: result.prediction.lower_bound,
        upper_bound: result.prediction.upper_bound,
        latency_ms: result.latency_ms,
        timestamp_ms: result.prediction.timestamp_ms,
        attributes,
    })
}

/// POST /api/v1/predict
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawVehicleInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(input) = payload?;
    estimate(&state, &input).map(Json)
}
