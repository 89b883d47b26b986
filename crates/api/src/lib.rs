//! Vehicle Price API Server
//!
//! HTTP JSON API over the price pipeline: option lookup, prediction,
//! sample analysis and feature importance.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;
mod state;

pub use crate::config::{AppConfig, ArtifactConfig, LoggingConfig, ModelConfig, ServerConfig};
pub use error::{ApiError, StartupError};
pub use rate_limit::{create_governor_config, RateLimitConfig};
pub use state::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    /// "onnx" or "mock"
    pub model: String,
    pub listings: usize,
    pub importance_loaded: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, rate_limit: &RateLimitConfig) -> Result<Router, StartupError> {
    let mut predict = Router::new().route("/api/v1/predict", post(routes::predict::predict));
    if rate_limit.enabled {
        predict = predict.layer(GovernorLayer {
            config: create_governor_config(rate_limit)?,
        });
    }

    let router = Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/options", get(routes::options::get_options))
        .route("/api/v1/explain/importance", get(routes::explain::get_importance))
        .route("/api/v1/listings/:index/predict", get(routes::dataset::predict_listing))
        .route("/api/v1/dataset/summary", get(routes::dataset::get_summary))
        .route("/api/v1/model/info", get(routes::model::get_model_info))
        .route("/metrics", get(metrics_handler))
        .merge(predict)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(router)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            model: if state.engine.is_mock() { "mock" } else { "onnx" }.to_string(),
            listings: state.repository.len(),
            importance_loaded: state.importance.is_some(),
        },
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| StartupError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Load artifacts and serve until the listener fails
pub async fn run_server(config: AppConfig) -> Result<(), StartupError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| StartupError::Metrics(e.to_string()))?;

    let state = Arc::new(AppState::from_config(&config)?.with_metrics(handle));
    let app = create_router(state, &config.rate_limit)?;

    info!("Starting API server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
