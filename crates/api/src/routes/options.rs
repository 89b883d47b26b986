//! Form Option Routes

use axum::{
    extract::{Query, State},
    Json,
};
use reference_data::{OptionQuery, OptionSet};
use std::sync::Arc;

use crate::AppState;

fn selected(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/v1/options?brand=&series=&model=
pub async fn get_options(State(state): State<Arc<AppState>>, Query(query): Query<OptionQuery>) -> Json<OptionSet> {
    // `?brand=` means nothing chosen yet
    let query = OptionQuery {
        brand: selected(query.brand),
        series: selected(query.series),
        model: selected(query.model),
    };

    Json(state.repository.options(&query))
}
