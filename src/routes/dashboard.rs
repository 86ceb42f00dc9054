use axum::{extract::State, Json};
use serde_json::Value;

use super::{internal, to_json, ApiError};
use crate::{services::stats::StatsService, AppState};

/// GET /dashboard/stats
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = StatsService::dashboard(&state.db).await.map_err(internal)?;
    to_json(stats)
}

/// GET /donations/stats
pub async fn donation_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = StatsService::donations(&state.db).await.map_err(internal)?;
    to_json(stats)
}
