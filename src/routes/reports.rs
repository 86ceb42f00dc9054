use axum::{extract::State, Json};
use serde_json::Value;

use super::{internal, to_json, ApiError};
use crate::{services::stats::StatsService, AppState};

pub async fn get_reports(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    StatsService::report(&state.db)
        .await
        .map_err(internal)
        .and_then(to_json)
}
