use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// GET /health: liveness plus a round-trip to the orphans table.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let probe: Result<i64, _> = sqlx::query_scalar("SELECT COUNT(*) FROM orphans")
        .fetch_one(&state.db)
        .await;
    match probe {
        Ok(orphans) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "db": "connected", "orphans": orphans })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "db": e.to_string() })),
            )
        }
    }
}
