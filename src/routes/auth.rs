use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    models::auth::{LoginRequest, LoginResponse},
    services::{
        auth::{AuthService, LoginOutcome},
        metrics::LOGINS_COUNTER,
    },
    AppState,
};

fn rejected(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "message": message })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<Value>)> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        LOGINS_COUNTER.with_label_values(&["rejected"]).inc();
        return Err(rejected(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    match AuthService::login(&state.config, &body.username, &body.password) {
        LoginOutcome::Success { username } => {
            LOGINS_COUNTER.with_label_values(&["success"]).inc();
            info!("Admin login: {}", username);
            Ok(Json(LoginResponse {
                success: true,
                username: Some(username),
                message: Some("Login successful".to_string()),
            }))
        }
        LoginOutcome::InvalidCredentials => {
            LOGINS_COUNTER.with_label_values(&["failure"]).inc();
            warn!("Failed login attempt for {}", body.username);
            Err(rejected(StatusCode::UNAUTHORIZED, "Invalid credentials"))
        }
    }
}
