pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod expenses;
pub mod health;
pub mod members;
pub mod metrics;
pub mod orphans;
pub mod reports;

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::models::validation::{humanize, ValidationError};

pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn internal(e: anyhow::Error) -> ApiError {
    error!("{:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

pub(crate) fn not_found(label: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} not found", humanize(label)) })),
    )
}

pub(crate) fn invalid(e: ValidationError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": e.message, "field": e.field })),
    )
}

pub(crate) fn to_json<T: Serialize>(value: T) -> Result<Json<Value>, ApiError> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| internal(e.into()))
}

pub(crate) fn deleted(label: &str) -> Json<Value> {
    Json(json!({ "message": format!("{} deleted successfully", humanize(label)) }))
}
