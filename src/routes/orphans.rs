use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::{deleted, internal, invalid, not_found, to_json, ApiError};
use crate::{
    models::{orphan::OrphanDraft, query::ListQuery, EntityId},
    services::{metrics::record_mutation, orphans::OrphanService},
    AppState,
};

pub async fn list_orphans(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery::from_params(params);
    let orphans = OrphanService::list(&state.db, &query).await.map_err(internal)?;
    to_json(orphans)
}

pub async fn get_orphan(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    match OrphanService::get(&state.db, id).await.map_err(internal)? {
        Some(orphan) => to_json(orphan),
        None => Err(not_found("orphan")),
    }
}

pub async fn create_orphan(
    State(state): State<AppState>,
    Json(body): Json<OrphanDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    body.validate().map_err(invalid)?;

    let orphan = OrphanService::create(&state.db, &body).await.map_err(internal)?;
    record_mutation("orphans", "create");
    Ok((StatusCode::CREATED, to_json(orphan)?))
}

/// Full replace. A body carrying only `is_adopted` still resolves to a
/// status.
pub async fn update_orphan(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(body): Json<OrphanDraft>,
) -> Result<Json<Value>, ApiError> {
    body.validate().map_err(invalid)?;

    match OrphanService::update(&state.db, id, &body).await.map_err(internal)? {
        Some(orphan) => {
            record_mutation("orphans", "update");
            to_json(orphan)
        }
        None => Err(not_found("orphan")),
    }
}

pub async fn delete_orphan(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    if !OrphanService::delete(&state.db, id).await.map_err(internal)? {
        return Err(not_found("orphan"));
    }
    record_mutation("orphans", "delete");
    Ok(deleted("orphan"))
}
