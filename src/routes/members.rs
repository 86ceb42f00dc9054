use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::{deleted, internal, invalid, not_found, to_json, ApiError};
use crate::{
    models::{member::MemberDraft, query::ListQuery, EntityId},
    services::{members::MemberService, metrics::record_mutation},
    AppState,
};

pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery::from_params(params);
    let members = MemberService::list(&state.db, &query).await.map_err(internal)?;
    to_json(members)
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    match MemberService::get(&state.db, id).await.map_err(internal)? {
        Some(member) => to_json(member),
        None => Err(not_found("member")),
    }
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(body): Json<MemberDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    body.validate().map_err(invalid)?;

    let member = MemberService::create(&state.db, &body).await.map_err(internal)?;
    record_mutation("members", "create");
    Ok((StatusCode::CREATED, to_json(member)?))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(body): Json<MemberDraft>,
) -> Result<Json<Value>, ApiError> {
    body.validate().map_err(invalid)?;

    match MemberService::update(&state.db, id, &body).await.map_err(internal)? {
        Some(member) => {
            record_mutation("members", "update");
            to_json(member)
        }
        None => Err(not_found("member")),
    }
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    if !MemberService::delete(&state.db, id).await.map_err(internal)? {
        return Err(not_found("member"));
    }
    record_mutation("members", "delete");
    Ok(deleted("member"))
}
