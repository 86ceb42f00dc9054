use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use super::{deleted, internal, invalid, not_found, to_json, ApiError};
use crate::{
    models::{donation::DonationDraft, query::ListQuery, EntityId},
    services::{donations::DonationService, metrics::record_mutation},
    AppState,
};

/// `GET /donations?type=money&date=2023-12&search=...`
pub async fn list_donations(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery::from_params(params);
    let donations = DonationService::list(&state.db, &query).await.map_err(internal)?;
    to_json(donations)
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    match DonationService::get(&state.db, id).await.map_err(internal)? {
        Some(donation) => to_json(donation),
        None => Err(not_found("donation")),
    }
}

pub async fn create_donation(
    State(state): State<AppState>,
    Json(body): Json<DonationDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    body.validate().map_err(invalid)?;

    let donation = DonationService::create(&state.db, &body).await.map_err(internal)?;
    record_mutation("donations", "create");
    info!(
        "Recorded {} donation #{} from {}",
        donation.donation_type, donation.id, donation.donor_name
    );
    Ok((StatusCode::CREATED, to_json(donation)?))
}

pub async fn update_donation(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(body): Json<DonationDraft>,
) -> Result<Json<Value>, ApiError> {
    body.validate().map_err(invalid)?;

    match DonationService::update(&state.db, id, &body).await.map_err(internal)? {
        Some(donation) => {
            record_mutation("donations", "update");
            to_json(donation)
        }
        None => Err(not_found("donation")),
    }
}

pub async fn delete_donation(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    if !DonationService::delete(&state.db, id).await.map_err(internal)? {
        return Err(not_found("donation"));
    }
    record_mutation("donations", "delete");
    Ok(deleted("donation"))
}
