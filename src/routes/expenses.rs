use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::{deleted, internal, invalid, not_found, to_json, ApiError};
use crate::{
    models::{expense::ExpenseDraft, query::ListQuery, EntityId},
    services::{expenses::ExpenseService, metrics::record_mutation},
    AppState,
};

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery::from_params(params);
    let expenses = ExpenseService::list(&state.db, &query).await.map_err(internal)?;
    to_json(expenses)
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    match ExpenseService::get(&state.db, id).await.map_err(internal)? {
        Some(expense) => to_json(expense),
        None => Err(not_found("expense")),
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(body): Json<ExpenseDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    body.validate().map_err(invalid)?;

    let expense = ExpenseService::create(&state.db, &body).await.map_err(internal)?;
    record_mutation("expenses", "create");
    Ok((StatusCode::CREATED, to_json(expense)?))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(body): Json<ExpenseDraft>,
) -> Result<Json<Value>, ApiError> {
    body.validate().map_err(invalid)?;

    match ExpenseService::update(&state.db, id, &body).await.map_err(internal)? {
        Some(expense) => {
            record_mutation("expenses", "update");
            to_json(expense)
        }
        None => Err(not_found("expense")),
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Value>, ApiError> {
    if !ExpenseService::delete(&state.db, id).await.map_err(internal)? {
        return Err(not_found("expense"));
    }
    record_mutation("expenses", "delete");
    Ok(deleted("expense"))
}
