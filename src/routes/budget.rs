use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::family::FamilyContext,
    models::budget::{CreateCategoryRequest, CreateTransactionRequest, UpdateCategoryRequest},
    services::budget::BudgetService,
    AppState,
};

#[derive(Deserialize)]
pub struct OverviewQuery {
    pub month: Option<String>, // "YYYY-MM", defaults to the current month
}

pub async fn overview(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let now = Utc::now();
    let month = query
        .month
        .unwrap_or_else(|| format!("{:04}-{:02}", now.year(), now.month()));

    BudgetService::overview(&state.db, ctx.family_id, &month)
        .await
        .map(|o| Json(serde_json::to_value(o).unwrap()))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn list_categories(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    BudgetService::list_categories(&state.db, ctx.family_id)
        .await
        .map(|c| Json(serde_json::to_value(c).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn create_category(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    BudgetService::create_category(&state.db, ctx.family_id, &body)
        .await
        .map(|c| (StatusCode::CREATED, Json(serde_json::to_value(c).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn update_category(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    BudgetService::update_category(&state.db, ctx.family_id, id, &body)
        .await
        .map(|c| Json(serde_json::to_value(c).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_category(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    BudgetService::delete_category(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn list_transactions(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    BudgetService::list_transactions(&state.db, ctx.family_id)
        .await
        .map(|t| Json(serde_json::to_value(t).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn create_transaction(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    BudgetService::create_transaction(&state.db, ctx.family_id, ctx.user.user_id, &body)
        .await
        .map(|t| (StatusCode::CREATED, Json(serde_json::to_value(t).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    BudgetService::delete_transaction(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
