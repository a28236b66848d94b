use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    middleware::family::FamilyContext,
    models::meal::{ClearMealRequest, UpsertMealRequest},
    services::meals::MealService,
    AppState,
};

pub async fn get_week(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MealService::list_week(&state.db, ctx.family_id)
        .await
        .map(|entries| Json(serde_json::to_value(entries).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn upsert_entry(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<UpsertMealRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MealService::upsert(&state.db, ctx.family_id, ctx.user.user_id, &body)
        .await
        .map(|entry| Json(serde_json::to_value(entry).unwrap()))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn clear_entry(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<ClearMealRequest>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    MealService::clear(&state.db, ctx.family_id, &body)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
