use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::family::FamilyContext,
    models::goal::{AddContributionRequest, CreateGoalRequest},
    services::goals::GoalService,
    AppState,
};

pub async fn list_goals(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    GoalService::list(&state.db, ctx.family_id)
        .await
        .map(|goals| Json(serde_json::to_value(goals).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn create_goal(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    GoalService::create(&state.db, ctx.family_id, ctx.user.user_id, &body)
        .await
        .map(|goal| (StatusCode::CREATED, Json(serde_json::to_value(goal).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_goal(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    GoalService::delete(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn add_contribution(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
    Json(body): Json<AddContributionRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    GoalService::add_contribution(&state.db, ctx.family_id, id, ctx.user.user_id, &body)
        .await
        .map(|c| (StatusCode::CREATED, Json(serde_json::to_value(c).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
