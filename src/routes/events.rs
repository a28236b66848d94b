use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::family::FamilyContext,
    models::event::{CreateEventRequest, UpdateEventRequest},
    services::events::EventService,
    AppState,
};

pub async fn list_events(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    EventService::list(&state.db, ctx.family_id)
        .await
        .map(|events| Json(serde_json::to_value(events).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn create_event(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    EventService::create(&state.db, ctx.family_id, ctx.user.user_id, &body)
        .await
        .map(|event| (StatusCode::CREATED, Json(serde_json::to_value(event).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn update_event(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    EventService::update(&state.db, ctx.family_id, id, &body)
        .await
        .map(|event| Json(serde_json::to_value(event).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_event(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    EventService::delete(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
