use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::family::FamilyContext,
    models::message::{CreateBoardRequest, PostMessageRequest},
    services::messages::MessageService,
    AppState,
};

pub async fn list_boards(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MessageService::list_boards(&state.db, ctx.family_id)
        .await
        .map(|boards| Json(serde_json::to_value(boards).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn create_board(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    MessageService::create_board(&state.db, ctx.family_id, ctx.user.user_id, &body)
        .await
        .map(|board| (StatusCode::CREATED, Json(serde_json::to_value(board).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_board(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    MessageService::delete_board(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn list_messages(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MessageService::list_messages(&state.db, ctx.family_id, board_id)
        .await
        .map(|messages| Json(serde_json::to_value(messages).unwrap()))
        .map_err(|e| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn post_message(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(board_id): Path<Uuid>,
    Json(body): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    MessageService::post_message(&state.db, ctx.family_id, board_id, ctx.user.user_id, &body)
        .await
        .map(|m| (StatusCode::CREATED, Json(serde_json::to_value(m).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
