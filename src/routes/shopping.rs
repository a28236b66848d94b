use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::family::FamilyContext,
    models::shopping::{CreateShoppingItemRequest, ShoppingList},
    services::shopping::ShoppingService,
    AppState,
};

fn parse_list(raw: &str) -> Result<ShoppingList, (StatusCode, Json<Value>)> {
    raw.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unknown shopping list: {raw}") })),
        )
    })
}

pub async fn list_items(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(list): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let list = parse_list(&list)?;
    ShoppingService::list(&state.db, ctx.family_id, list)
        .await
        .map(|items| Json(serde_json::to_value(items).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn add_item(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(list): Path<String>,
    Json(body): Json<CreateShoppingItemRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let list = parse_list(&list)?;
    ShoppingService::add(&state.db, ctx.family_id, list, ctx.user.user_id, &body)
        .await
        .map(|item| (StatusCode::CREATED, Json(serde_json::to_value(item).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn toggle_item(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    ShoppingService::toggle(&state.db, ctx.family_id, id)
        .await
        .map(|item| Json(serde_json::to_value(item).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_item(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    ShoppingService::delete(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn clear_completed(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(list): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let list = parse_list(&list)?;
    ShoppingService::clear_completed(&state.db, ctx.family_id, list)
        .await
        .map(|removed| Json(json!({ "removed": removed })))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
