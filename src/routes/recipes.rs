use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::family::FamilyContext,
    models::recipe::{CreateRecipeRequest, UpdateRecipeRequest},
    services::recipes::RecipeService,
    AppState,
};

pub async fn list_recipes(
    State(state): State<AppState>,
    ctx: FamilyContext,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    RecipeService::list(&state.db, ctx.family_id)
        .await
        .map(|recipes| Json(serde_json::to_value(recipes).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn get_recipe(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    RecipeService::get(&state.db, ctx.family_id, id)
        .await
        .map(|recipe| Json(serde_json::to_value(recipe).unwrap()))
        .map_err(|e| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn create_recipe(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    RecipeService::create(&state.db, ctx.family_id, ctx.user.user_id, &body)
        .await
        .map(|recipe| (StatusCode::CREATED, Json(serde_json::to_value(recipe).unwrap())))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn update_recipe(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    RecipeService::update(&state.db, ctx.family_id, id, &body)
        .await
        .map(|recipe| Json(serde_json::to_value(recipe).unwrap()))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    ctx: FamilyContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    RecipeService::delete(&state.db, ctx.family_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
