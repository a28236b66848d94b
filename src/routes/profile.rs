use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    models::{auth::AuthenticatedUser, user::UpdateProfileRequest},
    services::profile::ProfileService,
    AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    ProfileService::get(&state.db, user.user_id)
        .await
        .map(|profile| Json(serde_json::to_value(profile).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    ProfileService::update(&state.db, user.user_id, &body)
        .await
        .map(|profile| Json(serde_json::to_value(profile).unwrap()))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
