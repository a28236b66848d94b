use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    middleware::rate_limit::check_rate_limit,
    models::{
        auth::AuthenticatedUser,
        user::{
            ChangePasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest, User,
            UserInfo,
        },
    },
    services::auth::AuthService,
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    // Rate limit: 5 signups per hour per email
    let rate_key = format!("rate:register:{}", body.email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 5, 3600).await?;

    AuthService::register(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
        state.config.jwt_expiry_seconds,
        state.config.jwt_refresh_expiry_days,
    )
    .await
    .map(|res| (StatusCode::CREATED, Json(serde_json::to_value(res).unwrap())))
    .map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // Rate limit: 5 attempts per 15 min per email
    let rate_key = format!("rate:login:{}", body.email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 5, 900).await?;

    AuthService::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
        state.config.jwt_expiry_seconds,
        state.config.jwt_refresh_expiry_days,
    )
    .await
    .map(|res| Json(serde_json::to_value(res).unwrap()))
    .map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    AuthService::refresh(
        &state.db,
        &body.refresh_token,
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
        state.config.jwt_expiry_seconds,
        state.config.jwt_refresh_expiry_days,
    )
    .await
    .map(|res| Json(serde_json::to_value(res).unwrap()))
    .map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    AuthService::logout(&state.db, &body.refresh_token, &state.config.jwt_refresh_secret)
        .await
        .map(|_| Json(json!({ "message": "Logged out" })))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user.user_id)
    .fetch_one(&state.db)
    .await
    .map(|u| Json(serde_json::to_value(UserInfo::from(u)).unwrap()))
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    AuthService::change_password(
        &state.db,
        user.user_id,
        &body.current_password,
        &body.new_password,
    )
    .await
    .map(|_| Json(json!({ "message": "Password updated" })))
    .map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })
}
