use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    db::family_store::PgFamilyStore,
    models::{
        auth::AuthenticatedUser,
        family::{CreateFamilyRequest, JoinFamilyRequest},
    },
    services::family::{FamilyError, FamilyService},
    AppState,
};

fn error_response(e: FamilyError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        FamilyError::EmptyName | FamilyError::EmptyInviteCode => StatusCode::UNPROCESSABLE_ENTITY,
        FamilyError::AlreadyMember => StatusCode::CONFLICT,
        FamilyError::NoFamilyFound => StatusCode::NOT_FOUND,
        FamilyError::NotAMember => StatusCode::FORBIDDEN,
        FamilyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}

/// Membership resolver: tells the client whether to show the app, the create
/// form or the join form.
pub async fn status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let store = PgFamilyStore::new(state.db.clone());
    FamilyService::status(&store, user.user_id)
        .await
        .map(|status| Json(serde_json::to_value(status).unwrap()))
        .map_err(error_response)
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateFamilyRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let store = PgFamilyStore::new(state.db.clone());
    FamilyService::create(&store, user.user_id, &body.name)
        .await
        .map(|group| (StatusCode::CREATED, Json(serde_json::to_value(group).unwrap())))
        .map_err(error_response)
}

pub async fn join(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<JoinFamilyRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let store = PgFamilyStore::new(state.db.clone());
    FamilyService::join(&store, user.user_id, &body.invite_code)
        .await
        .map(|group| (StatusCode::CREATED, Json(serde_json::to_value(group).unwrap())))
        .map_err(error_response)
}
