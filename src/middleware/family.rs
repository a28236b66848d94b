use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    db::family_store::PgFamilyStore,
    models::{auth::AuthenticatedUser, family::FamilyRole},
    services::family::{FamilyError, FamilyService},
    AppState,
};

/// Resolves the caller's family membership. Handlers for family-scoped data
/// take this instead of a raw user so a caller with no family is rejected
/// before any feature query runs.
#[derive(Debug, Clone)]
pub struct FamilyContext {
    pub family_id: Uuid,
    pub user: AuthenticatedUser,
    pub role: FamilyRole,
}

impl FromRequestParts<AppState> for FamilyContext {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state)
            .await
            .map_err(|(code, msg)| (code, Json(json!({ "error": msg }))))?;

        let store = PgFamilyStore::new(state.db.clone());
        let membership = FamilyService::require_membership(&store, user.user_id)
            .await
            .map_err(|e| match e {
                FamilyError::NotAMember => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": e.to_string() })),
                ),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": other.to_string() })),
                ),
            })?;

        let role = membership.role.parse().unwrap_or(FamilyRole::Member);
        Ok(FamilyContext {
            family_id: membership.family_id,
            user,
            role,
        })
    }
}
