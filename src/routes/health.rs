use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness probe covering both backing stores.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db = sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string());

    let mut redis = state.redis.clone();
    let cache = redis::cmd("PING")
        .query_async::<String>(&mut redis)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string());

    health_payload(db, cache)
}

fn health_payload(
    db: Result<(), String>,
    redis: Result<(), String>,
) -> (StatusCode, Json<Value>) {
    let status = if db.is_ok() && redis.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let describe = |r: Result<(), String>| match r {
        Ok(()) => "connected".to_string(),
        Err(e) => e,
    };
    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "error" },
            "db": describe(db),
            "redis": describe(redis),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_when_both_stores_respond() {
        let (status, Json(body)) = health_payload(Ok(()), Ok(()));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["db"], "connected");
        assert_eq!(body["redis"], "connected");
    }

    #[test]
    fn unavailable_when_either_store_fails() {
        let (status, Json(body)) = health_payload(Err("connection refused".into()), Ok(()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "error");
        assert_eq!(body["db"], "connection refused");

        let (status, _) = health_payload(Ok(()), Err("timed out".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
