use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::models::auth::{AuthenticatedUser, Claims};

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid Authorization header format"))?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "JWT secret not configured"))?;

        decode_access_token(token, &secret.0)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthenticatedUser, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let claims = data.claims;

    Ok(AuthenticatedUser {
        user_id: claims.sub.parse()?,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AuthService;
    use uuid::Uuid;

    #[test]
    fn decodes_token_it_issued() {
        let user_id = Uuid::new_v4();
        let token =
            AuthService::generate_access_token(user_id, "kim@example.com", "secret", 900).unwrap();

        let user = decode_access_token(&token, "secret").unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "kim@example.com");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token =
            AuthService::generate_access_token(Uuid::new_v4(), "kim@example.com", "secret", 900)
                .unwrap();
        assert!(decode_access_token(&token, "other").is_err());
    }
}
