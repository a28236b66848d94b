use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    auth::{Claims, RefreshClaims},
    user::{LoginResponse, RefreshToken, User},
};

pub struct AuthService;

impl AuthService {
    /// Open signup: create the account plus its default display profile and
    /// sign the new user straight in.
    pub async fn register(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> anyhow::Result<LoginResponse> {
        let email = email.trim().to_lowercase();
        anyhow::ensure!(email.contains('@'), "Invalid email address");
        anyhow::ensure!(password.len() >= 8, "Password must be at least 8 characters");

        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            anyhow::bail!("An account with this email already exists");
        }

        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING id, email, password_hash, created_at, updated_at",
        )
        .bind(&email)
        .bind(&hash)
        .fetch_one(pool)
        .await?;

        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(pool)
            .await?;

        Self::issue_tokens(pool, user, jwt_secret, refresh_secret, access_ttl, refresh_ttl_days)
            .await
    }

    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> anyhow::Result<LoginResponse> {
        let email = email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Invalid credentials"))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| anyhow::anyhow!("Invalid credentials"))?;
        if !valid {
            anyhow::bail!("Invalid credentials");
        }

        Self::issue_tokens(pool, user, jwt_secret, refresh_secret, access_ttl, refresh_ttl_days)
            .await
    }

    /// Rotate a refresh token: validate the presented token, revoke its row
    /// and issue a fresh access/refresh pair.
    pub async fn refresh(
        pool: &PgPool,
        refresh_token: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> anyhow::Result<LoginResponse> {
        let claims = Self::decode_refresh_token(refresh_token, refresh_secret)?;
        let token_id: Uuid = claims.jti.parse()?;
        let user_id: Uuid = claims.sub.parse()?;

        let row = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token_hash, expires_at, revoked, created_at
             FROM refresh_tokens WHERE id = $1 AND user_id = $2",
        )
        .bind(token_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Unknown refresh token"))?;

        if row.revoked || row.expires_at < Utc::now() {
            anyhow::bail!("Refresh token expired or revoked");
        }
        if !bcrypt::verify(refresh_token, &row.token_hash).unwrap_or(false) {
            anyhow::bail!("Refresh token mismatch");
        }

        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
            .bind(token_id)
            .execute(pool)
            .await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Self::issue_tokens(pool, user, jwt_secret, refresh_secret, access_ttl, refresh_ttl_days)
            .await
    }

    pub async fn logout(
        pool: &PgPool,
        refresh_token: &str,
        refresh_secret: &str,
    ) -> anyhow::Result<()> {
        let claims = Self::decode_refresh_token(refresh_token, refresh_secret)?;
        let token_id: Uuid = claims.jti.parse()?;
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
            .bind(token_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            new_password.len() >= 8,
            "Password must be at least 8 characters"
        );

        let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        if !bcrypt::verify(current_password, &hash).unwrap_or(false) {
            anyhow::bail!("Current password is incorrect");
        }

        let new_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(new_hash)
            .bind(user_id)
            .execute(pool)
            .await?;

        // Force re-login everywhere else.
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    async fn issue_tokens(
        pool: &PgPool,
        user: User,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> anyhow::Result<LoginResponse> {
        let access_token =
            Self::generate_access_token(user.id, &user.email, jwt_secret, access_ttl)?;
        let (refresh_token, refresh_id) =
            Self::generate_refresh_token(user.id, refresh_secret, refresh_ttl_days)?;

        // Only a hash of the refresh token is stored; low cost is fine for a
        // 256-bit random input.
        let hash = bcrypt::hash(&refresh_token, 8)?;
        let expires_at = Utc::now() + chrono::Duration::days(refresh_ttl_days as i64);
        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(refresh_id)
        .bind(user.id)
        .bind(hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    pub fn generate_access_token(
        user_id: Uuid,
        email: &str,
        secret: &str,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    fn generate_refresh_token(
        user_id: Uuid,
        secret: &str,
        ttl_days: u64,
    ) -> anyhow::Result<(String, Uuid)> {
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp() as usize;
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: id.to_string(),
            iat: now,
            exp: now + (ttl_days * 24 * 3600) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok((token, id))
    }

    fn decode_refresh_token(token: &str, secret: &str) -> anyhow::Result<RefreshClaims> {
        let key = jsonwebtoken::DecodingKey::from_secret(secret.as_bytes());
        let mut validation = jsonwebtoken::Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = jsonwebtoken::decode::<RefreshClaims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}
