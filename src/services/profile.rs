use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{Profile, UpdateProfileRequest};

/// Simple sanity check for a `#rrggbb` hex color.
fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub struct ProfileService;

impl ProfileService {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Profile> {
        // The profile row is created at registration; insert lazily for
        // accounts that predate it.
        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING *",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(profile)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> anyhow::Result<Profile> {
        if let Some(ref color) = req.color {
            anyhow::ensure!(is_hex_color(color), "Invalid color, expected #rrggbb");
        }
        if let Some(ref emoji) = req.emoji {
            anyhow::ensure!(!emoji.trim().is_empty(), "Emoji cannot be empty");
        }

        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles
             SET color = COALESCE($1, color),
                 emoji = COALESCE($2, emoji),
                 updated_at = now()
             WHERE user_id = $3
             RETURNING *",
        )
        .bind(&req.color)
        .bind(&req.emoji)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_validation() {
        assert!(is_hex_color("#9b87f5"));
        assert!(is_hex_color("#FFFFFF"));
        assert!(!is_hex_color("9b87f5"));
        assert!(!is_hex_color("#9b87f"));
        assert!(!is_hex_color("#9b87fg"));
    }
}
