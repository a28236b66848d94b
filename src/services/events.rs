use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};

pub struct EventService;

impl EventService {
    /// Calendar listing, soonest first.
    pub async fn list(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE family_id = $1 ORDER BY start_at",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;
        Ok(events)
    }

    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        req: &CreateEventRequest,
    ) -> anyhow::Result<Event> {
        anyhow::ensure!(!req.title.trim().is_empty(), "Event title is required");
        if let Some(end) = req.end_at {
            anyhow::ensure!(end >= req.start_at, "Event cannot end before it starts");
        }

        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (family_id, title, description, start_at, end_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(req.start_at)
        .bind(req.end_at)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(event)
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        req: &UpdateEventRequest,
    ) -> anyhow::Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 start_at = COALESCE($3, start_at),
                 end_at = COALESCE($4, end_at)
             WHERE id = $5 AND family_id = $6
             RETURNING *",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.start_at)
        .bind(req.end_at)
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await?;
        Ok(event)
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM events WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
