use sqlx::PgPool;
use uuid::Uuid;

use crate::models::meal::{ClearMealRequest, MealPlanEntry, UpsertMealRequest};

pub struct MealService;

impl MealService {
    /// The whole weekly grid, Sunday-first, breakfast before lunch before dinner.
    pub async fn list_week(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<MealPlanEntry>> {
        let entries = sqlx::query_as::<_, MealPlanEntry>(
            "SELECT * FROM meal_plan
             WHERE family_id = $1
             ORDER BY day_of_week,
                      CASE meal_type
                        WHEN 'breakfast' THEN 0
                        WHEN 'lunch' THEN 1
                        ELSE 2
                      END",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }

    /// Insert or replace the cell at (day_of_week, meal_type).
    pub async fn upsert(
        pool: &PgPool,
        family_id: Uuid,
        updated_by: Uuid,
        req: &UpsertMealRequest,
    ) -> anyhow::Result<MealPlanEntry> {
        anyhow::ensure!(
            (0..=6).contains(&req.day_of_week),
            "day_of_week must be between 0 and 6"
        );
        anyhow::ensure!(!req.name.trim().is_empty(), "Meal name is required");

        let entry = sqlx::query_as::<_, MealPlanEntry>(
            "INSERT INTO meal_plan (family_id, day_of_week, meal_type, name, updated_by)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (family_id, day_of_week, meal_type)
             DO UPDATE SET name = EXCLUDED.name,
                           updated_by = EXCLUDED.updated_by,
                           updated_at = now()
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.day_of_week)
        .bind(req.meal_type.to_string())
        .bind(req.name.trim())
        .bind(updated_by)
        .fetch_one(pool)
        .await?;
        Ok(entry)
    }

    pub async fn clear(
        pool: &PgPool,
        family_id: Uuid,
        req: &ClearMealRequest,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "DELETE FROM meal_plan
             WHERE family_id = $1 AND day_of_week = $2 AND meal_type = $3",
        )
        .bind(family_id)
        .bind(req.day_of_week)
        .bind(req.meal_type.to_string())
        .execute(pool)
        .await?;
        Ok(())
    }
}
