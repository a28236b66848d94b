use sqlx::PgPool;
use uuid::Uuid;

use crate::models::shopping::{CreateShoppingItemRequest, ShoppingItem, ShoppingList};

pub struct ShoppingService;

impl ShoppingService {
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        list: ShoppingList,
    ) -> anyhow::Result<Vec<ShoppingItem>> {
        let items = sqlx::query_as::<_, ShoppingItem>(
            "SELECT * FROM shopping_items
             WHERE family_id = $1 AND list = $2
             ORDER BY completed, created_at",
        )
        .bind(family_id)
        .bind(list.to_string())
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn add(
        pool: &PgPool,
        family_id: Uuid,
        list: ShoppingList,
        created_by: Uuid,
        req: &CreateShoppingItemRequest,
    ) -> anyhow::Result<ShoppingItem> {
        anyhow::ensure!(!req.name.trim().is_empty(), "Item name is required");
        let item = sqlx::query_as::<_, ShoppingItem>(
            "INSERT INTO shopping_items (family_id, list, category, name, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(family_id)
        .bind(list.to_string())
        .bind(&req.category)
        .bind(req.name.trim())
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn toggle(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<ShoppingItem> {
        let item = sqlx::query_as::<_, ShoppingItem>(
            "UPDATE shopping_items SET completed = NOT completed
             WHERE id = $1 AND family_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM shopping_items WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove every checked-off item from one list.
    pub async fn clear_completed(
        pool: &PgPool,
        family_id: Uuid,
        list: ShoppingList,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            "DELETE FROM shopping_items
             WHERE family_id = $1 AND list = $2 AND completed = TRUE",
        )
        .bind(family_id)
        .bind(list.to_string())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
