use sqlx::PgPool;
use uuid::Uuid;

use crate::models::recipe::{
    CreateRecipeRequest, Recipe, UpdateRecipeRequest, RECIPE_CATEGORIES,
};

pub struct RecipeService;

impl RecipeService {
    pub async fn list(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            "SELECT * FROM recipes WHERE family_id = $1 ORDER BY category, name",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;
        Ok(recipes)
    }

    pub async fn get(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(
            "SELECT * FROM recipes WHERE id = $1 AND family_id = $2",
        )
        .bind(id)
        .bind(family_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Recipe not found"))?;
        Ok(recipe)
    }

    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        req: &CreateRecipeRequest,
    ) -> anyhow::Result<Recipe> {
        anyhow::ensure!(!req.name.trim().is_empty(), "Recipe name is required");
        anyhow::ensure!(
            RECIPE_CATEGORIES.contains(&req.category.as_str()),
            "Unknown recipe category: {}",
            req.category
        );

        let recipe = sqlx::query_as::<_, Recipe>(
            "INSERT INTO recipes
               (family_id, name, category, ingredients, instructions, notes,
                source, prep_time, cook_time, servings, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.name.trim())
        .bind(&req.category)
        .bind(&req.ingredients)
        .bind(&req.instructions)
        .bind(req.notes.as_deref().unwrap_or(""))
        .bind(&req.source)
        .bind(&req.prep_time)
        .bind(&req.cook_time)
        .bind(req.servings)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(recipe)
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        req: &UpdateRecipeRequest,
    ) -> anyhow::Result<Recipe> {
        if let Some(ref category) = req.category {
            anyhow::ensure!(
                RECIPE_CATEGORIES.contains(&category.as_str()),
                "Unknown recipe category: {category}"
            );
        }

        let recipe = sqlx::query_as::<_, Recipe>(
            "UPDATE recipes
             SET name = COALESCE($1, name),
                 category = COALESCE($2, category),
                 ingredients = COALESCE($3, ingredients),
                 instructions = COALESCE($4, instructions),
                 notes = COALESCE($5, notes),
                 source = COALESCE($6, source),
                 prep_time = COALESCE($7, prep_time),
                 cook_time = COALESCE($8, cook_time),
                 servings = COALESCE($9, servings)
             WHERE id = $10 AND family_id = $11
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.category)
        .bind(&req.ingredients)
        .bind(&req.instructions)
        .bind(&req.notes)
        .bind(&req.source)
        .bind(&req.prep_time)
        .bind(&req.cook_time)
        .bind(req.servings)
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await?;
        Ok(recipe)
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM recipes WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
