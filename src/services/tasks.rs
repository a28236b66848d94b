use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::{
    CategoryWithTasks, CreateTaskCategoryRequest, CreateTaskRequest, Task, TaskCategory,
    UpdateTaskRequest,
};

pub struct TaskService;

impl TaskService {
    /// Categories with their tasks, in creation order.
    pub async fn list(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<CategoryWithTasks>> {
        let categories = sqlx::query_as::<_, TaskCategory>(
            "SELECT * FROM task_categories WHERE family_id = $1 ORDER BY created_at",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE family_id = $1 ORDER BY completed, created_at",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;

        let result = categories
            .into_iter()
            .map(|category| {
                let own: Vec<Task> = tasks
                    .iter()
                    .filter(|t| t.category_id == category.id)
                    .cloned()
                    .collect();
                CategoryWithTasks { category, tasks: own }
            })
            .collect();
        Ok(result)
    }

    pub async fn create_category(
        pool: &PgPool,
        family_id: Uuid,
        req: &CreateTaskCategoryRequest,
    ) -> anyhow::Result<TaskCategory> {
        anyhow::ensure!(!req.name.trim().is_empty(), "Category name is required");
        let category = sqlx::query_as::<_, TaskCategory>(
            "INSERT INTO task_categories (family_id, name)
             VALUES ($1, $2)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.name.trim())
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn delete_category(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM task_categories WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn create_task(
        pool: &PgPool,
        family_id: Uuid,
        req: &CreateTaskRequest,
    ) -> anyhow::Result<Task> {
        anyhow::ensure!(!req.title.trim().is_empty(), "Task title is required");

        let category_ok: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM task_categories WHERE id = $1 AND family_id = $2",
        )
        .bind(req.category_id)
        .bind(family_id)
        .fetch_optional(pool)
        .await?;
        anyhow::ensure!(category_ok.is_some(), "Category not found");

        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (family_id, category_id, title, assigned_to)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.category_id)
        .bind(req.title.trim())
        .bind(req.assigned_to)
        .fetch_one(pool)
        .await?;
        Ok(task)
    }

    pub async fn update_task(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        req: &UpdateTaskRequest,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET title = COALESCE($1, title),
                 assigned_to = COALESCE($2, assigned_to),
                 completed = COALESCE($3, completed)
             WHERE id = $4 AND family_id = $5
             RETURNING *",
        )
        .bind(&req.title)
        .bind(req.assigned_to)
        .bind(req.completed)
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await?;
        Ok(task)
    }

    pub async fn toggle_task(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET completed = NOT completed
             WHERE id = $1 AND family_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await?;
        Ok(task)
    }

    pub async fn delete_task(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
