use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskCategory {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub family_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub assigned_to: Option<Uuid>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Category with its tasks, as rendered by the tasks page.
#[derive(Debug, Serialize)]
pub struct CategoryWithTasks {
    #[serde(flatten)]
    pub category: TaskCategory,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub category_id: Uuid,
    pub title: String,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub completed: Option<bool>,
}
