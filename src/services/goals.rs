use sqlx::PgPool;
use uuid::Uuid;

use crate::models::goal::{
    AddContributionRequest, Contribution, CreateGoalRequest, Goal, GoalWithProgress,
};

pub struct GoalService;

impl GoalService {
    /// All goals with their contribution ledgers and running totals.
    pub async fn list(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<GoalWithProgress>> {
        let goals = sqlx::query_as::<_, Goal>(
            "SELECT * FROM goals WHERE family_id = $1 ORDER BY created_at",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;

        let contributions = sqlx::query_as::<_, Contribution>(
            "SELECT c.* FROM goal_contributions c
             JOIN goals g ON g.id = c.goal_id
             WHERE g.family_id = $1
             ORDER BY c.contributed_on, c.created_at",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;

        let result = goals
            .into_iter()
            .map(|goal| {
                let ledger: Vec<Contribution> = contributions
                    .iter()
                    .filter(|c| c.goal_id == goal.id)
                    .cloned()
                    .collect();
                let total = ledger.iter().map(|c| c.amount).sum();
                GoalWithProgress { goal, contributions: ledger, total }
            })
            .collect();
        Ok(result)
    }

    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        req: &CreateGoalRequest,
    ) -> anyhow::Result<Goal> {
        anyhow::ensure!(!req.name.trim().is_empty(), "Goal name is required");
        anyhow::ensure!(req.target > 0.0, "Target must be positive");

        let goal = sqlx::query_as::<_, Goal>(
            "INSERT INTO goals (family_id, name, description, goal_type, target, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.name.trim())
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(req.goal_type.to_string())
        .bind(req.target)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(goal)
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM goals WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn add_contribution(
        pool: &PgPool,
        family_id: Uuid,
        goal_id: Uuid,
        user_id: Uuid,
        req: &AddContributionRequest,
    ) -> anyhow::Result<Contribution> {
        anyhow::ensure!(req.amount > 0.0, "Contribution amount must be positive");

        // The goal must belong to the caller's family.
        let exists: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM goals WHERE id = $1 AND family_id = $2",
        )
        .bind(goal_id)
        .bind(family_id)
        .fetch_optional(pool)
        .await?;
        anyhow::ensure!(exists.is_some(), "Goal not found");

        let contribution = sqlx::query_as::<_, Contribution>(
            "INSERT INTO goal_contributions (goal_id, user_id, amount, contributed_on)
             VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE))
             RETURNING *",
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(req.amount)
        .bind(req.contributed_on)
        .fetch_one(pool)
        .await?;
        Ok(contribution)
    }
}
