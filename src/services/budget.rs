use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::budget::{
    BudgetCategory, BudgetOverview, CategorySpend, CreateCategoryRequest,
    CreateTransactionRequest, Transaction, UpdateCategoryRequest,
};

pub struct BudgetService;

impl BudgetService {
    pub async fn list_categories(
        pool: &PgPool,
        family_id: Uuid,
    ) -> anyhow::Result<Vec<BudgetCategory>> {
        let categories = sqlx::query_as::<_, BudgetCategory>(
            "SELECT * FROM budget_categories WHERE family_id = $1 ORDER BY name",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;
        Ok(categories)
    }

    pub async fn create_category(
        pool: &PgPool,
        family_id: Uuid,
        req: &CreateCategoryRequest,
    ) -> anyhow::Result<BudgetCategory> {
        anyhow::ensure!(!req.name.trim().is_empty(), "Category name is required");
        let category = sqlx::query_as::<_, BudgetCategory>(
            "INSERT INTO budget_categories (family_id, name, monthly_budget)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.name.trim())
        .bind(req.monthly_budget.unwrap_or(0.0))
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn update_category(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> anyhow::Result<BudgetCategory> {
        let category = sqlx::query_as::<_, BudgetCategory>(
            "UPDATE budget_categories
             SET name = COALESCE($1, name),
                 monthly_budget = COALESCE($2, monthly_budget)
             WHERE id = $3 AND family_id = $4
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.monthly_budget)
        .bind(id)
        .bind(family_id)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn delete_category(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM budget_categories WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn list_transactions(
        pool: &PgPool,
        family_id: Uuid,
    ) -> anyhow::Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions
             WHERE family_id = $1
             ORDER BY occurred_on DESC, created_at DESC",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;
        Ok(transactions)
    }

    pub async fn create_transaction(
        pool: &PgPool,
        family_id: Uuid,
        user_id: Uuid,
        req: &CreateTransactionRequest,
    ) -> anyhow::Result<Transaction> {
        anyhow::ensure!(!req.description.trim().is_empty(), "Description is required");
        anyhow::ensure!(req.amount > 0.0, "Amount must be positive");

        let transaction = sqlx::query_as::<_, Transaction>(
            "INSERT INTO transactions
               (family_id, user_id, category_id, description, amount, kind, occurred_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(family_id)
        .bind(user_id)
        .bind(req.category_id)
        .bind(req.description.trim())
        .bind(req.amount)
        .bind(req.kind.to_string())
        .bind(req.occurred_on)
        .fetch_one(pool)
        .await?;
        Ok(transaction)
    }

    pub async fn delete_transaction(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM transactions WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Month totals plus per-category spend. `month` is "YYYY-MM".
    pub async fn overview(
        pool: &PgPool,
        family_id: Uuid,
        month: &str,
    ) -> anyhow::Result<BudgetOverview> {
        let month_start = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid month, expected YYYY-MM: {month}"))?;
        let month_end = next_month(month_start);

        let (total_income, total_expenses): (f64, f64) = sqlx::query_as(
            "SELECT
               COALESCE(SUM(amount) FILTER (WHERE kind = 'income'), 0),
               COALESCE(SUM(amount) FILTER (WHERE kind = 'expense'), 0)
             FROM transactions
             WHERE family_id = $1 AND occurred_on >= $2 AND occurred_on < $3",
        )
        .bind(family_id)
        .bind(month_start)
        .bind(month_end)
        .fetch_one(pool)
        .await?;

        let categories = sqlx::query_as::<_, CategorySpend>(
            "SELECT c.id, c.name, c.monthly_budget,
               COALESCE(SUM(t.amount) FILTER (
                 WHERE t.kind = 'expense'
                   AND t.occurred_on >= $2 AND t.occurred_on < $3
               ), 0) AS spent
             FROM budget_categories c
             LEFT JOIN transactions t ON t.category_id = c.id
             WHERE c.family_id = $1
             GROUP BY c.id, c.name, c.monthly_budget
             ORDER BY c.name",
        )
        .bind(family_id)
        .bind(month_start)
        .bind(month_end)
        .fetch_all(pool)
        .await?;

        Ok(BudgetOverview {
            month: month.to_string(),
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            categories,
        })
    }
}

fn next_month(d: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_month_rolls_over_december() {
        let dec = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(next_month(dec), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let mar = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(next_month(mar), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }
}
