use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(anyhow::anyhow!("Unknown transaction kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub monthly_budget: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub family_id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub description: String,
    pub amount: f64,
    pub kind: String,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Per-category spend against the configured monthly budget.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategorySpend {
    pub id: Uuid,
    pub name: String,
    pub monthly_budget: f64,
    pub spent: f64,
}

/// Month summary shown on the budget overview tab.
#[derive(Debug, Serialize)]
pub struct BudgetOverview {
    pub month: String, // "YYYY-MM"
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub categories: Vec<CategorySpend>,
}

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub monthly_budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub monthly_budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub category_id: Option<Uuid>,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub occurred_on: NaiveDate,
}
