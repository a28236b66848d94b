use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What a goal counts: dollars saved, hours spent, steps walked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Money,
    Hours,
    Steps,
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GoalType::Money => "money",
            GoalType::Hours => "hours",
            GoalType::Steps => "steps",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for GoalType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "money" => Ok(GoalType::Money),
            "hours" => Ok(GoalType::Hours),
            "steps" => Ok(GoalType::Steps),
            _ => Err(anyhow::anyhow!("Unknown goal type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub description: String,
    pub goal_type: String,
    pub target: f64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contribution {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub contributed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Goal with its contribution ledger and running total.
#[derive(Debug, Serialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub contributions: Vec<Contribution>,
    pub total: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddContributionRequest {
    pub amount: f64,
    pub contributed_on: Option<NaiveDate>,
}
