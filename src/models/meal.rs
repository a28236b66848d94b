use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(anyhow::anyhow!("Unknown meal type: {s}")),
        }
    }
}

/// One cell of the weekly planner grid, keyed by (day_of_week, meal_type).
/// day_of_week is 0–6 for Sunday–Saturday.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlanEntry {
    pub id: Uuid,
    pub family_id: Uuid,
    pub day_of_week: i16,
    pub meal_type: String,
    pub name: String,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertMealRequest {
    pub day_of_week: i16,
    pub meal_type: MealType,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearMealRequest {
    pub day_of_week: i16,
    pub meal_type: MealType,
}
