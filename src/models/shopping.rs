use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The three shopping lists: day-to-day groceries, household needs and wants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingList {
    Grocery,
    Needs,
    Wants,
}

impl std::fmt::Display for ShoppingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShoppingList::Grocery => "grocery",
            ShoppingList::Needs => "needs",
            ShoppingList::Wants => "wants",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ShoppingList {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grocery" => Ok(ShoppingList::Grocery),
            "needs" => Ok(ShoppingList::Needs),
            "wants" => Ok(ShoppingList::Wants),
            _ => Err(anyhow::anyhow!("Unknown shopping list: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub family_id: Uuid,
    pub list: String,
    /// Grocery aisle grouping (produce, dairy, …); unused by needs/wants.
    pub category: Option<String>,
    pub name: String,
    pub completed: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateShoppingItemRequest {
    pub name: String,
    pub category: Option<String>,
}
