use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FamilyRole {
    Owner,
    Member,
}

impl std::fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FamilyRole::Owner => "owner",
            FamilyRole::Member => "member",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FamilyRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(FamilyRole::Owner),
            "member" => Ok(FamilyRole::Member),
            _ => Err(anyhow::anyhow!("Unknown family role: {s}")),
        }
    }
}

/// The tenant unit that scopes all shared household data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FamilyGroup {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
}

/// Membership join record linking a user to a family group with a role.
/// Stored as TEXT in queries (role column) — parse with [`FamilyRole`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FamilyMember {
    pub id: Uuid,
    pub family_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Insert payload for a family group; id and created_at are store-assigned.
#[derive(Debug, Clone)]
pub struct NewFamilyGroup {
    pub name: String,
    pub owner_id: Uuid,
    pub invite_code: String,
}

/// Insert payload for a membership row.
#[derive(Debug, Clone)]
pub struct NewFamilyMember {
    pub family_id: Uuid,
    pub user_id: Uuid,
    pub role: FamilyRole,
}

// Request/Response DTOs

#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinFamilyRequest {
    pub invite_code: String,
}

/// Resolver output: either the caller's current family, or which setup form
/// (create vs. join) the client should show.
#[derive(Debug, Serialize)]
pub struct FamilyStatus {
    pub is_family_member: bool,
    /// Only meaningful when `is_family_member` is false: true when no family
    /// group exists yet, so the caller should offer the create form.
    pub is_first_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<FamilyGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<FamilyMember>,
}
