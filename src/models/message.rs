use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named discussion thread on the family message board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageBoard {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Message enriched with the sender's display profile.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageWithSender {
    pub id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender_email: String,
    pub sender_color: Option<String>,
    pub sender_emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}
