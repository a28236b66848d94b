use sqlx::PgPool;
use uuid::Uuid;

use crate::models::message::{
    CreateBoardRequest, Message, MessageBoard, MessageWithSender, PostMessageRequest,
};

pub struct MessageService;

impl MessageService {
    pub async fn list_boards(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<MessageBoard>> {
        let boards = sqlx::query_as::<_, MessageBoard>(
            "SELECT * FROM message_boards WHERE family_id = $1 ORDER BY created_at",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await?;
        Ok(boards)
    }

    pub async fn create_board(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        req: &CreateBoardRequest,
    ) -> anyhow::Result<MessageBoard> {
        anyhow::ensure!(!req.name.trim().is_empty(), "Board name is required");
        let board = sqlx::query_as::<_, MessageBoard>(
            "INSERT INTO message_boards (family_id, name, created_by)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(family_id)
        .bind(req.name.trim())
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(board)
    }

    pub async fn delete_board(pool: &PgPool, family_id: Uuid, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM message_boards WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Board thread, oldest first, with each sender's display profile.
    pub async fn list_messages(
        pool: &PgPool,
        family_id: Uuid,
        board_id: Uuid,
    ) -> anyhow::Result<Vec<MessageWithSender>> {
        Self::require_board(pool, family_id, board_id).await?;
        let messages = sqlx::query_as::<_, MessageWithSender>(
            "SELECT m.id, m.board_id, m.user_id, m.content, m.created_at,
                    u.email AS sender_email,
                    p.color AS sender_color,
                    p.emoji AS sender_emoji
             FROM messages m
             JOIN users u ON u.id = m.user_id
             LEFT JOIN profiles p ON p.user_id = m.user_id
             WHERE m.board_id = $1
             ORDER BY m.created_at",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;
        Ok(messages)
    }

    pub async fn post_message(
        pool: &PgPool,
        family_id: Uuid,
        board_id: Uuid,
        user_id: Uuid,
        req: &PostMessageRequest,
    ) -> anyhow::Result<Message> {
        anyhow::ensure!(!req.content.trim().is_empty(), "Message cannot be empty");
        Self::require_board(pool, family_id, board_id).await?;

        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (board_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(board_id)
        .bind(user_id)
        .bind(req.content.trim())
        .fetch_one(pool)
        .await?;
        Ok(message)
    }

    async fn require_board(pool: &PgPool, family_id: Uuid, board_id: Uuid) -> anyhow::Result<()> {
        let exists: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM message_boards WHERE id = $1 AND family_id = $2",
        )
        .bind(board_id)
        .bind(family_id)
        .fetch_optional(pool)
        .await?;
        anyhow::ensure!(exists.is_some(), "Board not found");
        Ok(())
    }
}
