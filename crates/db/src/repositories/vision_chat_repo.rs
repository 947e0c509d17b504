//! Repository for the `vision_chats` table.

use helm_core::types::{RecordId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vision::VisionChat;

const COLUMNS: &str = "id, user_id, message, role, created_at, updated_at";

pub struct VisionChatRepo;

impl VisionChatRepo {
    /// Append one chat turn.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        id: Option<RecordId>,
        message: &str,
        role: &str,
    ) -> Result<VisionChat, sqlx::Error> {
        let query = format!(
            "INSERT INTO vision_chats (id, user_id, message, role) VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VisionChat>(&query)
            .bind(id.unwrap_or_else(Uuid::now_v7))
            .bind(user_id)
            .bind(message)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
    ) -> Result<Option<VisionChat>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vision_chats WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, VisionChat>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The last `limit` turns, oldest first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<VisionChat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                SELECT {COLUMNS} FROM vision_chats WHERE user_id = $1 \
                ORDER BY created_at DESC, id DESC LIMIT $2 \
             ) recent \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, VisionChat>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vision_chats WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
