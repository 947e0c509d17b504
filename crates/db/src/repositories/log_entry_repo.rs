//! Repository for the `log_entries` table.

use helm_core::types::{RecordId, Timestamp, UserId};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::log_entry::{CreateLogEntry, LogEntry, UpdateLogEntry};

const COLUMNS: &str = "id, user_id, content, transcription, audio_url, created_at, updated_at";

pub struct LogEntryRepo;

impl LogEntryRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateLogEntry,
    ) -> Result<LogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO log_entries (id, user_id, content, transcription, audio_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(input.id.unwrap_or_else(Uuid::now_v7))
            .bind(user_id)
            .bind(input.content.as_ref().map(Json))
            .bind(&input.transcription)
            .bind(&input.audio_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
    ) -> Result<Option<LogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM log_entries WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent entries, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM log_entries WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The newest entry created within `[start, end)`.
    pub async fn find_for_day(
        pool: &PgPool,
        user_id: UserId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<LogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM log_entries \
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_optional(pool)
            .await
    }

    /// Update a log entry. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        input: &UpdateLogEntry,
    ) -> Result<Option<LogEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE log_entries SET \
                content = COALESCE($3, content), \
                transcription = COALESCE($4, transcription), \
                audio_url = COALESCE($5, audio_url) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.content.as_ref().map(Json))
            .bind(&input.transcription)
            .bind(&input.audio_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM log_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
