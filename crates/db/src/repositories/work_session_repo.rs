//! Repository for the `work_sessions` table.
//!
//! The partial unique index `uq_work_sessions_active_per_user` allows at
//! most one open session per user; starting a second one fails with a
//! unique violation that the API maps to 409.

use helm_core::timer::DEFAULT_TARGET_MINUTES;
use helm_core::types::{RecordId, Timestamp, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::work_session::{StartWorkSession, WorkSession};

const COLUMNS: &str = "\
    id, user_id, initiative_id, started_at, ended_at, duration_minutes, \
    completed, created_at, updated_at";

pub struct WorkSessionRepo;

impl WorkSessionRepo {
    /// Open a new session starting now.
    pub async fn start(
        pool: &PgPool,
        user_id: UserId,
        input: &StartWorkSession,
    ) -> Result<WorkSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_sessions (id, user_id, initiative_id, duration_minutes, completed) \
             VALUES ($1, $2, $3, $4, FALSE) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(input.id.unwrap_or_else(Uuid::now_v7))
            .bind(user_id)
            .bind(input.initiative_id)
            .bind(input.duration_minutes.unwrap_or(DEFAULT_TARGET_MINUTES))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
    ) -> Result<Option<WorkSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_sessions WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's open session, if any.
    pub async fn find_active(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<WorkSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_sessions WHERE user_id = $1 AND ended_at IS NULL \
             ORDER BY started_at DESC LIMIT 1"
        );
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Close an open session now. `completed` distinguishes a finished
    /// session from a paused one.
    ///
    /// Returns `None` if the session does not exist or has already ended.
    pub async fn end(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        completed: bool,
    ) -> Result<Option<WorkSession>, sqlx::Error> {
        let query = format!(
            "UPDATE work_sessions SET ended_at = GREATEST(NOW(), started_at), completed = $3 \
             WHERE id = $1 AND user_id = $2 AND ended_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(id)
            .bind(user_id)
            .bind(completed)
            .fetch_optional(pool)
            .await
    }

    /// Sessions newest first, optionally only those started at or after `since`.
    pub async fn list(
        pool: &PgPool,
        user_id: UserId,
        since: Option<Timestamp>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_sessions \
             WHERE user_id = $1 AND ($2::TIMESTAMPTZ IS NULL OR started_at >= $2) \
             ORDER BY started_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(user_id)
            .bind(since)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All sessions started at or after `since`, oldest first.
    pub async fn list_since(
        pool: &PgPool,
        user_id: UserId,
        since: Option<Timestamp>,
    ) -> Result<Vec<WorkSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_sessions \
             WHERE user_id = $1 AND ($2::TIMESTAMPTZ IS NULL OR started_at >= $2) \
             ORDER BY started_at ASC, id ASC"
        );
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Sessions started within `[start, end)`, oldest first.
    pub async fn list_between(
        pool: &PgPool,
        user_id: UserId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<WorkSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_sessions \
             WHERE user_id = $1 AND started_at >= $2 AND started_at < $3 \
             ORDER BY started_at ASC, id ASC"
        );
        sqlx::query_as::<_, WorkSession>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
