//! Repository for the `initiatives` table.

use helm_core::initiatives::{INITIATIVE_STATUS_ARCHIVED, INITIATIVE_STATUS_BACKLOG};
use helm_core::types::{RecordId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::initiative::{
    CreateInitiative, Initiative, InitiativeSessionCountRow, UpdateInitiative,
};

/// Column list for `initiatives` queries.
pub(crate) const COLUMNS: &str = "\
    id, user_id, name, description, status, impact, effort, created_at, updated_at";

/// Provides CRUD operations for initiatives.
pub struct InitiativeRepo;

impl InitiativeRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateInitiative,
    ) -> Result<Initiative, sqlx::Error> {
        let query = format!(
            "INSERT INTO initiatives (id, user_id, name, description, status, impact, effort) \
             VALUES ($1, $2, $3, $4, COALESCE($5, '{INITIATIVE_STATUS_BACKLOG}'), $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(input.id.unwrap_or_else(Uuid::now_v7))
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.impact)
            .bind(input.effort)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
    ) -> Result<Option<Initiative>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM initiatives WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Initiative>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List initiatives newest first.
    ///
    /// Archived rows are skipped unless `include_archived` is set or the
    /// status filter asks for them explicitly.
    pub async fn list(
        pool: &PgPool,
        user_id: UserId,
        status: Option<&str>,
        include_archived: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Initiative>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM initiatives \
             WHERE user_id = $1 \
               AND ($2::TEXT IS NULL OR status = $2) \
               AND ($3 OR $2::TEXT IS NOT NULL OR status <> '{INITIATIVE_STATUS_ARCHIVED}') \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(user_id)
            .bind(status)
            .bind(include_archived)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an initiative. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        input: &UpdateInitiative,
    ) -> Result<Option<Initiative>, sqlx::Error> {
        let query = format!(
            "UPDATE initiatives SET \
                name = COALESCE($3, name), \
                description = COALESCE($4, description), \
                status = COALESCE($5, status), \
                impact = COALESCE($6, impact), \
                effort = COALESCE($7, effort) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.impact)
            .bind(input.effort)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        status: &str,
    ) -> Result<Option<Initiative>, sqlx::Error> {
        let query = format!(
            "UPDATE initiatives SET status = $3 WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an initiative. Sessions logged against it keep their rows
    /// with `initiative_id` cleared.
    pub async fn delete(pool: &PgPool, user_id: UserId, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM initiatives WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every initiative with the number of sessions logged against it.
    pub async fn list_with_session_counts(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<InitiativeSessionCountRow>, sqlx::Error> {
        sqlx::query_as::<_, InitiativeSessionCountRow>(
            "SELECT i.id, i.name, i.status, COUNT(ws.id) AS session_count \
             FROM initiatives i \
             LEFT JOIN work_sessions ws ON ws.initiative_id = i.id \
             WHERE i.user_id = $1 \
             GROUP BY i.id \
             ORDER BY i.created_at DESC, i.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
