//! Repository for the `ideas` table.

use helm_core::ideas::{IDEA_STATUS_CAPTURED, IDEA_STATUS_EXPLORED};
use helm_core::initiatives::{INITIATIVE_STATUS_BACKLOG, MAX_NAME_LENGTH};
use helm_core::types::{RecordId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::idea::{CreateIdea, Idea, IdeaStatusRow, PromoteIdea, UpdateIdea};
use crate::models::initiative::Initiative;
use crate::repositories::initiative_repo;

/// Column list for `ideas` queries.
const COLUMNS: &str = "id, user_id, title, description, tags, status, created_at, updated_at";

/// Provides CRUD operations for ideas.
pub struct IdeaRepo;

impl IdeaRepo {
    /// Insert a new idea, returning the created row.
    ///
    /// Tags are stored as given; callers normalize them first.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateIdea,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "INSERT INTO ideas (id, user_id, title, description, tags, status) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '{IDEA_STATUS_CAPTURED}')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(input.id.unwrap_or_else(Uuid::now_v7))
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tags)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List ideas newest first, optionally limited to one status.
    pub async fn list(
        pool: &PgPool,
        user_id: UserId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Status of every idea the user owns.
    pub async fn list_statuses(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<IdeaStatusRow>, sqlx::Error> {
        sqlx::query_as::<_, IdeaStatusRow>("SELECT status FROM ideas WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an idea. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        input: &UpdateIdea,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET \
                title = COALESCE($3, title), \
                description = COALESCE($4, description), \
                tags = COALESCE($5, tags), \
                status = COALESCE($6, status) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tags)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        status: &str,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET status = $3 WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an idea. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: UserId, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Turn an idea into a backlog initiative and mark the idea explored.
    ///
    /// Both writes happen in one transaction. Returns `None` if the idea
    /// does not exist for this user.
    pub async fn promote(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
        input: &PromoteIdea,
    ) -> Result<Option<(Initiative, Idea)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM ideas WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let Some(idea) = sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Idea titles may be longer than initiative names allow.
        let name: String = idea.title.chars().take(MAX_NAME_LENGTH).collect();

        let insert = format!(
            "INSERT INTO initiatives (id, user_id, name, description, status, impact, effort) \
             VALUES ($1, $2, $3, $4, '{INITIATIVE_STATUS_BACKLOG}', $5, $6) \
             RETURNING {}",
            initiative_repo::COLUMNS
        );
        let initiative = sqlx::query_as::<_, Initiative>(&insert)
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(&name)
            .bind(&idea.description)
            .bind(input.impact)
            .bind(input.effort)
            .fetch_one(&mut *tx)
            .await?;

        let update = format!(
            "UPDATE ideas SET status = '{IDEA_STATUS_EXPLORED}' \
             WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        let idea = sqlx::query_as::<_, Idea>(&update)
            .bind(id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((initiative, idea)))
    }
}
