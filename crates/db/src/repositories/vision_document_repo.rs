//! Repository for the `vision_documents` table.
//!
//! A user may hold several documents; the most recently updated one is
//! treated as their vision.

use helm_core::types::{RecordId, UserId};
use helm_core::vision::VisionContent;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vision::VisionDocument;

const COLUMNS: &str = "id, user_id, content, created_at, updated_at";

pub struct VisionDocumentRepo;

impl VisionDocumentRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        content: &VisionContent,
    ) -> Result<VisionDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO vision_documents (id, user_id, content) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VisionDocument>(&query)
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(Json(content))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: RecordId,
    ) -> Result<Option<VisionDocument>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM vision_documents WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, VisionDocument>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's current vision, if any.
    pub async fn latest(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<VisionDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vision_documents WHERE user_id = $1 \
             ORDER BY updated_at DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, VisionDocument>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the latest document, or create the first one.
    ///
    /// Returns the row and whether it was newly inserted.
    pub async fn upsert_latest(
        pool: &PgPool,
        user_id: UserId,
        content: &VisionContent,
    ) -> Result<(VisionDocument, bool), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<RecordId> = sqlx::query_scalar(
            "SELECT id FROM vision_documents WHERE user_id = $1 \
             ORDER BY updated_at DESC, id DESC LIMIT 1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let result = match existing {
            Some(id) => {
                let query = format!(
                    "UPDATE vision_documents SET content = $3 \
                     WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
                );
                let doc = sqlx::query_as::<_, VisionDocument>(&query)
                    .bind(id)
                    .bind(user_id)
                    .bind(Json(content))
                    .fetch_one(&mut *tx)
                    .await?;
                (doc, false)
            }
            None => {
                let query = format!(
                    "INSERT INTO vision_documents (id, user_id, content) VALUES ($1, $2, $3) \
                     RETURNING {COLUMNS}"
                );
                let doc = sqlx::query_as::<_, VisionDocument>(&query)
                    .bind(Uuid::now_v7())
                    .bind(user_id)
                    .bind(Json(content))
                    .fetch_one(&mut *tx)
                    .await?;
                (doc, true)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vision_documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
