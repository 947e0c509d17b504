//! Idea entity model and DTOs.

use helm_core::filter::HasStatus;
use helm_core::types::{RecordId, Timestamp, UserId};
use helm_core::view::Record;
use serde::{Deserialize, Serialize};

/// A row from the `ideas` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Idea {
    pub id: RecordId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for Idea {
    fn id(&self) -> RecordId {
        self.id
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl HasStatus for Idea {
    fn status(&self) -> &str {
        &self.status
    }
}

/// Just the status column, for aggregate counts.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct IdeaStatusRow {
    pub status: String,
}

impl HasStatus for IdeaStatusRow {
    fn status(&self) -> &str {
        &self.status
    }
}

/// DTO for capturing a new idea.
///
/// `id` may be supplied by the client so an optimistic insert and the
/// change-feed echo share one identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIdea {
    pub id: Option<RecordId>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<String>,
}

/// DTO for updating an idea. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIdea {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

/// DTO for moving an idea between board columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateIdeaStatus {
    pub status: String,
}

/// DTO for turning an idea into an initiative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoteIdea {
    pub impact: i32,
    pub effort: i32,
}

/// Query parameters for listing ideas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
