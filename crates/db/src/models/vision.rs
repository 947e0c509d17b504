//! Vision document and vision chat models.

use helm_core::types::{RecordId, Timestamp, UserId};
use helm_core::view::Record;
use helm_core::vision::VisionContent;
use serde::{Deserialize, Serialize};

use super::Json;

/// A row from the `vision_documents` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct VisionDocument {
    pub id: RecordId,
    pub user_id: UserId,
    pub content: Json<VisionContent>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for VisionDocument {
    fn id(&self) -> RecordId {
        self.id
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// DTO for writing the user's vision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertVisionDocument {
    pub content: VisionContent,
}

/// A row from the `vision_chats` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct VisionChat {
    pub id: RecordId,
    pub user_id: UserId,
    pub message: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for VisionChat {
    fn id(&self) -> RecordId {
        self.id
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// DTO for posting a user turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVisionChat {
    pub id: Option<RecordId>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatListParams {
    pub limit: Option<i64>,
}
