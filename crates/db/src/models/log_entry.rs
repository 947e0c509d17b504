//! Log entry (daily journal) model and DTOs.

use helm_core::journal::LogContent;
use helm_core::types::{RecordId, Timestamp, UserId};
use helm_core::view::Record;
use serde::{Deserialize, Serialize};

use super::Json;

/// A row from the `log_entries` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct LogEntry {
    pub id: RecordId,
    pub user_id: UserId,
    pub content: Option<Json<LogContent>>,
    pub transcription: Option<String>,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for LogEntry {
    fn id(&self) -> RecordId {
        self.id
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// DTO for writing a log entry by hand or from a transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLogEntry {
    pub id: Option<RecordId>,
    pub content: Option<LogContent>,
    pub transcription: Option<String>,
    pub audio_url: Option<String>,
}

/// DTO for updating a log entry. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLogEntry {
    pub content: Option<LogContent>,
    pub transcription: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
