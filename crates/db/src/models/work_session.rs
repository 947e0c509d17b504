//! Work session (focus timer) model and DTOs.

use helm_core::timer::TimedSession;
use helm_core::types::{RecordId, Timestamp, UserId};
use helm_core::view::Record;
use serde::{Deserialize, Serialize};

/// A row from the `work_sessions` table.
///
/// `ended_at IS NULL` marks the user's single open session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct WorkSession {
    pub id: RecordId,
    pub user_id: UserId,
    pub initiative_id: Option<RecordId>,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub duration_minutes: i32,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for WorkSession {
    fn id(&self) -> RecordId {
        self.id
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl TimedSession for WorkSession {
    fn started_at(&self) -> Timestamp {
        self.started_at
    }
    fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }
    fn completed(&self) -> bool {
        self.completed
    }
}

/// DTO for starting a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartWorkSession {
    pub id: Option<RecordId>,
    pub initiative_id: Option<RecordId>,
    pub duration_minutes: Option<i32>,
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionListParams {
    pub since: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
