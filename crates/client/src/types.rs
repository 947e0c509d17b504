//! Response and request shapes that have no row model in `helm-db`.

use chrono::NaiveDate;
use helm_core::timer::{DailyProgress, SessionState, TimerReading};
use helm_core::types::RecordId;
use helm_core::vision::VisionContent;
use helm_db::models::idea::Idea;
use helm_db::models::initiative::Initiative;
use helm_db::models::work_session::WorkSession;
use serde::{Deserialize, Serialize};

/// `{ "data": ... }` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// `{ "error", "code" }` error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub db_healthy: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IdeaStatusCounts {
    pub all: usize,
    pub captured: usize,
    pub explored: usize,
    pub archived: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Promotion {
    pub initiative: Initiative,
    pub idea: Idea,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionTimer {
    pub session_id: RecordId,
    pub state: SessionState,
    pub label: String,
    pub clock: String,
    #[serde(flatten)]
    pub reading: TimerReading,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub progress: DailyProgress,
    pub sessions: Vec<WorkSession>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub message: String,
}

/// Body of `POST /functions/vision-chat`.
#[derive(Debug, Clone, Serialize)]
pub struct VisionChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision_document: Option<VisionContent>,
    pub recent_chats: Vec<ChatTurn>,
}
