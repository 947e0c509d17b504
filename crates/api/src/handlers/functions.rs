//! Callable functions: the vision-chat assistant and voice-log
//! transcription.
//!
//! Request bodies accept both `snake_case` and the `camelCase` keys sent
//! by older clients.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use helm_core::journal::extract_log_content;
use helm_core::records::RecordKind;
use helm_core::vision::{
    compose_reply, validate_message, VisionContent, MAX_CONTEXT_TURNS, ROLE_ASSISTANT,
};
use helm_db::models::log_entry::{CreateLogEntry, LogEntry};
use helm_db::models::vision::VisionChat;
use helm_db::repositories::{LogEntryRepo, VisionChatRepo, VisionDocumentRepo};
use helm_events::RecordChange;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::transcription::TranscribeError;

// ---------------------------------------------------------------------------
// vision-chat
// ---------------------------------------------------------------------------

/// One prior turn passed as conversation context.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct VisionChatRequest {
    pub message: String,
    #[serde(default, alias = "visionDocument")]
    pub vision_document: Option<VisionContent>,
    #[serde(default, alias = "recentChats")]
    pub recent_chats: Vec<ChatTurn>,
}

/// POST /api/v1/functions/vision-chat
///
/// Generates the assistant's reply to `message` and stores it as an
/// assistant turn. The caller stores its own user turn beforehand.
pub async fn vision_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<VisionChatRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<VisionChat>>)> {
    validate_message(&input.message).map_err(AppError::validation)?;

    let vision = match input.vision_document {
        Some(content) => Some(content),
        None => VisionDocumentRepo::latest(&state.pool, user.user_id)
            .await?
            .map(|doc| doc.content.0),
    };
    let has_vision = vision.as_ref().is_some_and(|v| !v.is_blank());
    let context_turns = input.recent_chats.len().min(MAX_CONTEXT_TURNS);

    let reply = compose_reply(&input.message, has_vision);
    let chat = VisionChatRepo::create(&state.pool, user.user_id, None, reply, ROLE_ASSISTANT)
        .await?;
    tracing::info!(
        user_id = %user.user_id,
        record_id = %chat.id,
        has_vision,
        context_turns,
        "Vision assistant replied",
    );

    state
        .change_bus
        .publish(RecordChange::inserted(RecordKind::VisionChat, user.user_id, &chat));
    Ok((StatusCode::CREATED, Json(DataResponse::new(chat))))
}

// ---------------------------------------------------------------------------
// transcribe-log
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TranscribeLogRequest {
    #[serde(alias = "audioUrl")]
    pub audio_url: String,
}

/// POST /api/v1/functions/transcribe-log
///
/// Transcribes an uploaded recording, extracts structured content from
/// the transcript and stores the result as a new log entry.
pub async fn transcribe_log(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<TranscribeLogRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LogEntry>>)> {
    let audio_url = input.audio_url.trim();
    if audio_url.is_empty() {
        return Err(AppError::validation("audio_url must not be empty"));
    }

    let transcription = state
        .transcriber
        .transcribe(audio_url)
        .await
        .map_err(|e| match e {
            TranscribeError::AudioUnavailable(_) => AppError::BadRequest(e.to_string()),
            TranscribeError::Failed(_) => AppError::InternalError(e.to_string()),
        })?;
    let content = extract_log_content(&transcription);

    let entry = LogEntryRepo::create(
        &state.pool,
        user.user_id,
        &CreateLogEntry {
            content: Some(content),
            transcription: Some(transcription),
            audio_url: Some(audio_url.to_string()),
            ..Default::default()
        },
    )
    .await?;
    tracing::info!(user_id = %user.user_id, record_id = %entry.id, "Voice log transcribed");

    state
        .change_bus
        .publish(RecordChange::inserted(RecordKind::LogEntry, user.user_id, &entry));
    Ok((StatusCode::CREATED, Json(DataResponse::new(entry))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_chat_request_accepts_camel_case() {
        let req: VisionChatRequest = serde_json::from_value(serde_json::json!({
            "message": "what is my mission",
            "visionDocument": { "mission": "calm" },
            "recentChats": [{ "role": "user", "message": "hi" }]
        }))
        .unwrap();
        assert_eq!(req.vision_document.unwrap().mission, "calm");
        assert_eq!(req.recent_chats.len(), 1);
    }

    #[test]
    fn vision_chat_context_is_optional() {
        let req: VisionChatRequest =
            serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert!(req.vision_document.is_none());
        assert!(req.recent_chats.is_empty());
    }

    #[test]
    fn transcribe_request_accepts_both_spellings() {
        let a: TranscribeLogRequest =
            serde_json::from_str(r#"{"audio_url":"http://x/a.webm"}"#).unwrap();
        let b: TranscribeLogRequest =
            serde_json::from_str(r#"{"audioUrl":"http://x/a.webm"}"#).unwrap();
        assert_eq!(a.audio_url, b.audio_url);
    }
}
