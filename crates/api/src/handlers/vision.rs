//! Handlers for the vision document and the vision chat log.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helm_core::paging::{clamp_limit, DEFAULT_CHAT_LIMIT, MAX_LIST_LIMIT};
use helm_core::records::RecordKind;
use helm_core::types::RecordId;
use helm_core::vision::{validate_message, ROLE_USER};
use helm_db::models::vision::{
    ChatListParams, CreateVisionChat, UpsertVisionDocument, VisionChat, VisionDocument,
};
use helm_db::repositories::{VisionChatRepo, VisionDocumentRepo};
use helm_events::RecordChange;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/vision
///
/// The user's latest vision document, or `null` before the first save.
pub async fn get_latest(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Option<VisionDocument>>>> {
    let doc = VisionDocumentRepo::latest(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(doc)))
}

/// PUT /api/v1/vision
///
/// Overwrites the latest document, creating it on first save.
pub async fn upsert(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpsertVisionDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<VisionDocument>>)> {
    let content = input.content.normalized();
    content.validate().map_err(AppError::validation)?;

    let (doc, created) =
        VisionDocumentRepo::upsert_latest(&state.pool, user.user_id, &content).await?;
    tracing::info!(user_id = %user.user_id, record_id = %doc.id, created, "Vision saved");

    let (change, status) = if created {
        (
            RecordChange::inserted(RecordKind::VisionDocument, user.user_id, &doc),
            StatusCode::CREATED,
        )
    } else {
        (
            RecordChange::updated(RecordKind::VisionDocument, user.user_id, &doc),
            StatusCode::OK,
        )
    };
    state.change_bus.publish(change);
    Ok((status, Json(DataResponse::new(doc))))
}

/// GET /api/v1/vision/chats?limit=
///
/// The most recent turns, oldest first.
pub async fn list_chats(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ChatListParams>,
) -> AppResult<Json<DataResponse<Vec<VisionChat>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_CHAT_LIMIT, MAX_LIST_LIMIT);
    let chats = VisionChatRepo::list_recent(&state.pool, user.user_id, limit).await?;
    Ok(Json(DataResponse::new(chats)))
}

/// POST /api/v1/vision/chats
///
/// Appends a user turn. The assistant's reply is produced by
/// `POST /functions/vision-chat`.
pub async fn create_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateVisionChat>,
) -> AppResult<(StatusCode, Json<DataResponse<VisionChat>>)> {
    validate_message(&input.message).map_err(AppError::validation)?;
    let chat = VisionChatRepo::create(
        &state.pool,
        user.user_id,
        input.id,
        input.message.trim(),
        ROLE_USER,
    )
    .await?;
    state.change_bus.publish(RecordChange::inserted(
        RecordKind::VisionChat,
        user.user_id,
        &chat,
    ));
    Ok((StatusCode::CREATED, Json(DataResponse::new(chat))))
}

/// DELETE /api/v1/vision/chats/{id}
pub async fn delete_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if !VisionChatRepo::delete(&state.pool, user.user_id, id).await? {
        return Err(AppError::not_found("VisionChat", id));
    }
    state
        .change_bus
        .publish(RecordChange::deleted(RecordKind::VisionChat, user.user_id, id));
    Ok(StatusCode::NO_CONTENT)
}
