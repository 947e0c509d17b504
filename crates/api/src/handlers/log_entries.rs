//! Handlers for the `/log-entries` resource (daily journal).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use helm_core::journal::{group_by_month, validate_transcription, LogContent, MonthGroup};
use helm_core::paging::{
    clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, DEFAULT_LOG_LIMIT, MAX_LIST_LIMIT,
};
use helm_core::records::RecordKind;
use helm_core::timer::{local_date, local_day_bounds};
use helm_core::types::RecordId;
use helm_db::models::log_entry::{CreateLogEntry, LogEntry, LogListParams, UpdateLogEntry};
use helm_db::repositories::LogEntryRepo;
use helm_events::RecordChange;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::TzParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "LogEntry";

fn validate_fields(content: Option<&LogContent>, transcription: Option<&str>) -> AppResult<()> {
    if let Some(content) = content {
        content.validate().map_err(AppError::validation)?;
    }
    if let Some(text) = transcription {
        validate_transcription(text).map_err(AppError::validation)?;
    }
    Ok(())
}

/// GET /api/v1/log-entries?limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<LogListParams>,
) -> AppResult<Json<DataResponse<Vec<LogEntry>>>> {
    let entries = LogEntryRepo::list_recent(
        &state.pool,
        user.user_id,
        clamp_limit(params.limit, DEFAULT_LOG_LIMIT, MAX_LIST_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse::new(entries)))
}

/// POST /api/v1/log-entries
///
/// A manually written entry.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateLogEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<LogEntry>>)> {
    validate_fields(input.content.as_ref(), input.transcription.as_deref())?;
    let entry = LogEntryRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = %user.user_id, record_id = %entry.id, "Log entry written");
    state
        .change_bus
        .publish(RecordChange::inserted(RecordKind::LogEntry, user.user_id, &entry));
    Ok((StatusCode::CREATED, Json(DataResponse::new(entry))))
}

/// GET /api/v1/log-entries/today?tz_offset_minutes=
pub async fn today(
    State(state): State<AppState>,
    user: AuthUser,
    Query(tz): Query<TzParams>,
) -> AppResult<Json<DataResponse<Option<LogEntry>>>> {
    let offset = tz.offset()?;
    let (start, end) = local_day_bounds(local_date(Utc::now(), offset), offset);
    let entry = LogEntryRepo::find_for_day(&state.pool, user.user_id, start, end).await?;
    Ok(Json(DataResponse::new(entry)))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub tz_offset_minutes: Option<i32>,
    pub limit: Option<i64>,
}

/// GET /api/v1/log-entries/history?tz_offset_minutes=&limit=
///
/// Entries newest first, grouped by calendar month.
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<Vec<MonthGroup<LogEntry>>>>> {
    let offset = TzParams {
        tz_offset_minutes: params.tz_offset_minutes,
    }
    .offset()?;
    let entries = LogEntryRepo::list_recent(
        &state.pool,
        user.user_id,
        clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        0,
    )
    .await?;
    let groups = group_by_month(entries, offset, |e| e.created_at);
    Ok(Json(DataResponse::new(groups)))
}

/// GET /api/v1/log-entries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<LogEntry>>> {
    let entry = LogEntryRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse::new(entry)))
}

/// PUT /api/v1/log-entries/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateLogEntry>,
) -> AppResult<Json<DataResponse<LogEntry>>> {
    validate_fields(input.content.as_ref(), input.transcription.as_deref())?;
    let entry = LogEntryRepo::update(&state.pool, user.user_id, id, &input)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    state
        .change_bus
        .publish(RecordChange::updated(RecordKind::LogEntry, user.user_id, &entry));
    Ok(Json(DataResponse::new(entry)))
}

/// DELETE /api/v1/log-entries/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if !LogEntryRepo::delete(&state.pool, user.user_id, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    state
        .change_bus
        .publish(RecordChange::deleted(RecordKind::LogEntry, user.user_id, id));
    Ok(StatusCode::NO_CONTENT)
}
