//! Handlers for the `/sessions` resource (focus timer).
//!
//! A user has at most one open session. Starting a second one is rejected
//! by the `uq_work_sessions_active_per_user` index and surfaces as 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use helm_core::error::CoreError;
use helm_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helm_core::records::RecordKind;
use helm_core::timer::{
    format_clock, local_date, local_day_bounds, validate_target_minutes, DailyProgress,
    SessionState, TimerReading,
};
use helm_core::types::RecordId;
use helm_db::models::work_session::{SessionListParams, StartWorkSession, WorkSession};
use helm_db::repositories::{InitiativeRepo, WorkSessionRepo};
use helm_events::RecordChange;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::TzParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "WorkSession";

/// GET /api/v1/sessions?since=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SessionListParams>,
) -> AppResult<Json<DataResponse<Vec<WorkSession>>>> {
    let sessions = WorkSessionRepo::list(
        &state.pool,
        user.user_id,
        params.since,
        clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse::new(sessions)))
}

/// POST /api/v1/sessions
pub async fn start(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<StartWorkSession>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkSession>>)> {
    if let Some(minutes) = input.duration_minutes {
        validate_target_minutes(minutes).map_err(AppError::validation)?;
    }
    if let Some(initiative_id) = input.initiative_id {
        InitiativeRepo::find_by_id(&state.pool, user.user_id, initiative_id)
            .await?
            .ok_or(AppError::not_found("Initiative", initiative_id))?;
    }

    let session = WorkSessionRepo::start(&state.pool, user.user_id, &input).await?;
    tracing::info!(
        user_id = %user.user_id,
        record_id = %session.id,
        duration_minutes = session.duration_minutes,
        "Focus session started",
    );
    state.change_bus.publish(RecordChange::inserted(
        RecordKind::WorkSession,
        user.user_id,
        &session,
    ));
    Ok((StatusCode::CREATED, Json(DataResponse::new(session))))
}

/// GET /api/v1/sessions/active
pub async fn active(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Option<WorkSession>>>> {
    let session = WorkSessionRepo::find_active(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(session)))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<WorkSession>>> {
    let session = find(&state, &user, id).await?;
    Ok(Json(DataResponse::new(session)))
}

async fn find(state: &AppState, user: &AuthUser, id: RecordId) -> AppResult<WorkSession> {
    WorkSessionRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))
}

/// Close an open session; `completed` separates complete from pause.
async fn end(
    state: &AppState,
    user: &AuthUser,
    id: RecordId,
    completed: bool,
) -> AppResult<WorkSession> {
    let Some(session) = WorkSessionRepo::end(&state.pool, user.user_id, id, completed).await?
    else {
        // Distinguish "already ended" from "not yours / never existed".
        find(state, user, id).await?;
        return Err(AppError::Core(CoreError::Conflict(
            "Session has already ended".into(),
        )));
    };

    tracing::info!(
        user_id = %user.user_id,
        record_id = %id,
        state = SessionState::of(&session).label(),
        "Focus session ended",
    );
    state.change_bus.publish(RecordChange::updated(
        RecordKind::WorkSession,
        user.user_id,
        &session,
    ));
    Ok(session)
}

/// POST /api/v1/sessions/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<WorkSession>>> {
    let session = end(&state, &user, id, true).await?;
    Ok(Json(DataResponse::new(session)))
}

/// POST /api/v1/sessions/{id}/pause
pub async fn pause(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<WorkSession>>> {
    let session = end(&state, &user, id, false).await?;
    Ok(Json(DataResponse::new(session)))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if !WorkSessionRepo::delete(&state.pool, user.user_id, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    state
        .change_bus
        .publish(RecordChange::deleted(RecordKind::WorkSession, user.user_id, id));
    Ok(StatusCode::NO_CONTENT)
}

/// Timer state of one session at server time.
#[derive(Debug, Serialize)]
pub struct SessionTimer {
    pub session_id: RecordId,
    pub state: SessionState,
    pub label: &'static str,
    /// Elapsed time as `MM:SS` or `H:MM:SS`.
    pub clock: String,
    #[serde(flatten)]
    pub reading: TimerReading,
}

/// GET /api/v1/sessions/{id}/timer
pub async fn timer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<SessionTimer>>> {
    let session = find(&state, &user, id).await?;
    let reading = TimerReading::compute(
        session.started_at,
        session.ended_at,
        session.duration_minutes,
        Utc::now(),
    );
    let session_state = SessionState::of(&session);
    Ok(Json(DataResponse::new(SessionTimer {
        session_id: session.id,
        state: session_state,
        label: session_state.label(),
        clock: format_clock(reading.elapsed_seconds),
        reading,
    })))
}

/// Today's sessions and progress toward the daily target.
#[derive(Debug, Serialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub progress: DailyProgress,
    pub sessions: Vec<WorkSession>,
}

/// GET /api/v1/sessions/today?tz_offset_minutes=
pub async fn today(
    State(state): State<AppState>,
    user: AuthUser,
    Query(tz): Query<TzParams>,
) -> AppResult<Json<DataResponse<TodaySummary>>> {
    let offset = tz.offset()?;
    let date = local_date(Utc::now(), offset);
    let (start, end) = local_day_bounds(date, offset);

    let sessions = WorkSessionRepo::list_between(&state.pool, user.user_id, start, end).await?;
    let progress = DailyProgress::compute(&sessions);
    Ok(Json(DataResponse::new(TodaySummary {
        date,
        progress,
        sessions,
    })))
}
