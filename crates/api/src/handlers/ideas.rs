//! Handlers for the `/ideas` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helm_core::filter::{partition_by_status, StatusFilter};
use helm_core::ideas::{self, IdeaStatus};
use helm_core::initiatives::validate_score;
use helm_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helm_core::records::RecordKind;
use helm_core::types::RecordId;
use helm_db::models::idea::{
    CreateIdea, Idea, IdeaListParams, PromoteIdea, UpdateIdea, UpdateIdeaStatus,
};
use helm_db::models::initiative::Initiative;
use helm_db::repositories::IdeaRepo;
use helm_events::RecordChange;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Idea";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &mut CreateIdea) -> AppResult<()> {
    ideas::validate_title(&input.title).map_err(AppError::validation)?;
    input.title = input.title.trim().to_string();
    ideas::validate_description(input.description.as_deref()).map_err(AppError::validation)?;
    input.tags = ideas::normalize_tags(&input.tags);
    ideas::validate_tags(&input.tags).map_err(AppError::validation)?;
    if let Some(status) = &input.status {
        ideas::validate_status(status).map_err(AppError::validation)?;
    }
    Ok(())
}

fn validate_update(input: &mut UpdateIdea) -> AppResult<()> {
    if let Some(title) = &input.title {
        ideas::validate_title(title).map_err(AppError::validation)?;
        input.title = Some(title.trim().to_string());
    }
    ideas::validate_description(input.description.as_deref()).map_err(AppError::validation)?;
    if let Some(tags) = &input.tags {
        let tags = ideas::normalize_tags(tags);
        ideas::validate_tags(&tags).map_err(AppError::validation)?;
        input.tags = Some(tags);
    }
    if let Some(status) = &input.status {
        ideas::validate_status(status).map_err(AppError::validation)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/ideas?status=all|captured|explored|archived
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<IdeaListParams>,
) -> AppResult<Json<DataResponse<Vec<Idea>>>> {
    let filter = StatusFilter::<IdeaStatus>::parse(params.status.as_deref())
        .map_err(AppError::validation)?;
    let ideas = IdeaRepo::list(
        &state.pool,
        user.user_id,
        filter.as_db_value(),
        clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse::new(ideas)))
}

/// Per-status tallies shown on the filter tabs.
#[derive(Debug, Serialize)]
pub struct IdeaStatusCounts {
    pub all: usize,
    pub captured: usize,
    pub explored: usize,
    pub archived: usize,
}

/// GET /api/v1/ideas/counts
pub async fn counts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<IdeaStatusCounts>>> {
    let rows = IdeaRepo::list_statuses(&state.pool, user.user_id).await?;
    let partition = partition_by_status::<IdeaStatus, _>(&rows);
    Ok(Json(DataResponse::new(IdeaStatusCounts {
        all: partition.total(),
        captured: partition.count(IdeaStatus::Captured),
        explored: partition.count(IdeaStatus::Explored),
        archived: partition.count(IdeaStatus::Archived),
    })))
}

/// POST /api/v1/ideas
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateIdea>,
) -> AppResult<(StatusCode, Json<DataResponse<Idea>>)> {
    validate_create(&mut input)?;
    let idea = IdeaRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = %user.user_id, record_id = %idea.id, "Idea captured");
    state
        .change_bus
        .publish(RecordChange::inserted(RecordKind::Idea, user.user_id, &idea));
    Ok((StatusCode::CREATED, Json(DataResponse::new(idea))))
}

/// GET /api/v1/ideas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<Idea>>> {
    let idea = IdeaRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse::new(idea)))
}

/// PUT /api/v1/ideas/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(mut input): Json<UpdateIdea>,
) -> AppResult<Json<DataResponse<Idea>>> {
    validate_update(&mut input)?;
    let idea = IdeaRepo::update(&state.pool, user.user_id, id, &input)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    state
        .change_bus
        .publish(RecordChange::updated(RecordKind::Idea, user.user_id, &idea));
    Ok(Json(DataResponse::new(idea)))
}

/// PATCH /api/v1/ideas/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateIdeaStatus>,
) -> AppResult<Json<DataResponse<Idea>>> {
    let status = IdeaStatus::from_str_value(&input.status).map_err(AppError::validation)?;
    let idea = IdeaRepo::set_status(&state.pool, user.user_id, id, status.as_str())
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    tracing::info!(
        user_id = %user.user_id,
        record_id = %id,
        status = %idea.status,
        "Idea status changed"
    );
    state
        .change_bus
        .publish(RecordChange::updated(RecordKind::Idea, user.user_id, &idea));
    Ok(Json(DataResponse::new(idea)))
}

/// DELETE /api/v1/ideas/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if !IdeaRepo::delete(&state.pool, user.user_id, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    state
        .change_bus
        .publish(RecordChange::deleted(RecordKind::Idea, user.user_id, id));
    Ok(StatusCode::NO_CONTENT)
}

/// The pair of rows written by a promotion.
#[derive(Debug, Serialize)]
pub struct Promotion {
    pub initiative: Initiative,
    pub idea: Idea,
}

/// POST /api/v1/ideas/{id}/promote
pub async fn promote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<PromoteIdea>,
) -> AppResult<(StatusCode, Json<DataResponse<Promotion>>)> {
    validate_score("impact", input.impact).map_err(AppError::validation)?;
    validate_score("effort", input.effort).map_err(AppError::validation)?;

    let (initiative, idea) = IdeaRepo::promote(&state.pool, user.user_id, id, &input)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    tracing::info!(
        user_id = %user.user_id,
        record_id = %id,
        initiative_id = %initiative.id,
        "Idea promoted to initiative",
    );

    state.change_bus.publish(RecordChange::inserted(
        RecordKind::Initiative,
        user.user_id,
        &initiative,
    ));
    state
        .change_bus
        .publish(RecordChange::updated(RecordKind::Idea, user.user_id, &idea));
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(Promotion { initiative, idea })),
    ))
}
