//! Handlers for the `/initiatives` resource and the prioritization matrix.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helm_core::initiatives::{self, bucket_by_quadrant, QuadrantBucket};
use helm_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helm_core::records::RecordKind;
use helm_core::types::RecordId;
use helm_db::models::initiative::{
    CreateInitiative, Initiative, InitiativeListParams, MatrixPoint, UpdateInitiative,
    UpdateInitiativeStatus,
};
use helm_db::repositories::InitiativeRepo;
use helm_events::RecordChange;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Initiative";

fn validate_create(input: &mut CreateInitiative) -> AppResult<()> {
    initiatives::validate_name(&input.name).map_err(AppError::validation)?;
    input.name = input.name.trim().to_string();
    validate_description(input.description.as_deref())?;
    if let Some(status) = &input.status {
        initiatives::validate_status(status).map_err(AppError::validation)?;
    }
    initiatives::validate_score("impact", input.impact).map_err(AppError::validation)?;
    initiatives::validate_score("effort", input.effort).map_err(AppError::validation)?;
    Ok(())
}

fn validate_update(input: &mut UpdateInitiative) -> AppResult<()> {
    if let Some(name) = &input.name {
        initiatives::validate_name(name).map_err(AppError::validation)?;
        input.name = Some(name.trim().to_string());
    }
    validate_description(input.description.as_deref())?;
    if let Some(status) = &input.status {
        initiatives::validate_status(status).map_err(AppError::validation)?;
    }
    if let Some(impact) = input.impact {
        initiatives::validate_score("impact", impact).map_err(AppError::validation)?;
    }
    if let Some(effort) = input.effort {
        initiatives::validate_score("effort", effort).map_err(AppError::validation)?;
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> AppResult<()> {
    match description {
        Some(d) if d.chars().count() > initiatives::MAX_DESCRIPTION_LENGTH => {
            Err(AppError::validation(format!(
                "Initiative description must be at most {} characters",
                initiatives::MAX_DESCRIPTION_LENGTH
            )))
        }
        _ => Ok(()),
    }
}

/// GET /api/v1/initiatives?status=&include_archived=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<InitiativeListParams>,
) -> AppResult<Json<DataResponse<Vec<Initiative>>>> {
    if let Some(status) = &params.status {
        initiatives::validate_status(status).map_err(AppError::validation)?;
    }
    let items = InitiativeRepo::list(
        &state.pool,
        user.user_id,
        params.status.as_deref(),
        params.include_archived.unwrap_or(false),
        clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse::new(items)))
}

/// GET /api/v1/initiatives/matrix
///
/// Non-archived initiatives grouped into the four impact/effort quadrants.
pub async fn matrix(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<QuadrantBucket<MatrixPoint>>>>> {
    let items = InitiativeRepo::list(&state.pool, user.user_id, None, false, MAX_LIST_LIMIT, 0)
        .await?;
    let points: Vec<MatrixPoint> = items.into_iter().map(MatrixPoint::from).collect();
    Ok(Json(DataResponse::new(bucket_by_quadrant(points))))
}

/// POST /api/v1/initiatives
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateInitiative>,
) -> AppResult<(StatusCode, Json<DataResponse<Initiative>>)> {
    validate_create(&mut input)?;
    let initiative = InitiativeRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = %user.user_id, record_id = %initiative.id, "Initiative created");
    state.change_bus.publish(RecordChange::inserted(
        RecordKind::Initiative,
        user.user_id,
        &initiative,
    ));
    Ok((StatusCode::CREATED, Json(DataResponse::new(initiative))))
}

/// GET /api/v1/initiatives/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DataResponse<Initiative>>> {
    let initiative = InitiativeRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse::new(initiative)))
}

/// PUT /api/v1/initiatives/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(mut input): Json<UpdateInitiative>,
) -> AppResult<Json<DataResponse<Initiative>>> {
    validate_update(&mut input)?;
    let initiative = InitiativeRepo::update(&state.pool, user.user_id, id, &input)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    state.change_bus.publish(RecordChange::updated(
        RecordKind::Initiative,
        user.user_id,
        &initiative,
    ));
    Ok(Json(DataResponse::new(initiative)))
}

/// PATCH /api/v1/initiatives/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<UpdateInitiativeStatus>,
) -> AppResult<Json<DataResponse<Initiative>>> {
    initiatives::validate_status(&input.status).map_err(AppError::validation)?;
    let initiative = InitiativeRepo::set_status(&state.pool, user.user_id, id, &input.status)
        .await?
        .ok_or(AppError::not_found(ENTITY, id))?;
    tracing::info!(
        user_id = %user.user_id,
        record_id = %id,
        status = %initiative.status,
        "Initiative status changed"
    );
    state.change_bus.publish(RecordChange::updated(
        RecordKind::Initiative,
        user.user_id,
        &initiative,
    ));
    Ok(Json(DataResponse::new(initiative)))
}

/// DELETE /api/v1/initiatives/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if !InitiativeRepo::delete(&state.pool, user.user_id, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    state
        .change_bus
        .publish(RecordChange::deleted(RecordKind::Initiative, user.user_id, id));
    Ok(StatusCode::NO_CONTENT)
}
