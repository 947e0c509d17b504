//! Handler for the analytics dashboard.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use helm_core::analytics::{AnalyticsReport, InitiativeSessionCount, TimeRange};
use helm_db::repositories::{IdeaRepo, InitiativeRepo, WorkSessionRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::TzParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    /// `week`, `month` (default) or `all`.
    pub range: Option<String>,
    pub tz_offset_minutes: Option<i32>,
}

/// GET /api/v1/analytics?range=&tz_offset_minutes=
///
/// Overview, daily buckets, patterns and initiative progress. Session
/// figures cover the range; initiative and idea figures are all-time.
pub async fn report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<DataResponse<AnalyticsReport>>> {
    let range = match params.range.as_deref() {
        Some(value) => TimeRange::from_str_value(value).map_err(AppError::validation)?,
        None => TimeRange::default(),
    };
    let offset = TzParams {
        tz_offset_minutes: params.tz_offset_minutes,
    }
    .offset()?;

    let since = range.cutoff(Utc::now());
    let sessions = WorkSessionRepo::list_since(&state.pool, user.user_id, since).await?;
    let initiatives: Vec<InitiativeSessionCount> =
        InitiativeRepo::list_with_session_counts(&state.pool, user.user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    let ideas = IdeaRepo::list_statuses(&state.pool, user.user_id).await?;

    tracing::debug!(
        user_id = %user.user_id,
        range = range.as_str(),
        sessions = sessions.len(),
        "Building analytics report",
    );
    let report = AnalyticsReport::build(range, &sessions, &initiatives, &ideas, offset);
    Ok(Json(DataResponse::new(report)))
}
