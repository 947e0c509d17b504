//! Shared query parameter types for API handlers.

use helm_core::timer::validate_tz_offset;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `clamp_limit` / `clamp_offset` before they
/// reach the repository layer.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?tz_offset_minutes=`: the caller's UTC offset, minutes east of UTC.
///
/// Day boundaries for "today" and the analytics buckets are computed in
/// this offset. Missing means UTC.
#[derive(Debug, Default, Deserialize)]
pub struct TzParams {
    pub tz_offset_minutes: Option<i32>,
}

impl TzParams {
    pub fn offset(&self) -> AppResult<i32> {
        let offset = self.tz_offset_minutes.unwrap_or(0);
        validate_tz_offset(offset).map_err(AppError::validation)?;
        Ok(offset)
    }
}
