//! Focus-session timer arithmetic and daily progress.
//!
//! Everything here is a pure function of its inputs: the caller supplies
//! "now" so readings are reproducible. Local-day grouping uses a fixed
//! offset in minutes east of UTC supplied by the client.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Target length of one focus session.
pub const DEFAULT_TARGET_MINUTES: i32 = 90;

pub const MIN_TARGET_MINUTES: i32 = 1;
pub const MAX_TARGET_MINUTES: i32 = 480;

/// Sessions per day that count as a full day.
pub const DAILY_SESSION_TARGET: usize = 3;

/// Largest accepted UTC offset (UTC+14 / UTC-14).
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

// ---------------------------------------------------------------------------
// Session shape
// ---------------------------------------------------------------------------

/// The timing columns of a work session.
pub trait TimedSession {
    fn started_at(&self) -> Timestamp;
    fn ended_at(&self) -> Option<Timestamp>;
    fn completed(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Completed,
    Paused,
}

impl SessionState {
    pub fn of<S: TimedSession + ?Sized>(session: &S) -> Self {
        match (session.ended_at(), session.completed()) {
            (None, _) => SessionState::InProgress,
            (Some(_), true) => SessionState::Completed,
            (Some(_), false) => SessionState::Paused,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::InProgress => "In progress",
            SessionState::Completed => "Completed",
            SessionState::Paused => "Paused",
        }
    }
}

pub fn validate_target_minutes(minutes: i32) -> Result<(), String> {
    if !(MIN_TARGET_MINUTES..=MAX_TARGET_MINUTES).contains(&minutes) {
        return Err(format!(
            "duration_minutes must be between {MIN_TARGET_MINUTES} and {MAX_TARGET_MINUTES}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Timer reading
// ---------------------------------------------------------------------------

/// A snapshot of one session's timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerReading {
    pub elapsed_seconds: i64,
    pub target_seconds: i64,
    pub remaining_seconds: i64,
    /// Percent of the target reached, capped at 100.
    pub progress_percent: f64,
    pub is_overtime: bool,
    pub is_running: bool,
}

impl TimerReading {
    /// Compute a reading at `now`.
    ///
    /// Elapsed time freezes at `ended_at` once the session has ended and
    /// never goes negative if `started_at` is in the future.
    pub fn compute(
        started_at: Timestamp,
        ended_at: Option<Timestamp>,
        target_minutes: i32,
        now: Timestamp,
    ) -> Self {
        let until = ended_at.unwrap_or(now);
        let elapsed_seconds = (until - started_at).num_seconds().max(0);
        let target_seconds = i64::from(target_minutes.max(MIN_TARGET_MINUTES)) * 60;

        let progress_percent =
            (elapsed_seconds as f64 / target_seconds as f64 * 100.0).min(100.0);

        TimerReading {
            elapsed_seconds,
            target_seconds,
            remaining_seconds: (target_seconds - elapsed_seconds).max(0),
            progress_percent,
            is_overtime: elapsed_seconds > target_seconds,
            is_running: ended_at.is_none(),
        }
    }
}

/// `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// `"1h 5m"` or `"45m"`.
pub fn format_minutes(total_minutes: i64) -> String {
    let mins = total_minutes.max(0);
    let hours = mins / 60;
    let rest = mins % 60;
    if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Whole minutes between start and end, floored, never negative.
pub fn session_minutes(started_at: Timestamp, ended_at: Timestamp) -> i64 {
    (ended_at - started_at).num_minutes().max(0)
}

// ---------------------------------------------------------------------------
// Local days
// ---------------------------------------------------------------------------

pub fn validate_tz_offset(offset_minutes: i32) -> Result<(), String> {
    if offset_minutes.abs() > MAX_TZ_OFFSET_MINUTES {
        return Err(format!(
            "tz_offset_minutes must be between -{MAX_TZ_OFFSET_MINUTES} and {MAX_TZ_OFFSET_MINUTES}"
        ));
    }
    Ok(())
}

fn fixed_offset(offset_minutes: i32) -> FixedOffset {
    let clamped = offset_minutes.clamp(-MAX_TZ_OFFSET_MINUTES, MAX_TZ_OFFSET_MINUTES);
    FixedOffset::east_opt(clamped * 60).unwrap_or_else(|| Utc.fix())
}

/// `ts` shifted into the caller's zone.
pub fn local_datetime(ts: Timestamp, offset_minutes: i32) -> DateTime<FixedOffset> {
    ts.with_timezone(&fixed_offset(offset_minutes))
}

/// Calendar date of `ts` in the caller's zone.
pub fn local_date(ts: Timestamp, offset_minutes: i32) -> NaiveDate {
    local_datetime(ts, offset_minutes).date_naive()
}

/// UTC instants bounding one local calendar day, `[start, end)`.
pub fn local_day_bounds(date: NaiveDate, offset_minutes: i32) -> (Timestamp, Timestamp) {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let offset = Duration::minutes(i64::from(
        offset_minutes.clamp(-MAX_TZ_OFFSET_MINUTES, MAX_TZ_OFFSET_MINUTES),
    ));
    let start = Utc.from_utc_datetime(&midnight) - offset;
    (start, start + Duration::days(1))
}

// ---------------------------------------------------------------------------
// Daily progress
// ---------------------------------------------------------------------------

/// Today's totals toward the daily session target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub completed_sessions: usize,
    pub target_sessions: usize,
    /// Minutes across ended sessions only.
    pub total_minutes: i64,
    pub total_label: String,
    pub progress_percent: f64,
    pub badges_earned: usize,
    pub message: String,
}

impl DailyProgress {
    /// Summarize the sessions that started on the current local day.
    pub fn compute<S: TimedSession>(sessions_today: &[S]) -> Self {
        let completed_sessions = sessions_today.iter().filter(|s| s.completed()).count();
        let total_minutes: i64 = sessions_today
            .iter()
            .filter_map(|s| s.ended_at().map(|end| session_minutes(s.started_at(), end)))
            .sum();

        let target = DAILY_SESSION_TARGET;
        let progress_percent = (completed_sessions as f64 / target as f64 * 100.0).min(100.0);

        let message = if completed_sessions == 0 {
            "Ready to set sail?"
        } else if completed_sessions < target {
            "Keep navigating!"
        } else {
            "Outstanding voyage today!"
        };

        DailyProgress {
            completed_sessions,
            target_sessions: target,
            total_minutes,
            total_label: format_minutes(total_minutes),
            progress_percent,
            badges_earned: completed_sessions.min(target),
            message: message.to_string(),
        }
    }
}
