//! Analytics over focus sessions, initiatives and ideas.
//!
//! All figures are recomputed from rows on every request. Day and hour
//! grouping happens in the caller's local time via a fixed UTC offset.

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::filter::{partition_by_status, HasStatus, StatusValue};
use crate::ideas::IdeaStatus;
use crate::initiatives::InitiativeStatus;
use crate::timer::{local_date, local_datetime, session_minutes, TimedSession};
use crate::types::{RecordId, Timestamp};

/// Initiatives shown in the progress ranking.
pub const TOP_INITIATIVES: usize = 10;

/// Label used when there is nothing to rank.
pub const NO_DATA: &str = "No data";

// ---------------------------------------------------------------------------
// Time range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    All,
}

impl TimeRange {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            _ => Err(format!(
                "Invalid range '{s}'. Must be one of: week, month, all"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::All => None,
        }
    }

    /// Earliest `started_at` included in the range.
    pub fn cutoff(&self, now: Timestamp) -> Option<Timestamp> {
        self.days().map(|d| now - Duration::days(d))
    }
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeasByStatus {
    pub captured: usize,
    pub explored: usize,
    pub archived: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_sessions: usize,
    /// Hours across ended sessions, one decimal place.
    pub total_hours: f64,
    pub completed_initiatives: usize,
    pub active_initiatives: usize,
    pub ideas_by_status: IdeasByStatus,
}

impl Overview {
    pub fn compute<S, I, D>(sessions: &[S], initiatives: &[I], ideas: &[D]) -> Self
    where
        S: TimedSession,
        I: HasStatus,
        D: HasStatus,
    {
        let total_seconds: i64 = sessions
            .iter()
            .filter_map(|s| s.ended_at().map(|end| (end - s.started_at()).num_seconds().max(0)))
            .sum();
        let total_hours = (total_seconds as f64 / 3600.0 * 10.0).round() / 10.0;

        let initiative_groups = partition_by_status::<InitiativeStatus, _>(initiatives);
        let idea_groups = partition_by_status::<IdeaStatus, _>(ideas);

        Overview {
            total_sessions: sessions.len(),
            total_hours,
            completed_initiatives: initiative_groups.count(InitiativeStatus::Completed),
            active_initiatives: initiative_groups.count(InitiativeStatus::Active),
            ideas_by_status: IdeasByStatus {
                captured: idea_groups.count(IdeaStatus::Captured),
                explored: idea_groups.count(IdeaStatus::Explored),
                archived: idea_groups.count(IdeaStatus::Archived),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Daily buckets
// ---------------------------------------------------------------------------

/// One local day on the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub completed_sessions: usize,
    pub minutes: i64,
}

/// Per-day completed sessions and focused minutes, oldest day first.
pub fn daily_buckets<S: TimedSession>(sessions: &[S], offset_minutes: i32) -> Vec<DailyBucket> {
    let mut buckets: Vec<DailyBucket> = Vec::new();
    for session in sessions {
        let date = local_date(session.started_at(), offset_minutes);
        let idx = match buckets.iter().position(|b| b.date == date) {
            Some(idx) => idx,
            None => {
                buckets.push(DailyBucket {
                    date,
                    completed_sessions: 0,
                    minutes: 0,
                });
                buckets.len() - 1
            }
        };
        let bucket = &mut buckets[idx];
        if session.completed() {
            bucket.completed_sessions += 1;
        }
        if let Some(end) = session.ended_at() {
            bucket.minutes += session_minutes(session.started_at(), end);
        }
    }
    buckets.sort_by_key(|b| b.date);
    buckets
}

// ---------------------------------------------------------------------------
// Pattern insights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInsights {
    /// Weekday with the most sessions, e.g. `"Tuesday"`.
    pub best_day: String,
    pub best_day_count: usize,
    /// Most frequent start hour, e.g. `"9 AM"`.
    pub best_time: String,
    /// Mean length of ended sessions, rounded minutes.
    pub avg_duration_minutes: i64,
    /// Completed sessions as a rounded percentage of all sessions.
    pub completion_rate: i64,
    pub current_streak: u32,
}

impl PatternInsights {
    pub fn compute<S: TimedSession>(sessions: &[S], offset_minutes: i32) -> Self {
        let (best_day, best_day_count) = match best_weekday(sessions, offset_minutes) {
            Some((day, count)) => (weekday_name(day).to_string(), count),
            None => (NO_DATA.to_string(), 0),
        };

        let best_time = best_start_hour(sessions, offset_minutes)
            .map(format_hour)
            .unwrap_or_else(|| NO_DATA.to_string());

        let ended: Vec<i64> = sessions
            .iter()
            .filter_map(|s| s.ended_at().map(|end| (end - s.started_at()).num_milliseconds()))
            .collect();
        let avg_duration_minutes = if ended.is_empty() {
            0
        } else {
            (ended.iter().sum::<i64>() as f64 / ended.len() as f64 / 60_000.0).round() as i64
        };

        let completion_rate = if sessions.is_empty() {
            0
        } else {
            let completed = sessions.iter().filter(|s| s.completed()).count();
            (completed as f64 / sessions.len() as f64 * 100.0).round() as i64
        };

        PatternInsights {
            best_day,
            best_day_count,
            best_time,
            avg_duration_minutes,
            completion_rate,
            current_streak: current_streak(sessions, offset_minutes),
        }
    }
}

/// Weekday with the most sessions; ties go to the weekday seen first.
fn best_weekday<S: TimedSession>(sessions: &[S], offset_minutes: i32) -> Option<(Weekday, usize)> {
    let mut counts: Vec<(Weekday, usize)> = Vec::new();
    for s in sessions {
        let day = local_date(s.started_at(), offset_minutes).weekday();
        match counts.iter_mut().find(|(d, _)| *d == day) {
            Some((_, n)) => *n += 1,
            None => counts.push((day, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best, (day, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((day, n)),
        })
}

/// Most frequent local start hour; ties go to the earlier hour.
fn best_start_hour<S: TimedSession>(sessions: &[S], offset_minutes: i32) -> Option<u32> {
    let mut counts = [0usize; 24];
    for s in sessions {
        let hour = local_datetime(s.started_at(), offset_minutes).hour();
        counts[hour as usize] += 1;
    }
    let mut best: Option<(u32, usize)> = None;
    for (hour, n) in counts.iter().enumerate() {
        if *n > 0 && best.map_or(true, |(_, top)| *n > top) {
            best = Some((hour as u32, *n));
        }
    }
    best.map(|(hour, _)| hour)
}

/// `0 -> "12 AM"`, `12 -> "12 PM"`, `15 -> "3 PM"`.
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h > 12 => format!("{} PM", h - 12),
        h => format!("{h} AM"),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Consecutive local days with at least one session, counted back from
/// the most recent session day.
pub fn current_streak<S: TimedSession>(sessions: &[S], offset_minutes: i32) -> u32 {
    let mut days: Vec<NaiveDate> = sessions
        .iter()
        .map(|s| local_date(s.started_at(), offset_minutes))
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(first) = days.first().copied() else {
        return 0;
    };
    let mut streak = 1;
    let mut last = first;
    for day in days.into_iter().skip(1) {
        if (last - day).num_days() == 1 {
            streak += 1;
            last = day;
        } else {
            break;
        }
    }
    streak
}

// ---------------------------------------------------------------------------
// Initiative progress
// ---------------------------------------------------------------------------

/// An initiative with the number of sessions logged against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeSessionCount {
    pub id: RecordId,
    pub name: String,
    pub status: String,
    pub session_count: i64,
}

impl HasStatus for InitiativeSessionCount {
    fn status(&self) -> &str {
        &self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeProgressRow {
    pub id: RecordId,
    pub name: String,
    pub status: String,
    pub session_count: i64,
    /// Share of the busiest initiative's session count.
    pub percent_of_max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeProgress {
    pub top: Vec<InitiativeProgressRow>,
    pub by_status: Vec<StatusCount>,
}

/// Rank initiatives by session count and histogram their statuses.
pub fn initiative_progress(initiatives: &[InitiativeSessionCount]) -> InitiativeProgress {
    let mut ranked: Vec<&InitiativeSessionCount> = initiatives.iter().collect();
    // Stable sort keeps input order among equal counts.
    ranked.sort_by(|a, b| b.session_count.cmp(&a.session_count));
    ranked.truncate(TOP_INITIATIVES);

    let max = ranked
        .iter()
        .map(|i| i.session_count)
        .max()
        .unwrap_or(0)
        .max(1);

    let top = ranked
        .into_iter()
        .map(|i| InitiativeProgressRow {
            id: i.id,
            name: i.name.clone(),
            status: i.status.clone(),
            session_count: i.session_count,
            percent_of_max: i.session_count as f64 / max as f64 * 100.0,
        })
        .collect();

    let groups = partition_by_status::<InitiativeStatus, _>(initiatives);
    let by_status = InitiativeStatus::ALL
        .iter()
        .map(|s| StatusCount {
            status: s.as_str().to_string(),
            count: groups.count(*s),
        })
        .collect();

    InitiativeProgress { top, by_status }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the analytics dashboard shows for one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub range: TimeRange,
    pub overview: Overview,
    pub daily: Vec<DailyBucket>,
    pub patterns: PatternInsights,
    pub initiatives: InitiativeProgress,
}

impl AnalyticsReport {
    /// `sessions` must already be limited to the range.
    pub fn build<S, D>(
        range: TimeRange,
        sessions: &[S],
        initiatives: &[InitiativeSessionCount],
        ideas: &[D],
        offset_minutes: i32,
    ) -> Self
    where
        S: TimedSession,
        D: HasStatus,
    {
        AnalyticsReport {
            range,
            overview: Overview::compute(sessions, initiatives, ideas),
            daily: daily_buckets(sessions, offset_minutes),
            patterns: PatternInsights::compute(sessions, offset_minutes),
            initiatives: initiative_progress(initiatives),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    struct S {
        start: Timestamp,
        end: Option<Timestamp>,
        completed: bool,
    }

    impl TimedSession for S {
        fn started_at(&self) -> Timestamp {
            self.start
        }
        fn ended_at(&self) -> Option<Timestamp> {
            self.end
        }
        fn completed(&self) -> bool {
            self.completed
        }
    }

    struct Idea(&'static str);

    impl HasStatus for Idea {
        fn status(&self) -> &str {
            self.0
        }
    }

    fn ts(day: u32, hour: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, day, hour, min, 0).unwrap()
    }

    fn done(day: u32, hour: u32, minutes: i64) -> S {
        let start = ts(day, hour, 0);
        S {
            start,
            end: Some(start + Duration::minutes(minutes)),
            completed: true,
        }
    }

    fn paused(day: u32, hour: u32, minutes: i64) -> S {
        S {
            completed: false,
            ..done(day, hour, minutes)
        }
    }

    fn initiative(name: &str, status: &str, count: i64) -> InitiativeSessionCount {
        InitiativeSessionCount {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: status.to_string(),
            session_count: count,
        }
    }

    // -- TimeRange ------------------------------------------------------------

    #[test]
    fn range_cutoffs() {
        let now = ts(19, 12, 0);
        assert_eq!(TimeRange::Week.cutoff(now), Some(ts(12, 12, 0)));
        assert_eq!(TimeRange::All.cutoff(now), None);
        assert_eq!(TimeRange::default(), TimeRange::Month);
        assert!(TimeRange::from_str_value("year").is_err());
    }

    // -- Overview -------------------------------------------------------------

    #[test]
    fn overview_counts_ended_hours_only() {
        let sessions = vec![
            done(19, 9, 90),
            paused(19, 11, 30),
            S { start: ts(19, 13, 0), end: None, completed: false },
        ];
        let initiatives = vec![
            initiative("a", "completed", 0),
            initiative("b", "active", 0),
            initiative("c", "active", 0),
        ];
        let ideas = vec![Idea("captured"), Idea("captured"), Idea("archived")];

        let o = Overview::compute(&sessions, &initiatives, &ideas);
        assert_eq!(o.total_sessions, 3);
        assert!((o.total_hours - 2.0).abs() < 1e-9);
        assert_eq!(o.completed_initiatives, 1);
        assert_eq!(o.active_initiatives, 2);
        assert_eq!(
            o.ideas_by_status,
            IdeasByStatus { captured: 2, explored: 0, archived: 1 }
        );
    }

    // -- daily_buckets --------------------------------------------------------

    #[test]
    fn buckets_sorted_by_day() {
        let sessions = vec![done(19, 9, 45), done(17, 9, 30), paused(19, 14, 20)];
        let buckets = daily_buckets(&sessions, 0);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(buckets[1].completed_sessions, 1);
        assert_eq!(buckets[1].minutes, 65);
    }

    #[test]
    fn buckets_follow_local_day() {
        // 23:30 UTC is the next day at UTC+1.
        let sessions = vec![done(18, 23, 10)];
        let buckets = daily_buckets(&sessions, 60);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    // -- PatternInsights ------------------------------------------------------

    #[test]
    fn empty_sessions_give_no_data() {
        let p = PatternInsights::compute::<S>(&[], 0);
        assert_eq!(p.best_day, NO_DATA);
        assert_eq!(p.best_time, NO_DATA);
        assert_eq!(p.avg_duration_minutes, 0);
        assert_eq!(p.completion_rate, 0);
        assert_eq!(p.current_streak, 0);
    }

    #[test]
    fn insights_pick_busiest_day_and_hour() {
        // 2026-10-19 is a Monday.
        let sessions = vec![
            done(19, 9, 60),
            done(19, 14, 30),
            paused(20, 9, 15),
        ];
        let p = PatternInsights::compute(&sessions, 0);
        assert_eq!(p.best_day, "Monday");
        assert_eq!(p.best_day_count, 2);
        assert_eq!(p.best_time, "9 AM");
        assert_eq!(p.avg_duration_minutes, 35);
        assert_eq!(p.completion_rate, 67);
    }

    #[test]
    fn hour_labels() {
        assert_eq!(format_hour(0), "12 AM");
        assert_eq!(format_hour(12), "12 PM");
        assert_eq!(format_hour(15), "3 PM");
        assert_eq!(format_hour(7), "7 AM");
    }

    #[test]
    fn streak_counts_back_from_latest_day() {
        let sessions = vec![
            done(19, 9, 30),
            done(19, 15, 30),
            done(18, 9, 30),
            done(17, 9, 30),
            done(14, 9, 30),
        ];
        assert_eq!(current_streak(&sessions, 0), 3);
    }

    #[test]
    fn streak_breaks_on_gap() {
        let sessions = vec![done(19, 9, 30), done(17, 9, 30)];
        assert_eq!(current_streak(&sessions, 0), 1);
    }

    // -- initiative_progress --------------------------------------------------

    #[test]
    fn progress_ranks_and_scales() {
        let mut items: Vec<InitiativeSessionCount> = (0..12)
            .map(|i| initiative(&format!("i{i}"), "backlog", i))
            .collect();
        items.push(initiative("top", "active", 20));

        let progress = initiative_progress(&items);
        assert_eq!(progress.top.len(), TOP_INITIATIVES);
        assert_eq!(progress.top[0].name, "top");
        assert!((progress.top[0].percent_of_max - 100.0).abs() < 1e-9);
        assert!((progress.top[1].percent_of_max - 55.0).abs() < 1e-9);

        let backlog = progress.by_status.iter().find(|s| s.status == "backlog").unwrap();
        assert_eq!(backlog.count, 12);
    }

    #[test]
    fn progress_with_no_sessions_avoids_division_by_zero() {
        let progress = initiative_progress(&[initiative("a", "active", 0)]);
        assert_eq!(progress.top[0].percent_of_max, 0.0);
    }

    #[test]
    fn report_bundles_every_section() {
        let sessions = vec![done(19, 9, 90)];
        let report = AnalyticsReport::build(
            TimeRange::Week,
            &sessions,
            &[initiative("a", "active", 1)],
            &[Idea("explored")],
            0,
        );
        assert_eq!(report.overview.total_sessions, 1);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.patterns.current_streak, 1);
        assert_eq!(report.initiatives.top.len(), 1);
    }
}
