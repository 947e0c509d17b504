//! Initiatives and the impact/effort prioritization matrix.
//!
//! Each initiative carries an impact and an effort score in `1..=5`.
//! [`Quadrant::classify`] places a pair of scores into one of four
//! quadrants; [`plot_position`] maps the same pair onto matrix
//! coordinates expressed as percentages of the plot area.

use serde::{Deserialize, Serialize};

use crate::filter::StatusValue;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const INITIATIVE_STATUS_BACKLOG: &str = "backlog";
pub const INITIATIVE_STATUS_ACTIVE: &str = "active";
pub const INITIATIVE_STATUS_COMPLETED: &str = "completed";
pub const INITIATIVE_STATUS_ARCHIVED: &str = "archived";

pub const VALID_INITIATIVE_STATUSES: &[&str] = &[
    INITIATIVE_STATUS_BACKLOG,
    INITIATIVE_STATUS_ACTIVE,
    INITIATIVE_STATUS_COMPLETED,
    INITIATIVE_STATUS_ARCHIVED,
];

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// Impact at or above this is "high".
pub const IMPACT_THRESHOLD: f64 = 3.5;

/// Effort at or below this is "low".
pub const EFFORT_THRESHOLD: f64 = 2.5;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    Backlog,
    Active,
    Completed,
    Archived,
}

impl InitiativeStatus {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            INITIATIVE_STATUS_BACKLOG => Ok(Self::Backlog),
            INITIATIVE_STATUS_ACTIVE => Ok(Self::Active),
            INITIATIVE_STATUS_COMPLETED => Ok(Self::Completed),
            INITIATIVE_STATUS_ARCHIVED => Ok(Self::Archived),
            _ => Err(format!(
                "Invalid initiative status '{s}'. Must be one of: {}",
                VALID_INITIATIVE_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => INITIATIVE_STATUS_BACKLOG,
            Self::Active => INITIATIVE_STATUS_ACTIVE,
            Self::Completed => INITIATIVE_STATUS_COMPLETED,
            Self::Archived => INITIATIVE_STATUS_ARCHIVED,
        }
    }
}

impl StatusValue for InitiativeStatus {
    const ALL: &'static [Self] = &[
        Self::Backlog,
        Self::Active,
        Self::Completed,
        Self::Archived,
    ];

    fn as_str(self) -> &'static str {
        InitiativeStatus::as_str(&self)
    }

    fn from_str_value(s: &str) -> Result<Self, String> {
        InitiativeStatus::from_str_value(s)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_status(status: &str) -> Result<(), String> {
    InitiativeStatus::from_str_value(status).map(|_| ())
}

/// Check an impact or effort score.
pub fn validate_score(field: &str, value: i32) -> Result<(), String> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(format!(
            "{field} must be between {MIN_SCORE} and {MAX_SCORE}, got {value}"
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Initiative name must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Initiative name must be at most {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Quadrants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// High impact, low effort.
    QuickWin,
    /// High impact, high effort.
    BigBet,
    /// Low impact, low effort.
    FillIn,
    /// Low impact, high effort.
    LowPriority,
}

impl Quadrant {
    /// Display order on the matrix page.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::QuickWin,
        Quadrant::BigBet,
        Quadrant::FillIn,
        Quadrant::LowPriority,
    ];

    pub fn classify(impact: f64, effort: f64) -> Self {
        let high_impact = impact >= IMPACT_THRESHOLD;
        let low_effort = effort <= EFFORT_THRESHOLD;
        match (high_impact, low_effort) {
            (true, true) => Quadrant::QuickWin,
            (true, false) => Quadrant::BigBet,
            (false, true) => Quadrant::FillIn,
            (false, false) => Quadrant::LowPriority,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Quadrant::QuickWin => "Quick Wins",
            Quadrant::BigBet => "Big Bets",
            Quadrant::FillIn => "Fill-Ins",
            Quadrant::LowPriority => "Consider Carefully",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Quadrant::QuickWin => "High impact, low effort",
            Quadrant::BigBet => "High impact, high effort",
            Quadrant::FillIn => "Low impact, low effort",
            Quadrant::LowPriority => "Low impact, high effort",
        }
    }
}

/// Matrix coordinates as percentages of the plot area.
///
/// `x` grows with effort; `y` grows downward, so high impact sits near 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPosition {
    pub x: f64,
    pub y: f64,
}

pub fn plot_position(impact: i32, effort: i32) -> PlotPosition {
    let max = f64::from(MAX_SCORE);
    PlotPosition {
        x: f64::from(effort) / max * 100.0,
        y: 100.0 - f64::from(impact) / max * 100.0,
    }
}

/// Anything with an impact and effort score.
pub trait Scored {
    fn impact(&self) -> i32;
    fn effort(&self) -> i32;

    fn quadrant(&self) -> Quadrant {
        Quadrant::classify(f64::from(self.impact()), f64::from(self.effort()))
    }
}

/// One quadrant with its members in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantBucket<T> {
    pub quadrant: Quadrant,
    pub title: String,
    pub description: String,
    pub items: Vec<T>,
}

/// Group items into the four quadrants, preserving input order.
///
/// Always returns four buckets in [`Quadrant::ALL`] order.
pub fn bucket_by_quadrant<T: Scored>(items: Vec<T>) -> Vec<QuadrantBucket<T>> {
    let mut buckets: Vec<QuadrantBucket<T>> = Quadrant::ALL
        .into_iter()
        .map(|quadrant| QuadrantBucket {
            quadrant,
            title: quadrant.title().to_string(),
            description: quadrant.description().to_string(),
            items: Vec::new(),
        })
        .collect();

    for item in items {
        let q = item.quadrant();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.quadrant == q) {
            bucket.items.push(item);
        }
    }
    buckets
}
