//! Idea board: statuses and input validation.

use serde::{Deserialize, Serialize};

use crate::filter::StatusValue;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const IDEA_STATUS_CAPTURED: &str = "captured";
pub const IDEA_STATUS_EXPLORED: &str = "explored";
pub const IDEA_STATUS_ARCHIVED: &str = "archived";

/// All valid idea status strings.
pub const VALID_IDEA_STATUSES: &[&str] = &[
    IDEA_STATUS_CAPTURED,
    IDEA_STATUS_EXPLORED,
    IDEA_STATUS_ARCHIVED,
];

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_TAGS: usize = 5;
pub const MAX_TAG_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Captured,
    Explored,
    Archived,
}

impl IdeaStatus {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            IDEA_STATUS_CAPTURED => Ok(Self::Captured),
            IDEA_STATUS_EXPLORED => Ok(Self::Explored),
            IDEA_STATUS_ARCHIVED => Ok(Self::Archived),
            _ => Err(format!(
                "Invalid idea status '{s}'. Must be one of: {}",
                VALID_IDEA_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Captured => IDEA_STATUS_CAPTURED,
            Self::Explored => IDEA_STATUS_EXPLORED,
            Self::Archived => IDEA_STATUS_ARCHIVED,
        }
    }
}

impl StatusValue for IdeaStatus {
    const ALL: &'static [Self] = &[Self::Captured, Self::Explored, Self::Archived];

    fn as_str(self) -> &'static str {
        IdeaStatus::as_str(&self)
    }

    fn from_str_value(s: &str) -> Result<Self, String> {
        IdeaStatus::from_str_value(s)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_status(status: &str) -> Result<(), String> {
    IdeaStatus::from_str_value(status).map(|_| ())
}

pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Idea title must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Idea title must be at most {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(format!(
            "Idea description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )),
        _ => Ok(()),
    }
}

/// Check an already-normalized tag list.
pub fn validate_tags(tags: &[String]) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("An idea may have at most {MAX_TAGS} tags"));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err("Tags must not be empty".to_string());
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(format!(
                "Tag '{tag}' exceeds {MAX_TAG_LENGTH} characters"
            ));
        }
    }
    Ok(())
}

/// Trim tags, drop empties and duplicates, keep first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

/// Split a comma-separated tag field as typed into the capture form.
pub fn parse_tag_input(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}
