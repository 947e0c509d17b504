//! Daily log entries: structured content and transcript extraction.
//!
//! A spoken daily report is turned into a [`LogContent`] by splitting it
//! into sentences and sorting each sentence by keyword into achievements,
//! blockers, learnings or tomorrow's focus.

use serde::{Deserialize, Serialize};

use crate::timer::local_date;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const FALLBACK_ACHIEVEMENT: &str = "Made steady progress on current tasks";
pub const FALLBACK_TOMORROW_FOCUS: &str = "Continue with current priorities";

pub const MAX_LIST_ENTRIES: usize = 50;
pub const MAX_ENTRY_LENGTH: usize = 1000;
pub const MAX_TRANSCRIPTION_LENGTH: usize = 20_000;

const ACHIEVEMENT_KEYWORDS: &[&str] = &["complet", "achiev", "progress", "finish"];
const BLOCKER_KEYWORDS: &[&str] = &["block", "stuck", "issue"];
const LEARNING_KEYWORDS: &[&str] = &["learn", "discover"];
const TOMORROW_KEYWORDS: &[&str] = &["tomorrow", "planning to", "focus will be"];

/// Canned daily reports returned by the scripted transcriber.
pub const CANNED_TRANSCRIPTS: [&str; 3] = [
    "Today was a productive day. I completed three focus sessions and made significant progress on the API integration. The main achievement was finally solving the authentication flow that had been blocking me for days. I learned that sometimes stepping away and coming back with fresh eyes is the best debugging technique. Tomorrow I want to focus on writing tests for the new features and starting the documentation.",
    "Had a mixed day today. Managed to complete two expeditions but got stuck on a complex state management issue. The good news is I discovered a new pattern for handling async operations that I think will be useful in future projects. My main blocker is still the deployment pipeline - need to figure out the environment variables. For tomorrow, I'm planning to tackle the deployment issue first thing in the morning when I'm fresh.",
    "Great progress today! Finished the UI redesign and got positive feedback from the team. The new component library is really paying off in terms of development speed. I learned about a new CSS technique for responsive layouts that will save time. Only minor blocker was some merge conflicts, but those were resolved quickly. Tomorrow's focus will be on implementing the feedback and starting the mobile optimization.",
];

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Structured body of a log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogContent {
    pub achievements: Vec<String>,
    pub blockers: Vec<String>,
    pub learnings: Vec<String>,
    pub tomorrow_focus: String,
}

impl LogContent {
    pub fn validate(&self) -> Result<(), String> {
        for (field, list) in [
            ("achievements", &self.achievements),
            ("blockers", &self.blockers),
            ("learnings", &self.learnings),
        ] {
            if list.len() > MAX_LIST_ENTRIES {
                return Err(format!(
                    "{field} may have at most {MAX_LIST_ENTRIES} entries"
                ));
            }
            if list.iter().any(|e| e.chars().count() > MAX_ENTRY_LENGTH) {
                return Err(format!(
                    "{field} entries must be at most {MAX_ENTRY_LENGTH} characters"
                ));
            }
        }
        if self.tomorrow_focus.chars().count() > MAX_ENTRY_LENGTH {
            return Err(format!(
                "tomorrowFocus must be at most {MAX_ENTRY_LENGTH} characters"
            ));
        }
        Ok(())
    }
}

pub fn validate_transcription(text: &str) -> Result<(), String> {
    if text.chars().count() > MAX_TRANSCRIPTION_LENGTH {
        return Err(format!(
            "transcription must be at most {MAX_TRANSCRIPTION_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SentenceKind {
    Achievement,
    Blocker,
    Learning,
    Tomorrow,
}

fn classify_sentence(lower: &str) -> Option<SentenceKind> {
    let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
    if hit(ACHIEVEMENT_KEYWORDS) {
        Some(SentenceKind::Achievement)
    } else if hit(BLOCKER_KEYWORDS) {
        Some(SentenceKind::Blocker)
    } else if hit(LEARNING_KEYWORDS) {
        Some(SentenceKind::Learning)
    } else if hit(TOMORROW_KEYWORDS) {
        Some(SentenceKind::Tomorrow)
    } else {
        None
    }
}

/// Split on full stops, trimming and dropping empty pieces.
///
/// `!` and `?` do not end a sentence here, so an exclamation stays attached
/// to the sentence that follows it.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build structured log content from a free-form transcript.
///
/// Each sentence goes to the first matching group. The last sentence
/// mentioning tomorrow wins. Empty achievements and tomorrow's focus get
/// fallback text so the entry always has something to show.
pub fn extract_log_content(transcript: &str) -> LogContent {
    let mut content = LogContent::default();

    for sentence in split_sentences(transcript) {
        let lower = sentence.to_lowercase();
        match classify_sentence(&lower) {
            Some(SentenceKind::Achievement) => content.achievements.push(sentence.to_string()),
            Some(SentenceKind::Blocker) => content.blockers.push(sentence.to_string()),
            Some(SentenceKind::Learning) => content.learnings.push(sentence.to_string()),
            Some(SentenceKind::Tomorrow) => content.tomorrow_focus = sentence.to_string(),
            None => {}
        }
    }

    if content.achievements.is_empty() {
        content.achievements.push(FALLBACK_ACHIEVEMENT.to_string());
    }
    if content.tomorrow_focus.is_empty() {
        content.tomorrow_focus = FALLBACK_TOMORROW_FOCUS.to_string();
    }
    content
}

// ---------------------------------------------------------------------------
// History grouping
// ---------------------------------------------------------------------------

/// Grouping key for the history view, e.g. `"October 2026"`.
pub fn month_label(ts: Timestamp, offset_minutes: i32) -> String {
    local_date(ts, offset_minutes).format("%B %Y").to_string()
}

/// Entries of one calendar month, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthGroup<T> {
    pub month: String,
    pub entries: Vec<T>,
}

/// Group newest-first entries by month, keeping first-seen month order.
pub fn group_by_month<T, F>(
    entries: Vec<T>,
    offset_minutes: i32,
    created_at: F,
) -> Vec<MonthGroup<T>>
where
    F: Fn(&T) -> Timestamp,
{
    let mut groups: Vec<MonthGroup<T>> = Vec::new();
    for entry in entries {
        let label = month_label(created_at(&entry), offset_minutes);
        match groups.iter_mut().find(|g| g.month == label) {
            Some(group) => group.entries.push(entry),
            None => groups.push(MonthGroup {
                month: label,
                entries: vec![entry],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    // -- split_sentences ------------------------------------------------------

    #[test]
    fn splits_on_full_stops_only() {
        let parts = split_sentences("One. Two!  Three?... ");
        assert_eq!(parts, vec!["One", "Two!  Three?"]);
    }

    // -- extract_log_content --------------------------------------------------

    #[test]
    fn first_canned_report_extracts_every_section() {
        let content = extract_log_content(CANNED_TRANSCRIPTS[0]);
        assert_eq!(content.achievements.len(), 2);
        assert!(content.achievements[1].starts_with("The main achievement"));
        assert!(content.blockers.is_empty());
        assert_eq!(content.learnings.len(), 1);
        assert!(content.tomorrow_focus.starts_with("Tomorrow I want to focus"));
    }

    #[test]
    fn second_canned_report_has_blockers() {
        let content = extract_log_content(CANNED_TRANSCRIPTS[1]);
        assert_eq!(content.achievements.len(), 1);
        assert!(content.achievements[0].starts_with("Managed to complete"));
        assert!(content.learnings[0].contains("discovered"));
        // "planning to tackle the deployment issue" hits the blocker group first.
        assert_eq!(content.blockers.len(), 2);
        assert_eq!(content.tomorrow_focus, FALLBACK_TOMORROW_FOCUS);
    }

    #[test]
    fn exclamation_stays_inside_its_sentence() {
        let content = extract_log_content(CANNED_TRANSCRIPTS[2]);
        assert_eq!(
            content.achievements,
            vec!["Great progress today! Finished the UI redesign and got positive feedback from the team"]
        );
        assert_eq!(content.learnings.len(), 1);
        assert_eq!(content.blockers.len(), 1);
        assert!(content.tomorrow_focus.starts_with("Tomorrow's focus will be"));
    }

    #[test]
    fn sentence_goes_to_first_matching_group() {
        let content = extract_log_content("Finished the blocker fix.");
        assert_eq!(content.achievements, vec!["Finished the blocker fix"]);
        assert!(content.blockers.is_empty());
    }

    #[test]
    fn last_tomorrow_sentence_wins() {
        let content = extract_log_content("Tomorrow: emails. Tomorrow: code review.");
        assert_eq!(content.tomorrow_focus, "Tomorrow: code review");
    }

    #[test]
    fn fallbacks_fill_empty_sections() {
        let content = extract_log_content("Nothing notable happened");
        assert_eq!(content.achievements, vec![FALLBACK_ACHIEVEMENT]);
        assert_eq!(content.tomorrow_focus, FALLBACK_TOMORROW_FOCUS);
        assert!(content.blockers.is_empty());
    }

    #[test]
    fn empty_transcript_gets_fallbacks() {
        let content = extract_log_content("");
        assert_eq!(content.achievements.len(), 1);
        assert_eq!(content.tomorrow_focus, FALLBACK_TOMORROW_FOCUS);
    }

    // -- LogContent -----------------------------------------------------------

    #[test]
    fn content_serializes_tomorrow_focus_in_camel_case() {
        let content = extract_log_content(CANNED_TRANSCRIPTS[2]);
        let json = serde_json::to_value(&content).unwrap();
        assert!(json.get("tomorrowFocus").is_some());
        assert!(content.validate().is_ok());
    }

    #[test]
    fn oversized_entry_rejected() {
        let content = LogContent {
            blockers: vec!["b".repeat(1001)],
            ..Default::default()
        };
        assert!(content.validate().unwrap_err().contains("blockers"));
    }

    // -- month grouping -------------------------------------------------------

    #[test]
    fn month_label_format() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(month_label(ts, 0), "October 2026");
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let stamps = vec![
            Utc.with_ymd_and_hms(2026, 10, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 30, 9, 0, 0).unwrap(),
        ];
        let groups = group_by_month(stamps, 0, |ts| *ts);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].month, "October 2026");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[1].month, "September 2026");
    }
}
