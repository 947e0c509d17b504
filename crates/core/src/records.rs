//! The six record kinds and their backing tables.

use serde::{Deserialize, Serialize};

/// One relational entity the application reads and writes.
///
/// Serialized as its table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "ideas")]
    Idea,
    #[serde(rename = "vision_documents")]
    VisionDocument,
    #[serde(rename = "vision_chats")]
    VisionChat,
    #[serde(rename = "initiatives")]
    Initiative,
    #[serde(rename = "work_sessions")]
    WorkSession,
    #[serde(rename = "log_entries")]
    LogEntry,
}

pub const TABLE_IDEAS: &str = "ideas";
pub const TABLE_VISION_DOCUMENTS: &str = "vision_documents";
pub const TABLE_VISION_CHATS: &str = "vision_chats";
pub const TABLE_INITIATIVES: &str = "initiatives";
pub const TABLE_WORK_SESSIONS: &str = "work_sessions";
pub const TABLE_LOG_ENTRIES: &str = "log_entries";

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Idea,
        RecordKind::VisionDocument,
        RecordKind::VisionChat,
        RecordKind::Initiative,
        RecordKind::WorkSession,
        RecordKind::LogEntry,
    ];

    /// Table name used on the wire and in the database.
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Idea => TABLE_IDEAS,
            RecordKind::VisionDocument => TABLE_VISION_DOCUMENTS,
            RecordKind::VisionChat => TABLE_VISION_CHATS,
            RecordKind::Initiative => TABLE_INITIATIVES,
            RecordKind::WorkSession => TABLE_WORK_SESSIONS,
            RecordKind::LogEntry => TABLE_LOG_ENTRIES,
        }
    }

    /// Human-readable entity name for error messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            RecordKind::Idea => "Idea",
            RecordKind::VisionDocument => "VisionDocument",
            RecordKind::VisionChat => "VisionChat",
            RecordKind::Initiative => "Initiative",
            RecordKind::WorkSession => "WorkSession",
            RecordKind::LogEntry => "LogEntry",
        }
    }

    /// Resolve a table name back to its record kind.
    pub fn from_table(table: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.table() == table)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.table()).collect();
                format!(
                    "Unknown table '{table}'. Must be one of: {}",
                    names.join(", ")
                )
            })
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_table_name() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_table(kind.table()), Ok(kind));
        }
    }

    #[test]
    fn unknown_table_rejected() {
        let err = RecordKind::from_table("profiles").unwrap_err();
        assert!(err.contains("Unknown table"));
        assert!(err.contains("work_sessions"));
    }

    #[test]
    fn serializes_as_table_name() {
        let json = serde_json::to_string(&RecordKind::LogEntry).unwrap();
        assert_eq!(json, "\"log_entries\"");
    }

    #[test]
    fn table_names_are_unique() {
        let mut names: Vec<&str> = RecordKind::ALL.iter().map(|k| k.table()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }
}
