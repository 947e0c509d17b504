//! Initiative entity model and DTOs.

use helm_core::analytics::InitiativeSessionCount;
use helm_core::filter::HasStatus;
use helm_core::initiatives::{plot_position, PlotPosition, Scored};
use helm_core::types::{RecordId, Timestamp, UserId};
use helm_core::view::Record;
use serde::{Deserialize, Serialize};

/// A row from the `initiatives` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Initiative {
    pub id: RecordId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub impact: i32,
    pub effort: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for Initiative {
    fn id(&self) -> RecordId {
        self.id
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl HasStatus for Initiative {
    fn status(&self) -> &str {
        &self.status
    }
}

impl Scored for Initiative {
    fn impact(&self) -> i32 {
        self.impact
    }
    fn effort(&self) -> i32 {
        self.effort
    }
}

/// An initiative as placed on the prioritization matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixPoint {
    #[serde(flatten)]
    pub initiative: Initiative,
    pub position: PlotPosition,
}

impl From<Initiative> for MatrixPoint {
    fn from(initiative: Initiative) -> Self {
        let position = plot_position(initiative.impact, initiative.effort);
        Self {
            initiative,
            position,
        }
    }
}

impl Scored for MatrixPoint {
    fn impact(&self) -> i32 {
        self.initiative.impact
    }
    fn effort(&self) -> i32 {
        self.initiative.effort
    }
}

/// An initiative joined with its work-session count.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct InitiativeSessionCountRow {
    pub id: RecordId,
    pub name: String,
    pub status: String,
    pub session_count: i64,
}

impl From<InitiativeSessionCountRow> for InitiativeSessionCount {
    fn from(row: InitiativeSessionCountRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            status: row.status,
            session_count: row.session_count,
        }
    }
}

/// DTO for creating a new initiative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInitiative {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub impact: i32,
    pub effort: i32,
}

/// DTO for updating an initiative. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInitiative {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub impact: Option<i32>,
    pub effort: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInitiativeStatus {
    pub status: String,
}

/// Query parameters for listing initiatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiativeListParams {
    pub status: Option<String>,
    pub include_archived: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
