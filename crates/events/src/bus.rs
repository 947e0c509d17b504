//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeBus`] is shared via `Arc<ChangeBus>`. Handlers publish a
//! [`RecordChange`] after each successful write; the realtime router
//! subscribes once and fans changes out to WebSocket connections.

use chrono::Utc;
use helm_core::realtime::{ChangeOp, ServerMessage};
use helm_core::records::RecordKind;
use helm_core::types::{RecordId, Timestamp, UserId};
use helm_core::view::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// RecordChange
// ---------------------------------------------------------------------------

/// A committed write to one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordChange {
    pub kind: RecordKind,
    pub op: ChangeOp,
    /// Owner of the row; only this user's connections see the change.
    pub user_id: UserId,
    pub record_id: RecordId,
    pub new: Option<Value>,
    pub old: Option<Value>,
    pub timestamp: Timestamp,
}

impl RecordChange {
    pub fn inserted<T: Record + Serialize>(kind: RecordKind, user_id: UserId, row: &T) -> Self {
        Self {
            kind,
            op: ChangeOp::Insert,
            user_id,
            record_id: row.id(),
            new: row_value(kind, row),
            old: None,
            timestamp: Utc::now(),
        }
    }

    pub fn updated<T: Record + Serialize>(kind: RecordKind, user_id: UserId, row: &T) -> Self {
        Self {
            op: ChangeOp::Update,
            ..Self::inserted(kind, user_id, row)
        }
    }

    /// A delete carries only the id of the removed row.
    pub fn deleted(kind: RecordKind, user_id: UserId, record_id: RecordId) -> Self {
        Self {
            kind,
            op: ChangeOp::Delete,
            user_id,
            record_id,
            new: None,
            old: Some(serde_json::json!({ "id": record_id })),
            timestamp: Utc::now(),
        }
    }

    /// Whether a connection authenticated as `user_id` may see this change.
    pub fn visible_to(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn to_server_message(&self) -> ServerMessage {
        ServerMessage::Change {
            table: self.kind,
            event: self.op,
            new: self.new.clone(),
            old: self.old.clone(),
            commit_timestamp: self.timestamp,
        }
    }
}

fn row_value<T: Serialize>(kind: RecordKind, row: &T) -> Option<Value> {
    match serde_json::to_value(row) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, table = %kind, "Failed to serialize changed row");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out of [`RecordChange`]s.
///
/// When the buffer is full the oldest unread changes are dropped and
/// slow receivers observe `RecvError::Lagged`.
pub struct ChangeBus {
    sender: broadcast::Sender<RecordChange>,
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    pub fn publish(&self, change: RecordChange) {
        tracing::debug!(
            table = %change.kind,
            event = change.op.as_str(),
            record_id = %change.record_id,
            "Publishing change",
        );
        // A send error only means nobody is listening.
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordChange> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
