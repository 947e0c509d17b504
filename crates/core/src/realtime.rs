//! Change-feed wire protocol.
//!
//! Clients open one WebSocket and subscribe per table. Every committed
//! write to a subscribed table owned by the same user is pushed as a
//! [`ServerMessage::Change`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::records::RecordKind;
use crate::types::{RecordId, Timestamp};

/// Kind of write carried by a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

impl ChangeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOp::Insert => "INSERT",
            ChangeOp::Update => "UPDATE",
            ChangeOp::Delete => "DELETE",
        }
    }
}

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { table: RecordKind },
    Unsubscribe { table: RecordKind },
    Ping,
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Subscribed {
        table: RecordKind,
    },
    Unsubscribed {
        table: RecordKind,
    },
    Change {
        table: RecordKind,
        event: ChangeOp,
        /// Row after the write; absent for deletes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new: Option<Value>,
        /// Row before the write; for deletes only its id is guaranteed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old: Option<Value>,
        commit_timestamp: Timestamp,
    },
    Error {
        message: String,
    },
    Pong,
}

impl ServerMessage {
    /// Id of the changed row, read from `new` or else `old`.
    pub fn record_id(&self) -> Option<RecordId> {
        let ServerMessage::Change { new, old, .. } = self else {
            return None;
        };
        new.as_ref()
            .or(old.as_ref())
            .and_then(|row| row.get("id"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}
