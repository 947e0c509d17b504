//! Helm change feed.
//!
//! - [`ChangeBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Every committed write is published here.
//! - [`RecordChange`]: one committed write, convertible into the
//!   [`ServerMessage::Change`](helm_core::realtime::ServerMessage) frame
//!   pushed to subscribed WebSocket clients.

pub mod bus;

pub use bus::{ChangeBus, RecordChange};
