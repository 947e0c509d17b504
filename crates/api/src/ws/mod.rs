//! Change-feed WebSocket.
//!
//! Provides connection and subscription management and the HTTP upgrade
//! handler mounted at `/api/v1/ws`. Heartbeat pings are sent by
//! [`ChangeRouter`](crate::realtime::ChangeRouter).

mod handler;
pub mod manager;

pub use handler::{dispatch_client_text, ws_handler};
pub use manager::WsManager;
