//! Helm API server library.
//!
//! Exposes config, state, error handling, routes, the change-feed
//! WebSocket and the realtime router so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod realtime;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod transcription;
pub mod ws;
