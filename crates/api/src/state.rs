use std::sync::Arc;

use crate::config::ServerConfig;
use crate::transcription::Transcriber;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: helm_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Change-feed WebSocket connections.
    pub ws_manager: Arc<WsManager>,
    /// Every committed write is published here.
    pub change_bus: Arc<helm_events::ChangeBus>,
    /// Turns an uploaded voice log into text.
    pub transcriber: Arc<dyn Transcriber>,
}
