//! Route definitions for object storage.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// Routes mounted at `/storage`.
///
/// ```text
/// POST   /voice-logs                      -> upload_voice_log
/// GET    /voice-logs/{user_dir}/{file}    -> download_voice_log (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/voice-logs", post(storage::upload_voice_log))
        .route(
            "/voice-logs/{user_dir}/{file}",
            get(storage::download_voice_log),
        )
}
