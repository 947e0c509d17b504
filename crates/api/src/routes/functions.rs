use axum::routing::post;
use axum::Router;

use crate::handlers::functions;
use crate::state::AppState;

/// Routes mounted at `/functions`.
///
/// ```text
/// POST   /vision-chat      -> vision_chat
/// POST   /transcribe-log   -> transcribe_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vision-chat", post(functions::vision_chat))
        .route("/transcribe-log", post(functions::transcribe_log))
}
