use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::vision;
use crate::state::AppState;

/// Routes mounted at `/vision`.
///
/// ```text
/// GET    /                 -> get_latest
/// PUT    /                 -> upsert
/// GET    /chats            -> list_chats
/// POST   /chats            -> create_chat
/// DELETE /chats/{id}       -> delete_chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vision::get_latest).put(vision::upsert))
        .route(
            "/chats",
            get(vision::list_chats).post(vision::create_chat),
        )
        .route("/chats/{id}", delete(vision::delete_chat))
}
