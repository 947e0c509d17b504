//! Route definitions for focus sessions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> start
/// GET    /active           -> active
/// GET    /today            -> today
/// GET    /{id}             -> get_by_id
/// DELETE /{id}             -> delete
/// POST   /{id}/complete    -> complete
/// POST   /{id}/pause       -> pause
/// GET    /{id}/timer       -> timer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list).post(sessions::start))
        .route("/active", get(sessions::active))
        .route("/today", get(sessions::today))
        .route(
            "/{id}",
            get(sessions::get_by_id).delete(sessions::delete),
        )
        .route("/{id}/complete", post(sessions::complete))
        .route("/{id}/pause", post(sessions::pause))
        .route("/{id}/timer", get(sessions::timer))
}
