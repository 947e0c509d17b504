//! Route definitions for the idea inbox.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::ideas;
use crate::state::AppState;

/// Routes mounted at `/ideas`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /counts           -> counts
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// PATCH  /{id}/status      -> set_status
/// POST   /{id}/promote     -> promote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ideas::list).post(ideas::create))
        .route("/counts", get(ideas::counts))
        .route(
            "/{id}",
            get(ideas::get_by_id)
                .put(ideas::update)
                .delete(ideas::delete),
        )
        .route("/{id}/status", patch(ideas::set_status))
        .route("/{id}/promote", post(ideas::promote))
}
