//! Route definitions for initiatives.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::initiatives;
use crate::state::AppState;

/// Routes mounted at `/initiatives`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /matrix           -> matrix
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// PATCH  /{id}/status      -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(initiatives::list).post(initiatives::create))
        .route("/matrix", get(initiatives::matrix))
        .route(
            "/{id}",
            get(initiatives::get_by_id)
                .put(initiatives::update)
                .delete(initiatives::delete),
        )
        .route("/{id}/status", patch(initiatives::set_status))
}
