use axum::routing::get;
use axum::Router;

use crate::handlers::log_entries;
use crate::state::AppState;

/// Routes mounted at `/log-entries`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /today            -> today
/// GET    /history          -> history
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(log_entries::list).post(log_entries::create))
        .route("/today", get(log_entries::today))
        .route("/history", get(log_entries::history))
        .route(
            "/{id}",
            get(log_entries::get_by_id)
                .put(log_entries::update)
                .delete(log_entries::delete),
        )
}
