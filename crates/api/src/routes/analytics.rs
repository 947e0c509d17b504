use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET    /                 -> report
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(analytics::report))
}
