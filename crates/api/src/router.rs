//! The HTTP application: every route plus the middleware each request
//! passes through.
//!
//! `main.rs` and the integration tests both build the app with
//! [`build_app_router`].

use std::any::Any;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headroom over `max_upload_bytes` for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// How long browsers may cache a preflight answer.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the application with its middleware, outermost layer first:
/// CORS, request id, tracing, timeout, panic recovery, compression and
/// the request body cap.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        // Uploads are checked again against the exact limit.
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ));

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(middleware)
        // Applied on its own (still outermost): `Cors` needs a `Default`
        // response body, which axum's `Body` provides.
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// CORS for the configured origins. A `*` entry allows any origin.
///
/// Auth travels in the `Authorization` header, so credentials mode is
/// never needed. Unparseable origins are logged and skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(CORS_MAX_AGE);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AnyOrigin);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// A panicking handler answers with the usual 500 error body.
fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    AppError::InternalError("request handler panicked".to_string()).into_response()
}
