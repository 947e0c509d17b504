#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use helm_api::auth::jwt::{generate_access_token, JwtConfig};
use helm_api::config::{LogFormat, ServerConfig};
use helm_api::router::build_app_router;
use helm_api::state::AppState;
use helm_api::transcription::FixedTranscriber;
use helm_api::ws::WsManager;
use helm_core::journal::CANNED_TRANSCRIPTS;
use helm_core::types::UserId;
use helm_events::ChangeBus;

/// User that unauthenticated test requests act as.
pub const DEV_USER: UserId = Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001);

pub const PUBLIC_BASE_URL: &str = "http://helm.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// Requests without a bearer token act as [`DEV_USER`].
pub fn test_config(storage_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        heartbeat_interval_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        dev_user_id: Some(DEV_USER),
        storage_root,
        public_base_url: PUBLIC_BASE_URL.to_string(),
        max_upload_bytes: 1024 * 1024,
        log_format: LogFormat::Plain,
    }
}

/// Application state with a fresh WebSocket manager and change bus.
///
/// The transcriber always returns the first canned report.
pub fn test_state(pool: PgPool, storage_root: &Path) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config(storage_root.to_path_buf())),
        ws_manager: Arc::new(WsManager::new()),
        change_bus: Arc::new(ChangeBus::default()),
        transcriber: Arc::new(FixedTranscriber(CANNED_TRANSCRIPTS[0].to_string())),
    }
}

/// Build the full application router, the same one `main.rs` serves.
pub fn build_test_app(pool: PgPool) -> Router {
    let root = std::env::temp_dir().join(format!("helm-test-{}", Uuid::new_v4()));
    build_test_app_with_state(test_state(pool, &root))
}

pub fn build_test_app_with_state(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_app_router(state, &config)
}

/// Access token for `user_id` signed with the test secret.
pub fn token_for(user_id: UserId) -> String {
    let config = test_config(PathBuf::new());
    generate_access_token(user_id, &config.jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request("POST", uri, body, Some(token))).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("POST", uri, None)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("PUT", uri, body, None)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("PATCH", uri, body, None)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("DELETE", uri, None)).await
}

/// Create a resource as the dev user and return its `data` object.
pub async fn create(app: Router, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, uri, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}
