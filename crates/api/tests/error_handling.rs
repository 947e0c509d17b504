//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use axum::response::IntoResponse;
use helm_api::error::AppError;
use helm_core::error::CoreError;
use http_body_util::BodyExt;
use uuid::Uuid;

async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_names_entity_and_id() {
    let id = Uuid::now_v7();
    let (status, json) = error_to_response(AppError::not_found("Idea", id)).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Idea with id {id} not found"));
}

#[tokio::test]
async fn validation_maps_to_400() {
    let (status, json) = error_to_response(AppError::validation("title too long")).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "title too long");
}

#[tokio::test]
async fn conflict_maps_to_409() {
    let err = AppError::Core(CoreError::Conflict("Session has already ended".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn path_not_found_maps_to_404() {
    let (status, json) = error_to_response(AppError::NotFound("voice-logs/x".into())).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "voice-logs/x");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("disk path /var/secret".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
