//! HTTP-level integration tests for voice-log uploads.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_bytes, body_json, get, send};
use sqlx::PgPool;

const BOUNDARY: &str = "helm-test-boundary";

fn multipart_upload(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: audio/webm\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/storage/voice-logs")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_then_download(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_state(common::test_state(pool, dir.path()));
    let audio = b"\x1a\x45\xdf\xa3 fake webm bytes";

    let response = send(app.clone(), multipart_upload("file", "clip.webm", audio)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let path = json["data"]["path"].as_str().unwrap().to_string();
    let public_url = json["data"]["public_url"].as_str().unwrap();

    assert!(path.starts_with(&common::DEV_USER.to_string()));
    assert!(path.ends_with(".webm"));
    assert_eq!(json["data"]["size_bytes"], audio.len());
    assert!(public_url.starts_with(common::PUBLIC_BASE_URL));

    // File is on disk under the voice-logs bucket.
    let on_disk = dir.path().join("voice-logs").join(&path);
    assert_eq!(std::fs::read(on_disk).unwrap(), audio);

    let uri = public_url.trim_start_matches(common::PUBLIC_BASE_URL);
    let download = get(app, uri).await;
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(body_bytes(download).await, audio);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_extension_returns_400(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_state(common::test_state(pool, dir.path()));

    let response = send(app, multipart_upload("file", "notes.txt", b"hello")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_file_field_returns_400(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_state(common::test_state(pool, dir.path()));

    let response = send(app, multipart_upload("audio", "clip.webm", b"data")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("'file'"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_missing_object_returns_404(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_state(common::test_state(pool, dir.path()));

    let response = get(app, "/api/v1/storage/voice-logs/someone/nothing.webm").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_rejects_hidden_segments(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_state(common::test_state(pool, dir.path()));

    let response = get(app, "/api/v1/storage/voice-logs/.config/secrets.webm").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
