//! Authentication and per-user scoping at the HTTP layer.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create, get, get_auth, post_json_auth, send};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/ideas", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_bearer_header_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/api/v1/ideas")
        .header("authorization", "Basic abc")
        .body(Body::empty())
        .unwrap();

    assert_eq!(send(app, request).await.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_without_dev_user_returns_401(pool: PgPool) {
    let dir = std::env::temp_dir().join(format!("helm-test-{}", Uuid::new_v4()));
    let mut state = common::test_state(pool, &dir);
    let mut config = (*state.config).clone();
    config.dev_user_id = None;
    state.config = Arc::new(config);
    let app = common::build_test_app_with_state(state);

    assert_eq!(get(app, "/api/v1/ideas").await.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_user_owns_created_rows(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = Uuid::now_v7();
    let token = common::token_for(alice);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/ideas",
        json!({ "title": "Alice's idea" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], alice.to_string());

    // The dev user sees nothing of Alice's.
    let dev_list = body_json(get(app, "/api/v1/ideas").await).await;
    assert!(dev_list["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rows_of_other_users_are_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let idea = create(app.clone(), "/api/v1/ideas", json!({ "title": "Mine" })).await;
    let token = common::token_for(Uuid::now_v7());

    let response = get_auth(
        app,
        &format!("/api/v1/ideas/{}", idea["id"].as_str().unwrap()),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_sessions_are_per_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    create(app.clone(), "/api/v1/sessions", json!({})).await;

    let token = common::token_for(Uuid::now_v7());
    let response = post_json_auth(app, "/api/v1/sessions", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
