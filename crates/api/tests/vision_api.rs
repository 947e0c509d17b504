//! HTTP-level integration tests for the vision document, chat log and
//! the vision-chat function.

mod common;

use axum::http::StatusCode;
use common::{body_json, create, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Vision document
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn vision_is_null_before_first_save(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/vision").await).await;

    assert!(json["data"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_save_creates_then_updates_in_place(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = put_json(
        app.clone(),
        "/api/v1/vision",
        json!({ "content": { "mission": " Build calm tools ", "values": ["focus", " "] } }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;
    assert_eq!(first["data"]["content"]["mission"], "Build calm tools");
    assert_eq!(first["data"]["content"]["values"], json!(["focus"]));

    let second = put_json(
        app.clone(),
        "/api/v1/vision",
        json!({ "content": { "mission": "Build calmer tools", "toolStack": ["rust"] } }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["content"]["toolStack"], json!(["rust"]));

    let latest = body_json(get(app, "/api/v1/vision").await).await;
    assert_eq!(latest["data"]["content"]["mission"], "Build calmer tools");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_vision_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let goals: Vec<String> = (0..21).map(|i| format!("goal {i}")).collect();
    let response = put_json(app, "/api/v1/vision", json!({ "content": { "goals": goals } })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Chat log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn chats_listed_oldest_first(pool: PgPool) {
    let app = common::build_test_app(pool);
    create(app.clone(), "/api/v1/vision/chats", json!({ "message": "one" })).await;
    create(app.clone(), "/api/v1/vision/chats", json!({ "message": "two" })).await;
    create(app.clone(), "/api/v1/vision/chats", json!({ "message": "three" })).await;

    let json = body_json(get(app, "/api/v1/vision/chats?limit=2").await).await;
    let chats = json["data"].as_array().unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0]["message"], "two");
    assert_eq!(chats[1]["message"], "three");
    assert_eq!(chats[1]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_chat_message_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/vision/chats", json!({ "message": "  " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_chat(pool: PgPool) {
    let app = common::build_test_app(pool);
    let chat = create(app.clone(), "/api/v1/vision/chats", json!({ "message": "oops" })).await;
    let uri = format!("/api/v1/vision/chats/{}", chat["id"].as_str().unwrap());

    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// vision-chat function
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn assistant_onboards_without_vision(pool: PgPool) {
    let app = common::build_test_app(pool);
    let reply = create(
        app,
        "/api/v1/functions/vision-chat",
        json!({ "message": "What is my mission?" }),
    )
    .await;

    assert_eq!(reply["role"], "assistant");
    assert!(reply["message"]
        .as_str()
        .unwrap()
        .starts_with("I'd be happy to help you define your vision"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assistant_uses_stored_vision(pool: PgPool) {
    let app = common::build_test_app(pool);
    put_json(
        app.clone(),
        "/api/v1/vision",
        json!({ "content": { "mission": "Help small teams focus" } }),
    )
    .await;

    let reply = create(
        app.clone(),
        "/api/v1/functions/vision-chat",
        json!({ "message": "How do I achieve my goals?" }),
    )
    .await;
    assert!(reply["message"]
        .as_str()
        .unwrap()
        .starts_with("Breaking down your goals"));

    // The assistant turn lands in the chat log.
    let chats = body_json(get(app, "/api/v1/vision/chats").await).await;
    assert_eq!(chats["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assistant_prefers_request_vision(pool: PgPool) {
    let app = common::build_test_app(pool);
    let reply = create(
        app,
        "/api/v1/functions/vision-chat",
        json!({
            "message": "Which values matter?",
            "visionDocument": { "mission": "Inline" },
            "recentChats": [{ "role": "user", "message": "hi" }]
        }),
    )
    .await;

    assert!(reply["message"]
        .as_str()
        .unwrap()
        .starts_with("Your values are the compass"));
}
