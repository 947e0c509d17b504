//! HTTP-level integration tests for the analytics report.

mod common;

use axum::http::StatusCode;
use common::{body_json, create, get, patch_json, post_empty};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_report_uses_month_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/analytics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let report = &json["data"];
    assert_eq!(report["range"], "month");
    assert_eq!(report["overview"]["total_sessions"], 0);
    assert_eq!(report["patterns"]["best_day"], "No data");
    assert_eq!(report["patterns"]["current_streak"], 0);
    assert!(report["daily"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_counts_sessions_initiatives_and_ideas(pool: PgPool) {
    let app = common::build_test_app(pool);

    let initiative = create(
        app.clone(),
        "/api/v1/initiatives",
        json!({ "name": "Launch", "impact": 4, "effort": 2, "status": "active" }),
    )
    .await;
    let done = create(
        app.clone(),
        "/api/v1/initiatives",
        json!({ "name": "Done", "impact": 2, "effort": 2 }),
    )
    .await;
    patch_json(
        app.clone(),
        &format!("/api/v1/initiatives/{}/status", done["id"].as_str().unwrap()),
        json!({ "status": "completed" }),
    )
    .await;

    let session = create(
        app.clone(),
        "/api/v1/sessions",
        json!({ "initiative_id": initiative["id"] }),
    )
    .await;
    post_empty(
        app.clone(),
        &format!("/api/v1/sessions/{}/complete", session["id"].as_str().unwrap()),
    )
    .await;

    create(app.clone(), "/api/v1/ideas", json!({ "title": "one" })).await;
    create(app.clone(), "/api/v1/ideas", json!({ "title": "two", "status": "explored" })).await;

    let json = body_json(get(app, "/api/v1/analytics?range=week&tz_offset_minutes=60").await).await;
    let report = &json["data"];
    assert_eq!(report["range"], "week");
    assert_eq!(report["overview"]["total_sessions"], 1);
    assert_eq!(report["overview"]["active_initiatives"], 1);
    assert_eq!(report["overview"]["completed_initiatives"], 1);
    assert_eq!(report["overview"]["ideas_by_status"]["captured"], 1);
    assert_eq!(report["overview"]["ideas_by_status"]["explored"], 1);
    assert_eq!(report["patterns"]["completion_rate"], 100);
    assert_eq!(report["patterns"]["current_streak"], 1);
    assert_eq!(report["daily"].as_array().unwrap().len(), 1);
    assert_eq!(report["initiatives"]["top"][0]["name"], "Launch");
    assert_eq!(report["initiatives"]["top"][0]["session_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_range_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/analytics?range=year").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
