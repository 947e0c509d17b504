//! The client crate against a live server on a local port.

mod common;

use std::time::Duration;

use helm_api::realtime::ChangeRouter;
use helm_client::recorder::submit_clip;
use helm_client::{ChangeFeed, HelmApi, LiveCollection, VoiceRecorder};
use helm_core::realtime::ServerMessage;
use helm_core::records::RecordKind;
use helm_db::models::idea::{CreateIdea, Idea, PromoteIdea};
use helm_db::models::work_session::StartWorkSession;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Serve the full app with the change router running; returns the origin.
async fn spawn_server(pool: PgPool) -> (String, CancellationToken) {
    let dir = std::env::temp_dir().join(format!("helm-test-{}", Uuid::new_v4()));
    let state = common::test_state(pool, &dir);

    let cancel = CancellationToken::new();
    let router = ChangeRouter::new(state.ws_manager.clone());
    tokio::spawn(router.run(state.change_bus.subscribe(), cancel.clone()));

    let app = common::build_test_app_with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), cancel)
}

fn client_for(base: &str, user: Uuid) -> HelmApi {
    HelmApi::new(base).with_token(common::token_for(user))
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rest_calls_round_trip(pool: PgPool) {
    let (base, cancel) = spawn_server(pool).await;
    let api = client_for(&base, Uuid::now_v7());

    assert!(api.health().await.unwrap().db_healthy);

    let idea = api
        .create_idea(&CreateIdea {
            title: "Offline mode".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(idea.status, "captured");
    assert_eq!(api.idea_counts().await.unwrap().captured, 1);

    let promotion = api
        .promote_idea(idea.id, &PromoteIdea { impact: 4, effort: 2 })
        .await
        .unwrap();
    assert_eq!(promotion.idea.status, "explored");
    assert_eq!(promotion.initiative.name, "Offline mode");

    let err = api.get_idea(Uuid::now_v7()).await.unwrap_err();
    assert!(err.is_not_found());

    let session = api.start_session(&StartWorkSession::default()).await.unwrap();
    let err = api
        .start_session(&StartWorkSession::default())
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let timer = api.session_timer(session.id).await.unwrap();
    assert_eq!(timer.reading.target_seconds, 90 * 60);
    api.complete_session(session.id).await.unwrap();
    assert!(api.active_session().await.unwrap().is_none());

    cancel.cancel();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_keeps_live_collection_in_sync(pool: PgPool) {
    let (base, cancel) = spawn_server(pool).await;
    let user = Uuid::now_v7();
    let api = client_for(&base, user);

    let mut live: LiveCollection<Idea> = LiveCollection::new(RecordKind::Idea);
    live.mount(|| api.list_ideas(None)).await.unwrap();
    assert!(live.records().is_empty());

    let mut feed = ChangeFeed::connect_for(&api).await.unwrap();
    feed.subscribe(RecordKind::Idea).await.unwrap();
    let ack = feed.next_message().await.unwrap().unwrap();
    assert_eq!(
        ack,
        ServerMessage::Subscribed {
            table: RecordKind::Idea
        }
    );

    let created = api
        .create_idea(&CreateIdea {
            title: "Sync me".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let change = tokio::time::timeout(Duration::from_secs(5), feed.next_change())
        .await
        .expect("change within timeout")
        .unwrap()
        .unwrap();
    assert!(live.apply_message(&change).unwrap());
    assert_eq!(live.get(created.id).unwrap().title, "Sync me");

    // Another user's writes never reach this feed.
    let other = client_for(&base, Uuid::now_v7());
    other
        .create_idea(&CreateIdea {
            title: "Not yours".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    api.delete_idea(created.id).await.unwrap();

    let change = tokio::time::timeout(Duration::from_secs(5), feed.next_change())
        .await
        .expect("change within timeout")
        .unwrap()
        .unwrap();
    assert_eq!(change.record_id(), Some(created.id));
    assert!(live.apply_message(&change).unwrap());
    assert!(live.records().is_empty());

    feed.close().await.unwrap();
    cancel.cancel();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recorded_clip_becomes_log_entry(pool: PgPool) {
    let (base, cancel) = spawn_server(pool).await;
    let api = client_for(&base, Uuid::now_v7());

    let t0 = std::time::Instant::now();
    let mut recorder = VoiceRecorder::default();
    recorder.start(t0).unwrap();
    recorder.push_chunk(b"fake opus frames");
    let clip = recorder.stop(t0 + Duration::from_secs(12)).unwrap();

    let entry = submit_clip(&api, &clip).await.unwrap();
    let content = entry.content.unwrap().0;
    assert_eq!(content.achievements.len(), 2);
    assert!(entry.audio_url.unwrap().ends_with(".webm"));

    let today = api.todays_log(0).await.unwrap().unwrap();
    assert_eq!(today.id, entry.id);

    cancel.cancel();
}
