pub mod analytics;
pub mod functions;
pub mod health;
pub mod ideas;
pub mod initiatives;
pub mod log_entries;
pub mod sessions;
pub mod storage;
pub mod vision;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  change feed (WebSocket, ?token=)
///
/// /ideas                               list (?status=), create
/// /ideas/counts                        per-status counts
/// /ideas/{id}                          get, update, delete
/// /ideas/{id}/status                   set status (PATCH)
/// /ideas/{id}/promote                  promote to initiative (POST)
///
/// /vision                              latest document, upsert (PUT)
/// /vision/chats                        list (?limit=), append user turn
/// /vision/chats/{id}                   delete
///
/// /initiatives                         list (?status=&include_archived=), create
/// /initiatives/matrix                  impact/effort quadrants
/// /initiatives/{id}                    get, update, delete
/// /initiatives/{id}/status             set status (PATCH)
///
/// /sessions                            list (?since=), start
/// /sessions/active                     running session or null
/// /sessions/today                      daily progress (?tz_offset_minutes=)
/// /sessions/{id}                       get, delete
/// /sessions/{id}/complete              end as completed (POST)
/// /sessions/{id}/pause                 end early (POST)
/// /sessions/{id}/timer                 timer reading at server time
///
/// /log-entries                         list (?limit=&offset=), create
/// /log-entries/today                   today's entry (?tz_offset_minutes=)
/// /log-entries/history                 grouped by month
/// /log-entries/{id}                    get, update, delete
///
/// /storage/voice-logs                  upload (multipart)
/// /storage/voice-logs/{user}/{file}    download (public)
///
/// /functions/vision-chat               assistant reply (POST)
/// /functions/transcribe-log            voice log to entry (POST)
///
/// /analytics                           report (?range=&tz_offset_minutes=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Change feed.
        .route("/ws", get(ws::ws_handler))
        // Idea inbox.
        .nest("/ideas", ideas::router())
        // Vision document and assistant chat.
        .nest("/vision", vision::router())
        // Initiatives and the impact/effort matrix.
        .nest("/initiatives", initiatives::router())
        // Focus sessions.
        .nest("/sessions", sessions::router())
        // Daily journal.
        .nest("/log-entries", log_entries::router())
        // Object storage.
        .nest("/storage", storage::router())
        // Callable functions.
        .nest("/functions", functions::router())
        // Dashboard.
        .nest("/analytics", analytics::router())
}
