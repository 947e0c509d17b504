use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use helm_core::realtime::{ClientMessage, ServerMessage};
use helm_core::types::UserId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::resolve_user;
use crate::state::AppState;
use crate::ws::manager::WsManager;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Browsers cannot set headers on a WebSocket upgrade.
    pub token: Option<String>,
}

/// GET /api/v1/ws?token=
///
/// Authenticates before upgrading; the connection then only ever sees the
/// caller's own rows.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let user = resolve_user(params.token.as_deref(), &state.config)?;
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state.ws_manager, user.user_id))
        .into_response())
}

/// Apply one inbound text frame and build the reply.
pub async fn dispatch_client_text(
    ws_manager: &WsManager,
    conn_id: &str,
    text: &str,
) -> ServerMessage {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            return ServerMessage::Error {
                message: format!("Invalid message: {e}"),
            }
        }
    };

    match message {
        ClientMessage::Subscribe { table } => {
            if !ws_manager.subscribe(conn_id, table).await {
                return unknown_connection(conn_id);
            }
            tracing::debug!(conn_id, table = %table, "Subscribed");
            ServerMessage::Subscribed { table }
        }
        ClientMessage::Unsubscribe { table } => {
            if !ws_manager.unsubscribe(conn_id, table).await {
                return unknown_connection(conn_id);
            }
            tracing::debug!(conn_id, table = %table, "Unsubscribed");
            ServerMessage::Unsubscribed { table }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}

fn unknown_connection(conn_id: &str) -> ServerMessage {
    tracing::debug!(conn_id, "Subscription change for a closed connection");
    ServerMessage::Error {
        message: "Connection is closed".to_string(),
    }
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection, forwards outbound messages from the manager
/// channel on a spawned task, answers protocol frames on this task and
/// removes the connection (and its subscriptions) on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: UserId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let reply = dispatch_client_text(&ws_manager, &conn_id, text.as_str()).await;
                ws_manager.send_to(&conn_id, &reply).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
