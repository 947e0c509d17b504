use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use helm_core::realtime::ServerMessage;
use helm_core::records::RecordKind;
use helm_core::types::{Timestamp, UserId};
use helm_events::RecordChange;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One open change-feed connection.
pub struct WsConnection {
    /// Changes are only delivered for rows this user owns.
    pub user_id: UserId,
    pub sender: WsSender,
    pub connected_at: Timestamp,
    /// Tables this connection listens to.
    pub subscriptions: HashSet<RecordKind>,
}

/// Manages all active WebSocket connections and their table subscriptions.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` and shared across
/// the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection with no subscriptions.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String, user_id: UserId) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
            subscriptions: HashSet::new(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection and with it every subscription it held.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Start listening to `table`. Returns `false` for an unknown connection.
    pub async fn subscribe(&self, conn_id: &str, table: RecordKind) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.subscriptions.insert(table);
                true
            }
            None => false,
        }
    }

    /// Stop listening to `table`. Returns `false` for an unknown connection.
    pub async fn unsubscribe(&self, conn_id: &str, table: RecordKind) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.subscriptions.remove(&table);
                true
            }
            None => false,
        }
    }

    pub async fn is_subscribed(&self, conn_id: &str, table: RecordKind) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .is_some_and(|conn| conn.subscriptions.contains(&table))
    }

    /// Push a protocol message to one connection.
    pub async fn send_to(&self, conn_id: &str, message: &ServerMessage) -> bool {
        let Some(frame) = encode(message) else {
            return false;
        };
        match self.connections.read().await.get(conn_id) {
            Some(conn) => conn.sender.send(frame).is_ok(),
            None => false,
        }
    }

    /// Deliver a change to every connection of its owner subscribed to
    /// its table.
    ///
    /// Returns the number of connections the change was sent to. Closed
    /// channels are skipped; their connections are cleaned up when their
    /// receive loop ends.
    pub async fn deliver(&self, change: &RecordChange) -> usize {
        let Some(frame) = encode(&change.to_server_message()) else {
            return 0;
        };
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values() {
            if change.visible_to(conn.user_id) && conn.subscriptions.contains(&change.kind) {
                let _ = conn.sender.send(frame.clone());
                count += 1;
            }
        }
        count
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of connections listening to `table`.
    pub async fn subscriber_count(&self, table: RecordKind) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.subscriptions.contains(&table))
            .count()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode server message");
            None
        }
    }
}
