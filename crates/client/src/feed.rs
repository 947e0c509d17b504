//! Change-feed WebSocket client.
//!
//! One connection per user. Tables are subscribed individually and every
//! committed write to them arrives as a [`ServerMessage::Change`]. There
//! is no reconnect logic: when the socket closes the caller reconnects
//! and refetches.

use futures::{SinkExt, StreamExt};
use helm_core::realtime::{ClientMessage, ServerMessage};
use helm_core::records::RecordKind;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::api::HelmApi;
use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open change-feed connection.
pub struct ChangeFeed {
    ws: WsStream,
}

impl ChangeFeed {
    /// Connect to `ws_url` (e.g. `ws://localhost:3000/api/v1/ws`).
    ///
    /// The token, if any, travels as `?token=` since browsers cannot set
    /// headers on a WebSocket upgrade.
    pub async fn connect(ws_url: &str, token: Option<&str>) -> Result<Self, ClientError> {
        let url = match token {
            Some(token) => format!("{ws_url}?token={token}"),
            None => ws_url.to_string(),
        };

        let (ws, _response) = connect_async(&url)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        tracing::info!(url = %ws_url, "Connected to change feed");
        Ok(Self { ws })
    }

    /// Connect using the same server and token as `api`.
    pub async fn connect_for(api: &HelmApi) -> Result<Self, ClientError> {
        Self::connect(&feed_url(api.base_url()), api.token()).await
    }

    pub async fn subscribe(&mut self, table: RecordKind) -> Result<(), ClientError> {
        self.send(&ClientMessage::Subscribe { table }).await
    }

    pub async fn unsubscribe(&mut self, table: RecordKind) -> Result<(), ClientError> {
        self.send(&ClientMessage::Unsubscribe { table }).await
    }

    pub async fn ping(&mut self) -> Result<(), ClientError> {
        self.send(&ClientMessage::Ping).await
    }

    async fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        let json =
            serde_json::to_string(msg).map_err(|e| ClientError::Protocol(e.to_string()))?;
        self.ws
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))
    }

    /// Next server message of any kind. `None` once the socket closes.
    pub async fn next_message(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(frame) = self.ws.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    let msg: ServerMessage = serde_json::from_str(&text)
                        .map_err(|e| ClientError::Protocol(format!("bad server message: {e}")))?;
                    return Ok(Some(msg));
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!("Ignoring binary frame on change feed");
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "Change feed closed by server");
                    return Ok(None);
                }
                Ok(Message::Frame(_)) => {}
                Err(e) => return Err(ClientError::Connection(e.to_string())),
            }
        }
        Ok(None)
    }

    /// Next change event, skipping acknowledgements and pongs.
    ///
    /// Server-side `error` messages are logged and skipped.
    pub async fn next_change(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(msg) = self.next_message().await? {
            match msg {
                ServerMessage::Change { .. } => return Ok(Some(msg)),
                ServerMessage::Error { message } => {
                    tracing::warn!(error = %message, "Change feed reported an error");
                }
                ServerMessage::Subscribed { table } => {
                    tracing::debug!(%table, "Subscribed");
                }
                ServerMessage::Unsubscribed { .. } | ServerMessage::Pong => {}
            }
        }
        Ok(None)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.ws
            .close(None)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))
    }
}

/// Derive the WebSocket endpoint from an HTTP origin.
pub fn feed_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let origin = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{origin}/api/v1/ws")
}
