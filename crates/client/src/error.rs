/// Errors from the Helm client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}, {code}): {message}")]
    Api {
        status: u16,
        /// Machine-readable code from the error body, e.g. `CONFLICT`.
        code: String,
        message: String,
    },

    /// Failed to open the change-feed WebSocket.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unexpected frame or payload on an open connection.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
