use std::path::PathBuf;

use helm_core::types::UserId;

use crate::auth::jwt::JwtConfig;

/// Default cap on a single voice-log upload (25 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Seconds between WebSocket pings (default: `30`, minimum `1`).
    pub heartbeat_interval_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// When set, requests without a bearer token act as this user.
    pub dev_user_id: Option<UserId>,
    /// Directory uploaded voice logs are written under.
    pub storage_root: PathBuf,
    /// Base URL used to build public links to stored objects.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `HEARTBEAT_INTERVAL_SECS` | `30`                    |
    /// | `JWT_SECRET`           | required                   |
    /// | `DEV_USER_ID`          | unset                      |
    /// | `STORAGE_ROOT`         | `storage`                  |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:{PORT}`  |
    /// | `MAX_UPLOAD_BYTES`     | `26214400`                 |
    /// | `LOG_FORMAT`           | `plain` (or `json`)        |
    ///
    /// `DATABASE_URL` is read separately by the binary.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let heartbeat_interval_secs: u64 = std::env::var("HEARTBEAT_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse::<u64>()
            .expect("HEARTBEAT_INTERVAL_SECS must be a valid u64")
            .max(1);

        let jwt = JwtConfig::from_env();

        let dev_user_id = std::env::var("DEV_USER_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .expect("DEV_USER_ID must be a valid UUID")
            });

        let storage_root = PathBuf::from(
            std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into()),
        );

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Plain,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            heartbeat_interval_secs,
            jwt,
            dev_user_id,
            storage_root,
            public_base_url,
            max_upload_bytes,
            log_format,
        }
    }

    /// Directory holding uploaded voice logs.
    pub fn voice_log_dir(&self) -> PathBuf {
        self.storage_root.join(crate::handlers::storage::VOICE_LOG_BUCKET)
    }
}
