//! Voice-log audio storage.
//!
//! Uploads land under `{STORAGE_ROOT}/voice-logs/{user_id}/` and are
//! served back publicly so the transcriber can fetch them by URL.

use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Bucket (directory) holding voice-log recordings.
pub const VOICE_LOG_BUCKET: &str = "voice-logs";

/// Accepted audio container extensions.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["webm", "ogg", "mp3", "wav", "m4a"];

#[derive(Debug, Serialize)]
pub struct StoredObject {
    /// Path relative to the bucket, `{user_id}/{file}`.
    pub path: String,
    pub public_url: String,
    pub size_bytes: usize,
}

/// POST /api/v1/storage/voice-logs
///
/// Multipart upload with a single `file` field.
pub async fn upload_voice_log(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<StoredObject>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("recording.webm").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let ext = audio_extension(&filename)?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {} byte upload limit",
            state.config.max_upload_bytes
        )));
    }

    let digest = format!("{:x}", Sha256::digest(&data));
    let object_name = format!("{}-{}.{ext}", Utc::now().timestamp_millis(), &digest[..16]);

    let user_dir = state.config.voice_log_dir().join(user.user_id.to_string());
    tokio::fs::create_dir_all(&user_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create storage dir: {e}")))?;
    tokio::fs::write(user_dir.join(&object_name), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write file: {e}")))?;

    let path = format!("{}/{object_name}", user.user_id);
    let public_url = format!(
        "{}/api/v1/storage/{VOICE_LOG_BUCKET}/{path}",
        state.config.public_base_url.trim_end_matches('/')
    );
    tracing::info!(
        user_id = %user.user_id,
        path = %path,
        size_bytes = data.len(),
        "Voice log stored",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(StoredObject {
            path,
            public_url,
            size_bytes: data.len(),
        })),
    ))
}

/// GET /api/v1/storage/voice-logs/{user_dir}/{file}
///
/// Public read, like a public storage bucket.
pub async fn download_voice_log(
    State(state): State<AppState>,
    Path((user_dir, file)): Path<(String, String)>,
    request: Request,
) -> AppResult<Response> {
    if !is_plain_segment(&user_dir) || !is_plain_segment(&file) {
        return Err(AppError::BadRequest("Invalid storage path".into()));
    }
    let path = state.config.voice_log_dir().join(&user_dir).join(&file);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(AppError::NotFound(format!(
            "Object {VOICE_LOG_BUCKET}/{user_dir}/{file} not found"
        )));
    }

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(response.into_response())
}

fn audio_extension(filename: &str) -> AppResult<String> {
    let ext = FsPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !SUPPORTED_AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported audio format '{ext}'. Supported: {}",
            SUPPORTED_AUDIO_EXTENSIONS.join(", ")
        )));
    }
    Ok(ext)
}

/// One path segment with no separators or parent references.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
        && !segment.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allowlist() {
        assert_eq!(audio_extension("clip.WEBM").unwrap(), "webm");
        assert!(audio_extension("clip.exe").is_err());
        assert!(audio_extension("noext").is_err());
    }

    #[test]
    fn rejects_traversal_segments() {
        assert!(is_plain_segment("1730000000000-abc.webm"));
        assert!(!is_plain_segment(".."));
        assert!(!is_plain_segment("a/b"));
        assert!(!is_plain_segment(".hidden"));
        assert!(!is_plain_segment(""));
    }
}
