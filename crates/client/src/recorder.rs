//! Voice-log recording.
//!
//! [`VoiceRecorder`] is a small state machine around the audio chunks a
//! capture device hands over. It tracks elapsed time without the paused
//! spans and produces an [`AudioClip`] that [`submit_clip`] uploads and
//! turns into a log entry.
//!
//! Instants are passed in by the caller so the clock stays under test
//! control.

use std::time::{Duration, Instant};

use helm_db::models::log_entry::LogEntry;

use crate::api::HelmApi;
use crate::error::ClientError;

pub const DEFAULT_MIME_TYPE: &str = "audio/webm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("A recording is already in progress")]
    AlreadyRecording,
    #[error("Not recording")]
    NotRecording,
    #[error("Recording is not paused")]
    NotPaused,
    #[error("Nothing was recorded")]
    EmptyClip,
}

/// A finished recording.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub mime_type: String,
    /// Recorded time, pauses excluded.
    pub duration: Duration,
}

impl AudioClip {
    /// File name for upload, with an extension the storage endpoint accepts.
    pub fn file_name(&self, stem: &str) -> String {
        let subtype = self
            .mime_type
            .split('/')
            .nth(1)
            .and_then(|sub| sub.split(';').next())
            .map(str::trim)
            .unwrap_or_default();
        let ext = match subtype {
            "mpeg" => "mp3",
            "mp4" | "x-m4a" => "m4a",
            "wav" | "x-wav" | "wave" => "wav",
            "ogg" => "ogg",
            _ => "webm",
        };
        format!("{stem}.{ext}")
    }
}

#[derive(Debug)]
pub struct VoiceRecorder {
    state: RecorderState,
    mime_type: String,
    chunks: Vec<Vec<u8>>,
    /// Time recorded before the current running span.
    accumulated: Duration,
    /// Start of the current running span while recording.
    running_since: Option<Instant>,
}

impl Default for VoiceRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_MIME_TYPE)
    }
}

impl VoiceRecorder {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            state: RecorderState::Idle,
            mime_type: mime_type.into(),
            chunks: Vec::new(),
            accumulated: Duration::ZERO,
            running_since: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn start(&mut self, now: Instant) -> Result<(), RecorderError> {
        if self.state != RecorderState::Idle {
            return Err(RecorderError::AlreadyRecording);
        }
        self.reset();
        self.state = RecorderState::Recording;
        self.running_since = Some(now);
        Ok(())
    }

    pub fn pause(&mut self, now: Instant) -> Result<(), RecorderError> {
        if self.state != RecorderState::Recording {
            return Err(RecorderError::NotRecording);
        }
        self.close_span(now);
        self.state = RecorderState::Paused;
        Ok(())
    }

    pub fn resume(&mut self, now: Instant) -> Result<(), RecorderError> {
        if self.state != RecorderState::Paused {
            return Err(RecorderError::NotPaused);
        }
        self.running_since = Some(now);
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Accept one chunk from the capture device. Chunks that arrive
    /// while paused or idle are dropped.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if self.state == RecorderState::Recording && !chunk.is_empty() {
            self.chunks.push(chunk.to_vec());
        }
    }

    /// Recorded time at `now`, pauses excluded.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        self.accumulated + running
    }

    /// Finish and hand back the clip. The recorder returns to idle either way.
    pub fn stop(&mut self, now: Instant) -> Result<AudioClip, RecorderError> {
        if self.state == RecorderState::Idle {
            return Err(RecorderError::NotRecording);
        }
        self.close_span(now);
        let duration = self.accumulated;
        let data = self.chunks.concat();
        self.reset();

        if data.is_empty() {
            return Err(RecorderError::EmptyClip);
        }
        Ok(AudioClip {
            data,
            mime_type: self.mime_type.clone(),
            duration,
        })
    }

    /// Discard the recording.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn close_span(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    fn reset(&mut self) {
        self.state = RecorderState::Idle;
        self.chunks.clear();
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }
}

/// Upload `clip` and have the server transcribe it into a log entry.
pub async fn submit_clip(api: &HelmApi, clip: &AudioClip) -> Result<LogEntry, ClientError> {
    let stem = chrono::Utc::now().timestamp_millis().to_string();
    let stored = api
        .upload_voice_log(&clip.file_name(&stem), &clip.mime_type, clip.data.clone())
        .await?;
    tracing::info!(
        path = %stored.path,
        size_bytes = stored.size_bytes,
        duration_secs = clip.duration.as_secs(),
        "Voice log uploaded",
    );
    api.transcribe_log(&stored.public_url).await
}
