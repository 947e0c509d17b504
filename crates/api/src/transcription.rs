//! Voice-log transcription.
//!
//! [`Transcriber`] is the seam a speech model would plug into. The default
//! [`ScriptedTranscriber`] ignores the audio and returns one of the canned
//! daily reports, so the journal pipeline can run without a model.

use async_trait::async_trait;
use helm_core::journal::CANNED_TRANSCRIPTS;
use rand::seq::IndexedRandom;

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("Audio not available: {0}")]
    AudioUnavailable(String),

    #[error("Transcription failed: {0}")]
    Failed(String),
}

/// Turns the audio at a public URL into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_url: &str) -> Result<String, TranscribeError>;
}

/// Picks a canned report at random.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedTranscriber;

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio_url: &str) -> Result<String, TranscribeError> {
        let text = CANNED_TRANSCRIPTS
            .choose(&mut rand::rng())
            .copied()
            .ok_or_else(|| TranscribeError::Failed("no canned transcripts".into()))?;
        tracing::debug!(audio_url, "Returning scripted transcript");
        Ok(text.to_string())
    }
}

/// Always returns the same text.
#[derive(Debug, Clone)]
pub struct FixedTranscriber(pub String);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio_url: &str) -> Result<String, TranscribeError> {
        Ok(self.0.clone())
    }
}
