//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::{AudioData, Transcript};

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Transcription request timed out")]
    Timeout,

    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Port for speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Upload one clip and return its transcript.
    ///
    /// Single attempt; callers decide what a failure means.
    async fn transcribe(&self, audio: &AudioData) -> Result<Transcript, TranscriptionError>;

    /// Whether credentials are present. Monitoring refuses to start otherwise.
    fn is_configured(&self) -> bool {
        true
    }
}
