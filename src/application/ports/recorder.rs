//! Clip recorder port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::AudioData;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Audio recorder not found. Please install ffmpeg.")]
    RecorderNotFound,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to read audio file: {0}")]
    ReadFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,
}

/// Port for capturing short clips into a single reusable file
#[async_trait]
pub trait ClipRecorder: Send + Sync {
    /// Begin capturing into `output`.
    ///
    /// Any stale file left at `output` by a previous cycle is deleted first.
    async fn start(&self, output: &Path) -> Result<(), RecordingError>;

    /// Finish the capture and read the clip back.
    async fn stop(&self) -> Result<AudioData, RecordingError>;

    /// Abort the capture and discard the clip.
    async fn cancel(&self) -> Result<(), RecordingError>;

    /// Check if a capture is in progress
    fn is_recording(&self) -> bool;
}
