//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like FFmpeg, the transcription API,
//! the SMS relay and the desktop notification service.

pub mod config;
pub mod location;
pub mod notification;
pub mod recording;
pub mod sms;
pub mod storage;
pub mod transcription;

// Re-export adapters
pub use config::XdgConfigStore;
pub use location::{FixedLocation, LatestFix, LinePositionFeed};
pub use notification::{create_notifier, NoopNotifier, NotifyRustNotifier};
pub use recording::FfmpegClipRecorder;
pub use sms::{HttpSmsRelay, RetryingSmsRelay};
pub use storage::FileKeyValueStore;
pub use transcription::DeepgramTranscriber;
