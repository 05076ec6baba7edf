//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod location;
pub mod notifier;
pub mod recorder;
pub mod sms;
pub mod storage;
pub mod transcriber;

// Re-export common types
pub use config::ConfigStore;
pub use location::{LocationError, LocationProvider, PositionSource};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use recorder::{ClipRecorder, RecordingError};
pub use sms::{SmsError, SmsRelay};
pub use storage::{KeyValueStore, StorageError};
pub use transcriber::{Transcriber, TranscriptionError};
