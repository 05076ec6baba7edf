//! Domain layer - Core business logic
//!
//! Contains value objects, state machines, and domain errors.
//! This layer has no dependencies on external systems.

pub mod alert;
pub mod config;
pub mod contacts;
pub mod error;
pub mod geo;
pub mod monitor;
pub mod recording;
pub mod transcription;
pub mod trigger;

// Re-export common types
pub use alert::{generate_maps_url, AlertMessage};
pub use config::AppConfig;
pub use contacts::{ContactList, EmergencyContact};
pub use error::*;
pub use geo::{find_zone, DangerZone, Position, Severity, ZoneKind};
pub use monitor::{MonitorPhase, MonitorSnapshot, MonitorState, StopToken, ZoneTransition};
pub use recording::Duration;
pub use transcription::{AudioData, AudioMimeType, Transcript};
pub use trigger::{matches, TriggerWord};
