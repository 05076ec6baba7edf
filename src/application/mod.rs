//! Application layer - Use cases and port interfaces
//!
//! Contains the core safety operations and trait definitions
//! for external system interactions.

pub mod alert;
pub mod monitor;
pub mod ports;
pub mod preferences;

// Re-export use cases
pub use alert::{AlertConfig, AlertDispatcher, AlertError, AlertReceipt};
pub use monitor::{MonitorConfig, MonitorError, Observation, SessionOutcome, ZoneMonitor};
pub use preferences::{Preferences, PreferencesError, CONTACTS_KEY, TRIGGER_WORD_KEY};
