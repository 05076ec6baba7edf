//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! and the command runners.

pub mod alert_cmd;
pub mod app;
pub mod args;
pub mod config_cmd;
pub mod monitor_app;
pub mod prefs_cmd;
pub mod presenter;
pub mod signals;
pub mod zones_cmd;

// Re-export commonly used types
pub use app::{AlertOptions, MonitorOptions, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ContactsAction, TriggerAction, ZonesAction};
pub use monitor_app::run_monitor;
pub use presenter::Presenter;
