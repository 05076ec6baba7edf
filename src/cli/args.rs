//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Safeguard - listens for a safety word while you are inside a danger zone
#[derive(Parser, Debug)]
#[command(name = "safeguard")]
#[command(version)]
#[command(about = "Geofenced safety-word monitor that texts your emergency contacts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch a position feed and record while inside danger zones
    Monitor(MonitorArgs),
    /// Inspect the danger zone table
    Zones {
        #[command(subcommand)]
        action: ZonesAction,
    },
    /// Manage emergency contacts
    Contacts {
        #[command(subcommand)]
        action: ContactsAction,
    },
    /// Show or change the safety word
    Trigger {
        #[command(subcommand)]
        action: TriggerAction,
    },
    /// Send the emergency SMS now
    Alert(AlertArgs),
    /// Print the map link sent in alerts
    #[command(allow_negative_numbers = true)]
    MapsUrl {
        /// Latitude in decimal degrees
        latitude: f64,
        /// Longitude in decimal degrees
        longitude: f64,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `monitor`
#[derive(Args, Debug, Default)]
pub struct MonitorArgs {
    /// Position feed, one "lat,lon" or JSON reading per line ("-" for stdin)
    #[arg(short = 'p', long, value_name = "FILE")]
    pub positions: Option<PathBuf>,

    /// Length of each recorded clip (e.g., 5s, 1500ms)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub clip_duration: Option<String>,

    /// Safety word for this run (overrides the saved one)
    #[arg(short = 't', long, value_name = "WORD")]
    pub trigger_word: Option<String>,

    /// SMS relay endpoint
    #[arg(long, value_name = "URL")]
    pub sms_relay_url: Option<String>,

    /// File reused for every recorded clip
    #[arg(long, value_name = "FILE")]
    pub clip_path: Option<PathBuf>,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,
}

/// Options for `alert`
#[derive(Args, Debug, Default)]
pub struct AlertArgs {
    /// Location to report as "lat,lon" (defaults to the fallback location)
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub at: Option<String>,

    /// Safety word quoted in the message (defaults to the saved one)
    #[arg(short = 't', long, value_name = "WORD")]
    pub trigger_word: Option<String>,

    /// SMS relay endpoint
    #[arg(long, value_name = "URL")]
    pub sms_relay_url: Option<String>,

    /// Print the message and recipients without sending
    #[arg(long)]
    pub dry_run: bool,
}

/// Zone subcommands
#[derive(Subcommand, Debug)]
pub enum ZonesAction {
    /// List configured zones
    List,
    /// Show which zone, if any, contains a coordinate
    #[command(allow_negative_numbers = true)]
    Check {
        latitude: f64,
        longitude: f64,
    },
}

/// Contact subcommands
#[derive(Subcommand, Debug)]
pub enum ContactsAction {
    /// List saved contacts
    List,
    /// Add a contact
    Add {
        /// Display name
        name: String,
        /// Phone number (digits, optional leading +)
        phone: String,
    },
    /// Remove contacts by phone number or name
    Remove {
        /// Phone number or name
        contact: String,
    },
    /// Restore the default contact list
    Reset,
}

/// Safety word subcommands
#[derive(Subcommand, Debug)]
pub enum TriggerAction {
    /// Print the saved safety word
    Get,
    /// Save a new safety word
    Set {
        word: String,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "transcription_url",
    "sms_relay_url",
    "clip_duration",
    "request_timeout",
    "sms_retries",
    "notify",
    "clip_path",
    "fallback_location",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
