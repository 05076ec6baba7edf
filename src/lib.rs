//! Safeguard - geofenced safety-word monitor
//!
//! While the user is inside a known danger zone, short audio clips are
//! recorded back to back and sent for transcription. When the user's safety
//! word shows up in a transcript, an SMS with a map link to their location is
//! relayed to their emergency contacts.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Zones, positions, the monitor state machine, contacts and errors
//! - **Application**: Use cases (monitor, alert dispatch, preferences) and port traits
//! - **Infrastructure**: Adapters (ffmpeg, Deepgram, HTTP SMS relay, notify-rust, files)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
