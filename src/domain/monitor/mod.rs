//! Danger-zone monitor state

mod state;
mod stop_token;

pub use state::{InvalidStateTransition, MonitorPhase, MonitorSnapshot, MonitorState, ZoneTransition};
pub use stop_token::StopToken;
