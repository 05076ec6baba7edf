//! Monitor state machine

use std::fmt;
use thiserror::Error;

use crate::domain::geo::DangerZone;

/// Monitor phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonitorPhase {
    #[default]
    Idle,
    ArmedInZone,
    RecordingCycle,
    ManualOverrideSuppressed,
}

impl MonitorPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ArmedInZone => "armed",
            Self::RecordingCycle => "recording",
            Self::ManualOverrideSuppressed => "suppressed",
        }
    }
}

impl fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_phase}")]
pub struct InvalidStateTransition {
    pub current_phase: MonitorPhase,
    pub action: String,
}

/// Result of comparing the previous zone with a fresh reading
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneTransition {
    Entered(DangerZone),
    Exited(DangerZone),
    /// A reading outside every zone lifted a manual override
    OverrideCleared,
    Unchanged,
}

/// Point-in-time copy of the monitor state
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSnapshot {
    pub phase: MonitorPhase,
    pub current_zone: Option<DangerZone>,
    pub manual_override: bool,
    pub is_recording: bool,
    pub has_started: bool,
}

/// Monitor state entity.
///
/// State machine:
///   IDLE -> ARMED (zone entry)
///   ARMED -> RECORDING (begin_session)
///   RECORDING -> IDLE (zone exit, trigger fired, session failed)
///   RECORDING | ARMED -> SUPPRESSED (stop_manually)
///   SUPPRESSED -> IDLE (reading outside every zone)
///   any but RECORDING -> RECORDING (start_manually)
///
/// Every session gets a new id; updates carrying a stale id are ignored so a
/// loop still winding down cannot clobber its successor.
#[derive(Debug, Default)]
pub struct MonitorState {
    phase: MonitorPhase,
    current_zone: Option<DangerZone>,
    manual_override: bool,
    is_recording: bool,
    has_started: bool,
    session: u64,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    pub fn current_zone(&self) -> Option<&DangerZone> {
        self.current_zone.as_ref()
    }

    pub fn manual_override(&self) -> bool {
        self.manual_override
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            phase: self.phase,
            current_zone: self.current_zone.clone(),
            manual_override: self.manual_override,
            is_recording: self.is_recording,
            has_started: self.has_started,
        }
    }

    /// Record the zone matched for a new reading and classify the change.
    pub fn observe_zone(&mut self, zone: Option<&DangerZone>) -> ZoneTransition {
        let previous_id = self.current_zone.as_ref().map(|z| z.id);

        let transition = match zone {
            Some(new) if previous_id != Some(new.id) && !self.manual_override => {
                ZoneTransition::Entered(new.clone())
            }
            None if !self.manual_override => match self.current_zone.take() {
                Some(previous) => ZoneTransition::Exited(previous),
                None => ZoneTransition::Unchanged,
            },
            None => {
                self.manual_override = false;
                if self.phase == MonitorPhase::ManualOverrideSuppressed {
                    self.phase = MonitorPhase::Idle;
                }
                ZoneTransition::OverrideCleared
            }
            Some(_) => ZoneTransition::Unchanged,
        };

        self.current_zone = zone.cloned();

        match transition {
            ZoneTransition::Entered(_) if self.phase == MonitorPhase::Idle => {
                self.phase = MonitorPhase::ArmedInZone;
            }
            ZoneTransition::Exited(_) => {
                self.phase = MonitorPhase::Idle;
                self.has_started = false;
                self.is_recording = false;
            }
            _ => {}
        }

        transition
    }

    /// Transition from ARMED to RECORDING. Returns the new session id.
    pub fn begin_session(&mut self) -> Result<u64, InvalidStateTransition> {
        if self.phase != MonitorPhase::ArmedInZone {
            return Err(self.invalid("begin recording"));
        }
        Ok(self.open_session())
    }

    /// Start recording regardless of zone, lifting any manual override
    pub fn start_manually(&mut self) -> Result<u64, InvalidStateTransition> {
        if self.phase == MonitorPhase::RecordingCycle {
            return Err(self.invalid("start recording"));
        }
        self.manual_override = false;
        Ok(self.open_session())
    }

    /// User stop: halt recording and suppress automatic re-arming
    pub fn stop_manually(&mut self) -> Result<(), InvalidStateTransition> {
        match self.phase {
            MonitorPhase::RecordingCycle | MonitorPhase::ArmedInZone => {
                self.phase = MonitorPhase::ManualOverrideSuppressed;
                self.manual_override = true;
                self.has_started = false;
                self.is_recording = false;
                Ok(())
            }
            _ => Err(self.invalid("stop recording")),
        }
    }

    /// Whether `session` is the live session
    pub fn is_active(&self, session: u64) -> bool {
        self.has_started && self.session == session
    }

    /// Mark capture start/stop for a session. Ignored for stale sessions.
    pub fn set_capturing(&mut self, session: u64, capturing: bool) -> bool {
        if !self.is_active(session) {
            return false;
        }
        self.is_recording = capturing;
        true
    }

    /// End a session (trigger fired, failure, or stop observed by the loop).
    /// Ignored for stale sessions.
    pub fn finish_session(&mut self, session: u64) {
        if !self.is_active(session) {
            return;
        }
        self.has_started = false;
        self.is_recording = false;
        if self.phase == MonitorPhase::RecordingCycle {
            self.phase = MonitorPhase::Idle;
        }
    }

    /// Drop any running session, keeping the last known zone
    pub fn shutdown(&mut self) {
        self.has_started = false;
        self.is_recording = false;
        if self.phase == MonitorPhase::RecordingCycle {
            self.phase = MonitorPhase::Idle;
        }
    }

    fn open_session(&mut self) -> u64 {
        self.session += 1;
        self.phase = MonitorPhase::RecordingCycle;
        self.has_started = true;
        self.is_recording = false;
        self.session
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_phase: self.phase,
            action: action.to_string(),
        }
    }
}
