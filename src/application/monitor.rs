//! Danger-zone monitor use case
//!
//! Couples position readings to the recording loop: entering a zone arms a
//! session, the session captures fixed-length clips back to back, uploads each
//! one for transcription and raises an alert when the trigger word is heard.

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::contacts::ContactList;
use crate::domain::geo::{default_zones, find_zone, DangerZone, Position};
use crate::domain::monitor::{
    InvalidStateTransition, MonitorPhase, MonitorSnapshot, MonitorState, StopToken, ZoneTransition,
};
use crate::domain::recording::Duration;
use crate::domain::transcription::Transcript;
use crate::domain::trigger::TriggerWord;

use super::alert::{AlertDispatcher, AlertError, AlertReceipt};
use super::ports::{
    ClipRecorder, LocationProvider, NotificationIcon, Notifier, RecordingError, SmsRelay,
    Transcriber, TranscriptionError,
};

/// Errors from the monitor use case
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Missing transcription API key. Set SAFEGUARD_API_KEY or configure via 'safeguard config set api_key <key>'")]
    MissingApiKey,

    #[error("Recording failed: {0}")]
    Recording(#[from] RecordingError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),
}

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Zone table, matched in order
    pub zones: Vec<DangerZone>,
    /// Length of each captured clip
    pub clip_duration: Duration,
    /// Reusable clip file
    pub clip_path: PathBuf,
    pub trigger_word: TriggerWord,
    pub contacts: ContactList,
    /// Whether to show notifications
    pub enable_notify: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            zones: default_zones(),
            clip_duration: Duration::default_clip(),
            clip_path: std::env::temp_dir().join("safeguard-clip.ogg"),
            trigger_word: TriggerWord::default(),
            contacts: ContactList::defaults(),
            enable_notify: false,
        }
    }
}

/// Result of feeding one position reading
#[derive(Debug, Clone)]
pub struct Observation {
    /// Zone containing the reading, if any
    pub zone: Option<DangerZone>,
    pub transition: ZoneTransition,
    /// The caller should begin a recording session
    pub should_arm: bool,
}

/// How a recording session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// Trigger word heard; the alert result is attached
    Triggered {
        transcript: Transcript,
        alert: Result<AlertReceipt, AlertError>,
    },
    /// Stop requested (zone exit, manual stop, shutdown)
    Stopped,
    /// Capture or upload failed; the session is over
    Failed(MonitorError),
}

struct Inner {
    state: MonitorState,
    active: Option<StopToken>,
}

/// Zone monitor use case
pub struct ZoneMonitor<R, T, N, S, L>
where
    R: ClipRecorder,
    T: Transcriber,
    N: Notifier,
    S: SmsRelay,
    L: LocationProvider,
{
    recorder: R,
    transcriber: T,
    notifier: N,
    dispatcher: AlertDispatcher<S, L, N>,
    inner: Mutex<Inner>,
    cycle_lock: Mutex<()>,
    config: MonitorConfig,
}

impl<R, T, N, S, L> ZoneMonitor<R, T, N, S, L>
where
    R: ClipRecorder,
    T: Transcriber,
    N: Notifier,
    S: SmsRelay,
    L: LocationProvider,
{
    pub fn new(
        recorder: R,
        transcriber: T,
        notifier: N,
        dispatcher: AlertDispatcher<S, L, N>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            notifier,
            dispatcher,
            inner: Mutex::new(Inner {
                state: MonitorState::new(),
                active: None,
            }),
            cycle_lock: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> MonitorSnapshot {
        self.inner.lock().await.state.snapshot()
    }

    /// Match a reading against the zone table and apply entry/exit rules.
    ///
    /// Leaving a zone stops the running session, if any.
    pub async fn observe(&self, position: &Position) -> Observation {
        let zone = find_zone(position, &self.config.zones).cloned();

        let (transition, should_arm) = {
            let mut inner = self.inner.lock().await;
            let transition = inner.state.observe_zone(zone.as_ref());
            if matches!(transition, ZoneTransition::Exited(_)) {
                if let Some(token) = inner.active.take() {
                    token.stop();
                }
            }
            let should_arm = matches!(transition, ZoneTransition::Entered(_))
                && inner.state.phase() == MonitorPhase::ArmedInZone;
            (transition, should_arm)
        };

        match &transition {
            ZoneTransition::Entered(zone) => {
                info!(zone = %zone.name, id = zone.id, severity = %zone.severity, "Entered danger zone");
                self.notify(
                    "Danger zone entered",
                    &format!("You entered {}. Listening for your safety word.", zone),
                    NotificationIcon::Warning,
                )
                .await;
            }
            ZoneTransition::Exited(zone) => {
                info!(zone = %zone.name, id = zone.id, "Left danger zone");
                self.notify(
                    "Left danger zone",
                    &format!("You left {}. Audio monitoring stopped.", zone.name),
                    NotificationIcon::Info,
                )
                .await;
            }
            ZoneTransition::OverrideCleared => debug!("Manual override cleared"),
            ZoneTransition::Unchanged => {}
        }

        Observation {
            zone,
            transition,
            should_arm,
        }
    }

    /// Open a session after an arming entry. Pass the token to `run_session`.
    pub async fn begin_session(&self) -> Result<StopToken, MonitorError> {
        if !self.transcriber.is_configured() {
            return Err(MonitorError::MissingApiKey);
        }
        let mut inner = self.inner.lock().await;
        let session = inner.state.begin_session()?;
        Ok(Self::install_token(&mut inner, session))
    }

    /// Open a session regardless of zone. Lifts a manual override.
    pub async fn start_manually(&self) -> Result<StopToken, MonitorError> {
        if !self.transcriber.is_configured() {
            return Err(MonitorError::MissingApiKey);
        }
        let token = {
            let mut inner = self.inner.lock().await;
            let session = inner.state.start_manually()?;
            Self::install_token(&mut inner, session)
        };
        info!(session = token.session(), "Monitoring started manually");
        self.notify(
            "Monitoring started",
            "Listening for your safety word.",
            NotificationIcon::Recording,
        )
        .await;
        Ok(token)
    }

    /// Stop the running session and suppress re-arming until a reading
    /// outside every zone arrives.
    pub async fn stop_manually(&self) -> Result<(), MonitorError> {
        {
            let mut inner = self.inner.lock().await;
            inner.state.stop_manually()?;
            if let Some(token) = inner.active.take() {
                token.stop();
            }
        }
        info!("Monitoring stopped manually");
        self.notify(
            "Monitoring paused",
            "Audio monitoring is off until you leave the zone.",
            NotificationIcon::Info,
        )
        .await;
        Ok(())
    }

    /// Stop everything. Used on process shutdown.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.active.take() {
            token.stop();
        }
        inner.state.shutdown();
    }

    /// Run the capture/upload/evaluate loop until the token is stopped, the
    /// trigger fires, or a step fails. Only one loop runs at a time.
    pub async fn run_session(&self, token: StopToken) -> SessionOutcome {
        let _cycle = self.cycle_lock.lock().await;
        debug!(session = token.session(), "Recording session started");

        let outcome = self.cycle_loop(&token).await;

        {
            let mut inner = self.inner.lock().await;
            inner.state.finish_session(token.session());
            if inner.active.as_ref().map(StopToken::session) == Some(token.session()) {
                inner.active = None;
            }
        }

        match &outcome {
            SessionOutcome::Triggered { alert: Ok(receipt), .. } => {
                warn!(recipients = receipt.recipients.len(), "Trigger word detected, alert sent");
            }
            SessionOutcome::Triggered { alert: Err(e), .. } => {
                error!(error = %e, "Trigger word detected but alert failed");
                self.notify("Alert failed", &e.to_string(), NotificationIcon::Error)
                    .await;
            }
            SessionOutcome::Stopped => debug!(session = token.session(), "Recording session stopped"),
            SessionOutcome::Failed(e) => {
                error!(error = %e, "Recording session failed");
                self.notify("Monitoring stopped", &e.to_string(), NotificationIcon::Error)
                    .await;
            }
        }

        outcome
    }

    async fn cycle_loop(&self, token: &StopToken) -> SessionOutcome {
        let mut cycle: u64 = 0;

        loop {
            if token.is_stopped() {
                return SessionOutcome::Stopped;
            }
            cycle += 1;

            if let Err(e) = self.recorder.start(&self.config.clip_path).await {
                return SessionOutcome::Failed(e.into());
            }
            self.set_capturing(token, true).await;

            tokio::time::sleep(self.config.clip_duration.as_std()).await;

            if token.is_stopped() {
                if let Err(e) = self.recorder.cancel().await {
                    warn!(error = %e, "Failed to discard clip");
                }
                return SessionOutcome::Stopped;
            }

            let audio = match self.recorder.stop().await {
                Ok(audio) => audio,
                Err(e) => {
                    if let Err(cancel_err) = self.recorder.cancel().await {
                        warn!(error = %cancel_err, "Failed to discard clip");
                    }
                    return SessionOutcome::Failed(e.into());
                }
            };
            self.set_capturing(token, false).await;
            debug!(cycle, size = %audio.human_readable_size(), "Clip captured");

            // Uploads are never interrupted; a stop that lands here is seen
            // at the top of the next cycle.
            let transcript = match self.transcriber.transcribe(&audio).await {
                Ok(transcript) => transcript,
                Err(e) => return SessionOutcome::Failed(e.into()),
            };
            debug!(cycle, transcript = %transcript, "Clip transcribed");

            if self.config.trigger_word.matches(transcript.text()) {
                token.stop();
                let alert = self
                    .dispatcher
                    .dispatch(&self.config.contacts, &self.config.trigger_word)
                    .await;
                return SessionOutcome::Triggered { transcript, alert };
            }
        }
    }

    async fn set_capturing(&self, token: &StopToken, capturing: bool) {
        let mut inner = self.inner.lock().await;
        inner.state.set_capturing(token.session(), capturing);
    }

    fn install_token(inner: &mut Inner, session: u64) -> StopToken {
        let token = StopToken::new(session);
        if let Some(previous) = inner.active.replace(token.clone()) {
            previous.stop();
        }
        token
    }

    async fn notify(&self, title: &str, message: &str, icon: NotificationIcon) {
        if !self.config.enable_notify {
            return;
        }
        if let Err(e) = self.notifier.notify(title, message, icon).await {
            warn!(error = %e, "Notification failed");
        }
    }
}
