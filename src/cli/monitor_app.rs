//! Monitor runner: position feed, signals and recording sessions

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::io::BufReader;
use tokio::task::{JoinError, JoinSet};
use tracing::{info, warn};

use crate::application::ports::{Notifier, PositionSource};
use crate::application::{
    AlertConfig, AlertDispatcher, MonitorConfig, MonitorError, Preferences, SessionOutcome,
    ZoneMonitor,
};
use crate::domain::geo::Position;
use crate::domain::monitor::ZoneTransition;
use crate::infrastructure::{create_notifier, FfmpegClipRecorder, LatestFix, LinePositionFeed};

use super::app::{preference_store, MonitorOptions, EXIT_ERROR, EXIT_SUCCESS};
use super::presenter::Presenter;
use super::signals::{MonitorSignal, MonitorSignalHandler};

/// Grace period for running sessions after shutdown
const SHUTDOWN_GRACE: StdDuration = StdDuration::from_secs(15);

type Feed = Box<dyn PositionSource>;

/// Run monitor mode
pub async fn run_monitor(options: MonitorOptions) -> ExitCode {
    let presenter = Presenter::new();

    if options.api_key.is_none() {
        presenter.error(&MonitorError::MissingApiKey.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    // Preferences are read once and cached for the whole run
    let preferences = Preferences::new(preference_store());
    let contacts = match preferences.load_contacts().await {
        Ok(contacts) => contacts,
        Err(e) => {
            presenter.error(&format!("Failed to load emergency contacts: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let trigger_word = match options.trigger_word.clone() {
        Some(word) => word,
        None => match preferences.load_trigger_word().await {
            Ok(word) => word,
            Err(e) => {
                presenter.error(&format!("Failed to load safety word: {}", e));
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    if contacts.is_empty() {
        presenter.warn("No emergency contacts saved. Alerts cannot be sent.");
    }
    if options.sms_relay_url.is_none() {
        presenter.warn("No SMS relay configured. Set SAFEGUARD_SMS_RELAY_URL or 'safeguard config set sms_relay_url <url>'.");
    }

    let mut feed = match open_feed(options.positions.as_deref()).await {
        Ok(feed) => feed,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if feed.is_none() {
        presenter.warn(&format!(
            "No position feed (--positions). Zone monitoring is disabled; alerts will report {}.",
            options.fallback
        ));
    }

    let location = LatestFix::with_fallback(options.fallback);
    let notifier: Arc<dyn Notifier> = Arc::from(create_notifier(options.notify));

    let dispatcher = AlertDispatcher::new(
        options.relay(),
        location.clone(),
        Arc::clone(&notifier),
        AlertConfig {
            enable_notify: options.notify,
        },
    );

    let config = MonitorConfig {
        zones: options.zones.clone(),
        clip_duration: options.clip_duration,
        clip_path: options.clip_path.clone(),
        trigger_word: trigger_word.clone(),
        contacts,
        enable_notify: options.notify,
    };

    let monitor = Arc::new(ZoneMonitor::new(
        FfmpegClipRecorder::new(),
        options.transcriber(),
        notifier,
        dispatcher,
        config,
    ));

    let (mut signals, _signal_tx) = match MonitorSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.monitor_status(&format!(
        "Started with {} zone(s), {} contact(s), safety word \"{}\"",
        monitor.config().zones.len(),
        monitor.config().contacts.len(),
        trigger_word
    ));
    presenter.info(&format!(
        "PID: {} | SIGUSR1: stop recording | SIGUSR2: start recording | SIGINT: exit",
        std::process::id()
    ));

    let mut sessions: JoinSet<SessionOutcome> = JoinSet::new();
    let mut feed_open = feed.is_some();

    loop {
        tokio::select! {
            reading = next_reading(&mut feed), if feed_open => match reading {
                Some(position) => {
                    location.record(position).await;
                    let observation = monitor.observe(&position).await;
                    report_transition(&presenter, &observation.transition);

                    if observation.should_arm {
                        match monitor.begin_session().await {
                            Ok(token) => {
                                presenter.monitor_status("Recording");
                                let m = Arc::clone(&monitor);
                                sessions.spawn(async move { m.run_session(token).await });
                            }
                            Err(e) => presenter.error(&e.to_string()),
                        }
                    }
                }
                None => {
                    feed_open = false;
                    presenter.info("Position feed ended; holding last known position");
                }
            },
            signal = signals.recv() => match signal {
                Some(MonitorSignal::StopRecording) => match monitor.stop_manually().await {
                    Ok(()) => presenter.monitor_status("Paused until you leave the zone"),
                    Err(e) => presenter.warn(&e.to_string()),
                },
                Some(MonitorSignal::StartRecording) => match monitor.start_manually().await {
                    Ok(token) => {
                        presenter.monitor_status("Recording (manual)");
                        let m = Arc::clone(&monitor);
                        sessions.spawn(async move { m.run_session(token).await });
                    }
                    Err(e) => presenter.warn(&e.to_string()),
                },
                Some(MonitorSignal::Shutdown) | None => break,
            },
            Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                report_outcome(&presenter, joined);
            }
        }
    }

    presenter.monitor_status("Shutting down...");
    monitor.shutdown().await;

    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while let Some(joined) = sessions.join_next().await {
            report_outcome(&presenter, joined);
        }
    })
    .await;
    if drained.is_err() {
        warn!("Sessions still running at exit, aborting");
        sessions.abort_all();
    }

    info!("Monitor stopped");
    ExitCode::from(EXIT_SUCCESS)
}

/// Open the position feed. `-` is stdin.
async fn open_feed(path: Option<&Path>) -> Result<Option<Feed>, String> {
    let Some(path) = path else {
        return Ok(None);
    };

    if path == Path::new("-") {
        let feed = LinePositionFeed::new(BufReader::new(tokio::io::stdin()));
        return Ok(Some(Box::new(feed)));
    }

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| format!("Cannot open position feed {}: {}", path.display(), e))?;
    Ok(Some(Box::new(LinePositionFeed::new(BufReader::new(file)))))
}

async fn next_reading(feed: &mut Option<Feed>) -> Option<Position> {
    match feed {
        Some(feed) => feed.next_position().await,
        None => std::future::pending().await,
    }
}

fn report_transition(presenter: &Presenter, transition: &ZoneTransition) {
    match transition {
        ZoneTransition::Entered(zone) => {
            presenter.warn(&format!("Entered danger zone: {}", zone));
        }
        ZoneTransition::Exited(zone) => {
            presenter.info(&format!("Left danger zone: {}", zone.name));
            presenter.monitor_status("Idle");
        }
        ZoneTransition::OverrideCleared => {
            presenter.monitor_status("Manual pause lifted");
        }
        ZoneTransition::Unchanged => {}
    }
}

fn report_outcome(presenter: &Presenter, joined: Result<SessionOutcome, JoinError>) {
    match joined {
        Ok(SessionOutcome::Triggered { alert: Ok(receipt), .. }) => {
            presenter.alert(&format!(
                "Safety word heard. Alert sent to {} contact(s).",
                receipt.recipients.len()
            ));
            presenter.output(receipt.message.body());
            presenter.monitor_status("Idle");
        }
        Ok(SessionOutcome::Triggered { alert: Err(e), .. }) => {
            presenter.alert("Safety word heard but the alert could not be sent.");
            presenter.error(&e.to_string());
            presenter.monitor_status("Idle");
        }
        Ok(SessionOutcome::Stopped) => {}
        Ok(SessionOutcome::Failed(e)) => {
            presenter.error(&format!("Monitoring stopped: {}", e));
            presenter.monitor_status("Idle (error)");
        }
        Err(e) if e.is_cancelled() => {}
        Err(e) => presenter.error(&format!("Recording session crashed: {}", e)),
    }
}
