//! Process signal handling for the monitor

use colored::Colorize;
use tokio::sync::mpsc;

/// Commands delivered to the monitor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorSignal {
    /// Manual stop (SIGUSR1)
    StopRecording,
    /// Manual start (SIGUSR2)
    StartRecording,
    /// Shutdown (SIGINT/SIGTERM)
    Shutdown,
}

/// Monitor signal handler
///
/// Translates OS signals into [`MonitorSignal`]s on a channel. The returned
/// sender lets other sources inject commands too.
pub struct MonitorSignalHandler {
    receiver: mpsc::Receiver<MonitorSignal>,
}

impl MonitorSignalHandler {
    #[cfg(unix)]
    pub async fn new() -> Result<(Self, mpsc::Sender<MonitorSignal>), std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        let (tx, rx) = mpsc::channel(10);

        let routes = [
            (SignalKind::interrupt(), "SIGINT", MonitorSignal::Shutdown),
            (SignalKind::terminate(), "SIGTERM", MonitorSignal::Shutdown),
            (SignalKind::user_defined1(), "SIGUSR1", MonitorSignal::StopRecording),
            (SignalKind::user_defined2(), "SIGUSR2", MonitorSignal::StartRecording),
        ];

        for (kind, name, command) in routes {
            let mut stream = signal(kind)?;
            let tx = tx.clone();
            tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    eprintln!("{} Received {}", "↓".cyan(), name);
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
            });
        }

        Ok((Self { receiver: rx }, tx))
    }

    #[cfg(not(unix))]
    pub async fn new() -> Result<(Self, mpsc::Sender<MonitorSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("{} Received Ctrl+C", "↓".cyan());
                let _ = tx_int.send(MonitorSignal::Shutdown).await;
            }
        });

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<MonitorSignal> {
        self.receiver.recv().await
    }
}
