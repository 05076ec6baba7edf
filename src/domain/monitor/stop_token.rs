//! Cooperative stop token for a recording session

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag for one recording session.
///
/// Checked by the loop between suspension points; setting it never interrupts
/// an in-flight upload.
#[derive(Debug, Clone)]
pub struct StopToken {
    session: u64,
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new(session: u64) -> Self {
        Self {
            session,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Session id this token belongs to
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Request the loop to stop at its next check
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
