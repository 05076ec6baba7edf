//! Location port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::geo::Position;

/// Location errors
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    #[error("Location unavailable: no fix received yet")]
    NoFix,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location source failed: {0}")]
    SourceFailed(String),
}

/// Stream of position readings (the geolocation watcher)
#[async_trait]
pub trait PositionSource: Send {
    /// Wait for the next reading. `None` once the source is exhausted.
    async fn next_position(&mut self) -> Option<Position>;
}

/// One-shot access to the latest location fix
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

#[async_trait]
impl<L: LocationProvider + ?Sized> LocationProvider for Arc<L> {
    async fn current_position(&self) -> Result<Position, LocationError> {
        self.as_ref().current_position().await
    }
}
