//! Location providers

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{LocationError, LocationProvider};
use crate::domain::geo::Position;

/// Latest reading seen on the position feed.
///
/// Clones share the same fix. Falls back to a fixed coordinate, if one is
/// set, until the first reading arrives.
#[derive(Debug, Clone, Default)]
pub struct LatestFix {
    fix: Arc<RwLock<Option<Position>>>,
    fallback: Option<Position>,
}

impl LatestFix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: Position) -> Self {
        Self {
            fix: Arc::default(),
            fallback: Some(fallback),
        }
    }

    pub async fn record(&self, position: Position) {
        *self.fix.write().await = Some(position);
    }
}

#[async_trait]
impl LocationProvider for LatestFix {
    async fn current_position(&self) -> Result<Position, LocationError> {
        self.fix
            .read()
            .await
            .or(self.fallback)
            .ok_or(LocationError::NoFix)
    }
}

/// Always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Position);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_fix_without_fallback() {
        let fix = LatestFix::new();
        assert!(matches!(fix.current_position().await, Err(LocationError::NoFix)));
    }

    #[tokio::test]
    async fn reading_replaces_fallback() {
        let fix = LatestFix::with_fallback(Position::new(1.0, 1.0));
        assert_eq!(fix.current_position().await.unwrap().coordinates(), (1.0, 1.0));

        let shared = fix.clone();
        shared.record(Position::new(2.0, 3.0)).await;
        assert_eq!(fix.current_position().await.unwrap().coordinates(), (2.0, 3.0));
    }

    #[tokio::test]
    async fn fixed_location() {
        let here = FixedLocation(Position::new(4.0, 5.0));
        assert_eq!(here.current_position().await.unwrap().coordinates(), (4.0, 5.0));
    }
}
