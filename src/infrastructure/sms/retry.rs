//! Bounded retry around an SMS relay

use async_trait::async_trait;
use tracing::warn;

use crate::application::ports::{SmsError, SmsRelay};

/// Retries transport failures a fixed number of times.
///
/// Rejections and configuration errors are returned at once.
pub struct RetryingSmsRelay<S: SmsRelay> {
    inner: S,
    retries: u32,
}

impl<S: SmsRelay> RetryingSmsRelay<S> {
    pub fn new(inner: S, retries: u32) -> Self {
        Self { inner, retries }
    }
}

#[async_trait]
impl<S: SmsRelay> SmsRelay for RetryingSmsRelay<S> {
    async fn send(&self, recipients: &[String], message: &str) -> Result<(), SmsError> {
        let mut attempt = 0;
        loop {
            match self.inner.send(recipients, message).await {
                Err(SmsError::RequestFailed(reason)) if attempt < self.retries => {
                    attempt += 1;
                    warn!(attempt, retries = self.retries, %reason, "SMS relay failed, retrying");
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        reject: bool,
    }

    #[async_trait]
    impl SmsRelay for Flaky {
        async fn send(&self, _recipients: &[String], _message: &str) -> Result<(), SmsError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(SmsError::Rejected("no".to_string()));
            }
            if call < self.failures {
                Err(SmsError::RequestFailed("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn flaky(failures: u32, reject: bool) -> Flaky {
        Flaky {
            failures,
            calls: AtomicU32::new(0),
            reject,
        }
    }

    #[tokio::test]
    async fn zero_retries_is_single_attempt() {
        let relay = RetryingSmsRelay::new(flaky(1, false), 0);
        assert!(relay.send(&[], "m").await.is_err());
        assert_eq!(relay.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_within_budget() {
        let relay = RetryingSmsRelay::new(flaky(2, false), 2);
        assert!(relay.send(&[], "m").await.is_ok());
        assert_eq!(relay.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rejection_is_not_retried() {
        let relay = RetryingSmsRelay::new(flaky(0, true), 3);
        assert!(matches!(relay.send(&[], "m").await, Err(SmsError::Rejected(_))));
        assert_eq!(relay.inner.calls.load(Ordering::SeqCst), 1);
    }
}
