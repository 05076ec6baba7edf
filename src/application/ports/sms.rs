//! SMS relay port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// SMS relay errors
#[derive(Debug, Clone, Error)]
pub enum SmsError {
    #[error("SMS relay URL is not configured. Run 'safeguard config set sms_relay_url <url>'")]
    NotConfigured,

    #[error("SMS relay request failed: {0}")]
    RequestFailed(String),

    #[error("SMS relay rejected the message: {0}")]
    Rejected(String),

    #[error("Failed to parse SMS relay response: {0}")]
    ParseError(String),
}

/// Port for sending one text message to many recipients.
///
/// A call is a single attempt with no delivery tracking.
#[async_trait]
pub trait SmsRelay: Send + Sync {
    async fn send(&self, recipients: &[String], message: &str) -> Result<(), SmsError>;
}

#[async_trait]
impl<S: SmsRelay + ?Sized> SmsRelay for Arc<S> {
    async fn send(&self, recipients: &[String], message: &str) -> Result<(), SmsError> {
        self.as_ref().send(recipients, message).await
    }
}
