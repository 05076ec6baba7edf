//! HTTP SMS relay adapter

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{SmsError, SmsRelay};
use crate::domain::recording::Duration;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: &'a [String],
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    success: bool,
    error: Option<String>,
}

/// Posts `{to, message}` to a relay server that fans out the texts
pub struct HttpSmsRelay {
    url: Option<String>,
    client: reqwest::Client,
}

impl HttpSmsRelay {
    /// `None` builds a relay that always reports `NotConfigured`
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_millis(timeout.as_millis()))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { url, client }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl SmsRelay for HttpSmsRelay {
    async fn send(&self, recipients: &[String], message: &str) -> Result<(), SmsError> {
        let url = self.url.as_deref().ok_or(SmsError::NotConfigured)?;

        let response = self
            .client
            .post(url)
            .json(&SendRequest {
                to: recipients,
                message,
            })
            .send()
            .await
            .map_err(|e| SmsError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SmsError::RequestFailed(e.to_string()))?;

        let parsed = serde_json::from_str::<SendResponse>(&body);
        match parsed {
            Ok(SendResponse { success: true, .. }) if status.is_success() => {
                debug!(recipients = recipients.len(), "Relay accepted message");
                Ok(())
            }
            Ok(SendResponse { error, .. }) => Err(SmsError::Rejected(
                error.unwrap_or_else(|| format!("HTTP {}", status)),
            )),
            Err(_) if !status.is_success() => Err(SmsError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                body.trim()
            ))),
            Err(e) => Err(SmsError::ParseError(e.to_string())),
        }
    }
}
