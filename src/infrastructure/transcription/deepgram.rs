//! Deepgram transcriber adapter

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::config::DEFAULT_TRANSCRIPTION_URL;
use crate::domain::recording::Duration;
use crate::domain::transcription::{AudioData, Transcript};

// Response types for the listen endpoint

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    err_msg: Option<String>,
    message: Option<String>,
}

/// Speech-to-text over the Deepgram prerecorded API
pub struct DeepgramTranscriber {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl DeepgramTranscriber {
    /// Create a transcriber against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(api_key, DEFAULT_TRANSCRIPTION_URL, Duration::default_request_timeout())
    }

    /// Create a transcriber against a custom endpoint with a request timeout
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_millis(timeout.as_millis()))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.into(),
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// First alternative of the first channel
    fn extract_transcript(response: &ListenResponse) -> Option<String> {
        let alternative = response
            .results
            .as_ref()?
            .channels
            .first()?
            .alternatives
            .first()?;
        Some(alternative.transcript.clone())
    }

    fn error_detail(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.err_msg.or(e.message))
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for DeepgramTranscriber {
    async fn transcribe(&self, audio: &AudioData) -> Result<Transcript, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyResponse);
        }

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, audio.mime_type().as_str())
            .body(audio.data().to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else {
                    TranscriptionError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status,
                Self::error_detail(&error_text)
            )));
        }

        let response: ListenResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TranscriptionError::Timeout
            } else {
                TranscriptionError::ParseError(e.to_string())
            }
        })?;

        // An empty string is silence, not an error
        let text = Self::extract_transcript(&response).ok_or(TranscriptionError::EmptyResponse)?;
        Ok(Transcript::new(text))
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_first_alternative() {
        let response: ListenResponse = serde_json::from_str(
            r#"{"results":{"channels":[{"alternatives":[{"transcript":"hello there"},{"transcript":"hollow there"}]}]}}"#,
        )
        .unwrap();

        assert_eq!(
            DeepgramTranscriber::extract_transcript(&response).as_deref(),
            Some("hello there")
        );
    }

    #[test]
    fn empty_transcript_is_kept() {
        let response: ListenResponse = serde_json::from_str(
            r#"{"results":{"channels":[{"alternatives":[{"transcript":""}]}]}}"#,
        )
        .unwrap();
        assert_eq!(DeepgramTranscriber::extract_transcript(&response).as_deref(), Some(""));
    }

    #[test]
    fn missing_path_is_none() {
        let response: ListenResponse = serde_json::from_str(r#"{"metadata":{}}"#).unwrap();
        assert!(DeepgramTranscriber::extract_transcript(&response).is_none());

        let response: ListenResponse =
            serde_json::from_str(r#"{"results":{"channels":[]}}"#).unwrap();
        assert!(DeepgramTranscriber::extract_transcript(&response).is_none());
    }

    #[test]
    fn error_detail_prefers_err_msg() {
        assert_eq!(
            DeepgramTranscriber::error_detail(r#"{"err_code":"BAD","err_msg":"bad audio"}"#),
            "bad audio"
        );
        assert_eq!(DeepgramTranscriber::error_detail("plain text "), "plain text");
    }

    #[test]
    fn blank_key_is_not_configured() {
        assert!(!DeepgramTranscriber::new("  ").is_configured());
        assert!(DeepgramTranscriber::new("dg-key").is_configured());
    }

    #[test]
    fn default_url() {
        assert_eq!(
            DeepgramTranscriber::new("k").url(),
            "https://api.deepgram.com/v1/listen"
        );
    }
}
