//! Shared runner plumbing: exit codes, configuration and adapter wiring

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::geo::{DangerZone, Position};
use crate::domain::recording::Duration;
use crate::domain::trigger::TriggerWord;
use crate::infrastructure::{
    DeepgramTranscriber, FileKeyValueStore, HttpSmsRelay, RetryingSmsRelay, XdgConfigStore,
};

use super::args::{AlertArgs, MonitorArgs};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable holding the transcription API key
pub const ENV_API_KEY: &str = "SAFEGUARD_API_KEY";

/// Environment variable holding the SMS relay endpoint
pub const ENV_SMS_RELAY_URL: &str = "SAFEGUARD_SMS_RELAY_URL";

/// Resolved settings for `monitor`
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub api_key: Option<String>,
    pub transcription_url: String,
    pub request_timeout: Duration,
    pub sms_relay_url: Option<String>,
    pub sms_retries: u32,
    pub clip_duration: Duration,
    pub clip_path: PathBuf,
    pub notify: bool,
    pub fallback: Position,
    pub zones: Vec<DangerZone>,
    /// `None` when no feed was given; "-" reads stdin
    pub positions: Option<PathBuf>,
    /// Overrides the saved safety word
    pub trigger_word: Option<TriggerWord>,
}

impl MonitorOptions {
    pub fn from_config(config: &AppConfig, args: &MonitorArgs) -> Self {
        Self {
            api_key: config.api_key().map(str::to_string),
            transcription_url: config.transcription_url_or_default().to_string(),
            request_timeout: config.request_timeout_or_default(),
            sms_relay_url: config.sms_relay_url().map(str::to_string),
            sms_retries: config.sms_retries_or_default(),
            clip_duration: config.clip_duration_or_default(),
            clip_path: config.clip_path_or_default(),
            notify: config.notify_or_default(),
            fallback: config.fallback_location_or_default().to_position(),
            zones: config.zones_or_default(),
            positions: args.positions.clone(),
            trigger_word: args
                .trigger_word
                .as_ref()
                .map(TriggerWord::new)
                .filter(|word| !word.is_empty()),
        }
    }

    pub fn transcriber(&self) -> DeepgramTranscriber {
        DeepgramTranscriber::with_url(
            self.api_key.clone().unwrap_or_default(),
            self.transcription_url.clone(),
            self.request_timeout,
        )
    }

    pub fn relay(&self) -> RetryingSmsRelay<HttpSmsRelay> {
        build_relay(self.sms_relay_url.clone(), self.request_timeout, self.sms_retries)
    }
}

/// Resolved settings for `alert`
#[derive(Debug, Clone)]
pub struct AlertOptions {
    pub sms_relay_url: Option<String>,
    pub request_timeout: Duration,
    pub sms_retries: u32,
    pub notify: bool,
    pub position: Position,
    pub trigger_word: Option<TriggerWord>,
    pub dry_run: bool,
}

impl AlertOptions {
    /// `position` comes from `--at` when given, else the fallback location
    pub fn from_config(config: &AppConfig, args: &AlertArgs, position: Option<Position>) -> Self {
        Self {
            sms_relay_url: config.sms_relay_url().map(str::to_string),
            request_timeout: config.request_timeout_or_default(),
            sms_retries: config.sms_retries_or_default(),
            notify: config.notify_or_default(),
            position: position
                .unwrap_or_else(|| config.fallback_location_or_default().to_position()),
            trigger_word: args
                .trigger_word
                .as_ref()
                .map(TriggerWord::new)
                .filter(|word| !word.is_empty()),
            dry_run: args.dry_run,
        }
    }

    pub fn relay(&self) -> RetryingSmsRelay<HttpSmsRelay> {
        build_relay(self.sms_relay_url.clone(), self.request_timeout, self.sms_retries)
    }
}

fn build_relay(url: Option<String>, timeout: Duration, retries: u32) -> RetryingSmsRelay<HttpSmsRelay> {
    RetryingSmsRelay::new(HttpSmsRelay::new(url, timeout), retries)
}

/// Store for contacts and the safety word
pub fn preference_store() -> FileKeyValueStore {
    FileKeyValueStore::new()
}

/// Overrides read from the environment
pub fn env_config() -> AppConfig {
    AppConfig {
        api_key: env::var(ENV_API_KEY).ok().filter(|s| !s.trim().is_empty()),
        sms_relay_url: env::var(ENV_SMS_RELAY_URL)
            .ok()
            .filter(|s| !s.trim().is_empty()),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::Transcriber;

    #[test]
    fn monitor_options_from_defaults() {
        let options = MonitorOptions::from_config(&AppConfig::defaults(), &MonitorArgs::default());
        assert!(options.api_key.is_none());
        assert_eq!(options.clip_duration.as_millis(), 5000);
        assert_eq!(options.request_timeout.as_millis(), 10_000);
        assert_eq!(options.zones.len(), 6);
        assert!(options.notify);
        assert!(options.trigger_word.is_none());
        assert!(!options.transcriber().is_configured());
    }

    #[test]
    fn blank_trigger_override_is_ignored() {
        let args = MonitorArgs {
            trigger_word: Some("   ".to_string()),
            ..Default::default()
        };
        let options = MonitorOptions::from_config(&AppConfig::defaults(), &args);
        assert!(options.trigger_word.is_none());
    }

    #[test]
    fn alert_position_prefers_explicit_location() {
        let explicit = Position::new(1.0, 2.0);
        let options =
            AlertOptions::from_config(&AppConfig::defaults(), &AlertArgs::default(), Some(explicit));
        assert_eq!(options.position.coordinates(), (1.0, 2.0));

        let fallback = AlertOptions::from_config(&AppConfig::defaults(), &AlertArgs::default(), None);
        assert_eq!(fallback.position.coordinates(), (37.7749, -122.4194));
    }
}
