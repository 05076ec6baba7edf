//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::geo::{default_zones, DangerZone, Position};
use crate::domain::recording::Duration;

/// Default speech-to-text endpoint
pub const DEFAULT_TRANSCRIPTION_URL: &str = "https://api.deepgram.com/v1/listen";

/// Coordinate used for alerts when no location fix is available
pub const DEFAULT_FALLBACK_LOCATION: (f64, f64) = (37.7749, -122.4194);

/// Clip file name inside the temp directory
const DEFAULT_CLIP_FILE: &str = "safeguard-clip.ogg";

/// Fixed coordinate used when location is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl FallbackLocation {
    pub fn to_position(self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

impl Default for FallbackLocation {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_FALLBACK_LOCATION.0,
            longitude: DEFAULT_FALLBACK_LOCATION.1,
        }
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
/// Tables stay last so the TOML serializer can emit them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub transcription_url: Option<String>,
    pub sms_relay_url: Option<String>,
    pub clip_duration: Option<String>,
    pub request_timeout: Option<String>,
    pub sms_retries: Option<u32>,
    pub notify: Option<bool>,
    pub clip_path: Option<String>,
    pub fallback_location: Option<FallbackLocation>,
    pub zones: Option<Vec<DangerZone>>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            transcription_url: Some(DEFAULT_TRANSCRIPTION_URL.to_string()),
            sms_relay_url: None,
            clip_duration: Some("5s".to_string()),
            request_timeout: Some("10s".to_string()),
            sms_retries: Some(0),
            notify: Some(true),
            clip_path: None,
            fallback_location: Some(FallbackLocation::default()),
            zones: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            transcription_url: other.transcription_url.or(self.transcription_url),
            sms_relay_url: other.sms_relay_url.or(self.sms_relay_url),
            clip_duration: other.clip_duration.or(self.clip_duration),
            request_timeout: other.request_timeout.or(self.request_timeout),
            sms_retries: other.sms_retries.or(self.sms_retries),
            notify: other.notify.or(self.notify),
            clip_path: other.clip_path.or(self.clip_path),
            fallback_location: other.fallback_location.or(self.fallback_location),
            zones: other.zones.or(self.zones),
        }
    }

    /// API key if set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn transcription_url_or_default(&self) -> &str {
        self.transcription_url
            .as_deref()
            .unwrap_or(DEFAULT_TRANSCRIPTION_URL)
    }

    /// SMS relay endpoint; there is no public default
    pub fn sms_relay_url(&self) -> Option<&str> {
        self.sms_relay_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Get clip_duration as parsed Duration, or default if not set/invalid
    pub fn clip_duration_or_default(&self) -> Duration {
        self.clip_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_clip)
    }

    /// Get request_timeout as parsed Duration, or default if not set/invalid
    pub fn request_timeout_or_default(&self) -> Duration {
        self.request_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_request_timeout)
    }

    pub fn sms_retries_or_default(&self) -> u32 {
        self.sms_retries.unwrap_or(0)
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(true)
    }

    /// Single clip file reused by every recording cycle
    pub fn clip_path_or_default(&self) -> PathBuf {
        self.clip_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CLIP_FILE))
    }

    pub fn fallback_location_or_default(&self) -> FallbackLocation {
        self.fallback_location.unwrap_or_default()
    }

    /// Configured zones, or the built-in table when none are configured
    pub fn zones_or_default(&self) -> Vec<DangerZone> {
        match &self.zones {
            Some(zones) if !zones.is_empty() => zones.clone(),
            _ => default_zones(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{Severity, ZoneKind};

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert!(config.sms_relay_url.is_none());
        assert_eq!(config.clip_duration, Some("5s".to_string()));
        assert_eq!(config.request_timeout, Some("10s".to_string()));
        assert_eq!(config.sms_retries, Some(0));
        assert_eq!(config.notify, Some(true));
        assert_eq!(config.transcription_url_or_default(), DEFAULT_TRANSCRIPTION_URL);
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.clip_duration.is_none());
        assert!(config.zones.is_none());
        assert!(config.fallback_location.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            clip_duration: Some("5s".to_string()),
            sms_relay_url: Some("https://relay.example/base".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            clip_duration: None,
            sms_relay_url: Some("https://relay.example/other".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.clip_duration, Some("5s".to_string()));
        assert_eq!(merged.sms_relay_url(), Some("https://relay.example/other"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = AppConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn durations_fall_back_on_invalid() {
        let config = AppConfig {
            clip_duration: Some("soon".to_string()),
            request_timeout: Some("30s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.clip_duration_or_default().as_millis(), 5000);
        assert_eq!(config.request_timeout_or_default().as_secs(), 30);
    }

    #[test]
    fn boolean_and_numeric_defaults() {
        let config = AppConfig::empty();
        assert!(config.notify_or_default());
        assert_eq!(config.sms_retries_or_default(), 0);
    }

    #[test]
    fn clip_path_defaults_to_temp_dir() {
        let config = AppConfig::empty();
        let path = config.clip_path_or_default();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.to_string_lossy().ends_with(".ogg"));
    }

    #[test]
    fn fallback_location_default_is_fixed() {
        let loc = AppConfig::empty().fallback_location_or_default();
        assert_eq!((loc.latitude, loc.longitude), DEFAULT_FALLBACK_LOCATION);
    }

    #[test]
    fn zones_fall_back_to_builtin_table() {
        assert_eq!(AppConfig::empty().zones_or_default().len(), 6);
        let empty_list = AppConfig {
            zones: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(empty_list.zones_or_default().len(), 6);
    }

    #[test]
    fn configured_zones_replace_builtin_table() {
        let config = AppConfig {
            zones: Some(vec![DangerZone::new(
                42,
                1.0,
                2.0,
                10.0,
                "Back lot",
                ZoneKind::Restricted,
                Severity::Low,
            )]),
            ..Default::default()
        };
        let zones = config.zones_or_default();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, 42);
    }
}
