//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, FallbackLocation};
use crate::domain::error::ConfigError;
use crate::domain::geo::Position;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Upper bound for `sms_retries`
const MAX_SMS_RETRIES: u32 = 10;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, display_value(&config, key).unwrap_or_default()));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            &display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()),
        );
    }
    let zones = config
        .zones
        .as_ref()
        .map(|z| format!("{} custom", z.len()))
        .unwrap_or_else(|| "built-in".to_string());
    presenter.key_value("zones", &zones);

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` and store it under `key`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    match key {
        "api_key" => {
            if value.is_empty() {
                return Err(invalid(key, "Value cannot be empty"));
            }
            config.api_key = Some(value.to_string());
        }
        "transcription_url" => config.transcription_url = Some(parse_url(key, value)?),
        "sms_relay_url" => config.sms_relay_url = Some(parse_url(key, value)?),
        "clip_duration" | "request_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            if key == "clip_duration" {
                config.clip_duration = Some(value.to_string());
            } else {
                config.request_timeout = Some(value.to_string());
            }
        }
        "sms_retries" => {
            let retries = value
                .parse::<u32>()
                .ok()
                .filter(|r| *r <= MAX_SMS_RETRIES)
                .ok_or_else(|| {
                    invalid(key, format!("Value must be a number from 0 to {}", MAX_SMS_RETRIES))
                })?;
            config.sms_retries = Some(retries);
        }
        "notify" => {
            config.notify = Some(
                parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?,
            );
        }
        "clip_path" => {
            if value.is_empty() {
                return Err(invalid(key, "Value cannot be empty"));
            }
            config.clip_path = Some(value.to_string());
        }
        "fallback_location" => {
            let position = value
                .parse::<Position>()
                .map_err(|e| invalid(key, e.to_string()))?;
            if !position.is_valid() {
                return Err(invalid(key, "Coordinates out of range"));
            }
            config.fallback_location = Some(FallbackLocation {
                latitude: position.latitude,
                longitude: position.longitude,
            });
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

/// Current value of `key` as shown to the user; secrets are masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "transcription_url" => config.transcription_url.clone(),
        "sms_relay_url" => config.sms_relay_url.clone(),
        "clip_duration" => config.clip_duration.clone(),
        "request_timeout" => config.request_timeout.clone(),
        "sms_retries" => config.sms_retries.map(|r| r.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "clip_path" => config.clip_path.clone(),
        "fallback_location" => config
            .fallback_location
            .map(|f| format!("{},{}", f.latitude, f.longitude)),
        _ => None,
    }
}

fn parse_url(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.to_string())
    } else {
        Err(invalid(key, "Value must be an http:// or https:// URL"))
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn mask_api_key_long_and_short() {
        assert_eq!(mask_api_key("abcdefghijklmnop"), "abcd...mnop");
        assert_eq!(mask_api_key("short"), "*****");
    }

    #[test]
    fn durations_are_validated() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "clip_duration", "1500ms").is_ok());
        assert_eq!(config.clip_duration.as_deref(), Some("1500ms"));
        assert!(apply_value(&mut config, "request_timeout", "soon").is_err());
        assert!(apply_value(&mut config, "clip_duration", "0s").is_err());
    }

    #[test]
    fn urls_need_a_scheme() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "sms_relay_url", "localhost:3000").is_err());
        assert!(apply_value(&mut config, "sms_relay_url", "http://localhost:3000/send-sms").is_ok());
        assert_eq!(config.sms_relay_url(), Some("http://localhost:3000/send-sms"));
    }

    #[test]
    fn retries_are_bounded() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "sms_retries", "3").is_ok());
        assert_eq!(config.sms_retries, Some(3));
        assert!(apply_value(&mut config, "sms_retries", "11").is_err());
        assert!(apply_value(&mut config, "sms_retries", "-1").is_err());
    }

    #[test]
    fn fallback_location_round_trip() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "fallback_location", "40.7128,-74.006").unwrap();
        assert_eq!(
            display_value(&config, "fallback_location").as_deref(),
            Some("40.7128,-74.006")
        );
        assert!(apply_value(&mut config, "fallback_location", "100,0").is_err());
    }

    #[test]
    fn api_key_is_masked_on_display() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "api_key", "dg_0123456789abcdef").unwrap();
        assert_eq!(display_value(&config, "api_key").as_deref(), Some("dg_0...cdef"));
    }
}
