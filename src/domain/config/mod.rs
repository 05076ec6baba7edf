//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, FallbackLocation, DEFAULT_FALLBACK_LOCATION, DEFAULT_TRANSCRIPTION_URL,
};
