//! Recording timing value objects

mod duration;

pub use duration::{Duration, DEFAULT_CLIP_MILLIS, DEFAULT_REQUEST_TIMEOUT_MILLIS};
