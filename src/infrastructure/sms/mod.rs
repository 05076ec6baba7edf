//! SMS relay adapters

mod http_relay;
mod retry;

pub use http_relay::HttpSmsRelay;
pub use retry::RetryingSmsRelay;
