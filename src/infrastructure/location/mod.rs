//! Location adapters

mod latest_fix;
mod line_feed;

pub use latest_fix::{FixedLocation, LatestFix};
pub use line_feed::{parse_reading, LinePositionFeed};
