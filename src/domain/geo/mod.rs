//! Geolocation value objects and the zone matcher

mod position;
mod zone;

pub use position::{haversine_distance, Position, EARTH_RADIUS_METERS};
pub use zone::{default_zones, find_zone, DangerZone, Severity, ZoneKind};
