//! Danger zones and the zone matcher

use std::fmt;

use serde::{Deserialize, Serialize};

use super::position::{haversine_distance, Position};

/// Category of a danger zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Restricted,
    Crime,
    Harassment,
    Isolated,
}

impl ZoneKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Restricted => "restricted",
            Self::Crime => "crime",
            Self::Harassment => "harassment",
            Self::Isolated => "isolated",
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How dangerous a zone is considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A circular geofence. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerZone {
    pub id: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    pub severity: Severity,
}

impl DangerZone {
    pub fn new(
        id: u32,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        name: impl Into<String>,
        kind: ZoneKind,
        severity: Severity,
    ) -> Self {
        Self {
            id,
            latitude,
            longitude,
            radius_meters,
            name: name.into(),
            kind,
            severity,
        }
    }

    /// Distance in meters from `position` to the zone centre
    pub fn distance_to(&self, position: &Position) -> f64 {
        haversine_distance(position.coordinates(), (self.latitude, self.longitude))
    }

    /// Whether `position` lies inside the zone. The boundary counts as inside.
    pub fn contains(&self, position: &Position) -> bool {
        self.distance_to(position) <= self.radius_meters
    }
}

impl fmt::Display for DangerZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} severity)", self.name, self.kind, self.severity)
    }
}

/// Return the first zone in list order that encloses `position`.
///
/// Overlapping zones are not ranked by size or severity. Out-of-range or
/// non-finite positions match nothing.
pub fn find_zone<'a>(position: &Position, zones: &'a [DangerZone]) -> Option<&'a DangerZone> {
    if !position.is_valid() {
        return None;
    }
    zones.iter().find(|zone| zone.contains(position))
}

/// Built-in zone table used when the config file defines none
pub fn default_zones() -> Vec<DangerZone> {
    vec![
        DangerZone::new(
            1,
            37.7840,
            -122.4140,
            400.0,
            "Tenderloin",
            ZoneKind::Crime,
            Severity::High,
        ),
        DangerZone::new(
            2,
            37.7793,
            -122.4163,
            250.0,
            "Civic Center Plaza",
            ZoneKind::Crime,
            Severity::Medium,
        ),
        DangerZone::new(
            3,
            37.7880,
            -122.4075,
            300.0,
            "Union Square side streets",
            ZoneKind::Harassment,
            Severity::Medium,
        ),
        DangerZone::new(
            4,
            37.7650,
            -122.4194,
            350.0,
            "16th Street corridor",
            ZoneKind::Crime,
            Severity::High,
        ),
        DangerZone::new(
            5,
            37.7530,
            -122.3870,
            500.0,
            "Pier 80 restricted yard",
            ZoneKind::Restricted,
            Severity::Low,
        ),
        DangerZone::new(
            6,
            37.7694,
            -122.4862,
            600.0,
            "Golden Gate Park east trails",
            ZoneKind::Isolated,
            Severity::Medium,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: u32, lat: f64, lon: f64, radius: f64) -> DangerZone {
        DangerZone::new(id, lat, lon, radius, format!("zone-{}", id), ZoneKind::Crime, Severity::High)
    }

    #[test]
    fn centre_is_inside() {
        let zones = vec![zone(1, 10.0, 10.0, 100.0)];
        let found = find_zone(&Position::new(10.0, 10.0), &zones);
        assert_eq!(found.map(|z| z.id), Some(1));
    }

    #[test]
    fn far_position_matches_nothing() {
        let zones = vec![zone(1, 10.0, 10.0, 100.0)];
        assert!(find_zone(&Position::new(11.0, 10.0), &zones).is_none());
    }

    #[test]
    fn boundary_is_inclusive() {
        let position = Position::new(10.001, 10.0);
        let mut z = zone(1, 10.0, 10.0, 0.0);
        z.radius_meters = z.distance_to(&position);

        let zones = vec![z];
        assert_eq!(find_zone(&position, &zones).map(|z| z.id), Some(1));

        let mut shrunk = zones[0].clone();
        shrunk.radius_meters -= 0.001;
        assert!(find_zone(&position, &[shrunk]).is_none());
    }

    #[test]
    fn overlapping_zones_resolve_in_list_order() {
        let big_low = zone(1, 10.0, 10.0, 5_000.0);
        let small_high = zone(2, 10.0, 10.0, 50.0);
        let zones = vec![big_low, small_high];
        assert_eq!(find_zone(&Position::new(10.0, 10.0), &zones).map(|z| z.id), Some(1));
    }

    #[test]
    fn invalid_position_is_rejected_silently() {
        let zones = vec![zone(1, 0.0, 0.0, 50_000_000.0)];
        assert!(find_zone(&Position::new(91.0, 0.0), &zones).is_none());
        assert!(find_zone(&Position::new(0.0, 181.0), &zones).is_none());
        assert!(find_zone(&Position::new(f64::INFINITY, 0.0), &zones).is_none());
    }

    #[test]
    fn default_table_has_six_unique_zones() {
        let zones = default_zones();
        assert_eq!(zones.len(), 6);
        let mut ids: Vec<u32> = zones.iter().map(|z| z.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn default_table_overlaps_tenderloin_and_civic_center() {
        let zones = default_zones();
        // Between both centres, inside both radii; list order picks the Tenderloin.
        let between = Position::new(37.7810, -122.4158);
        assert!(zones[0].contains(&between));
        assert!(zones[1].contains(&between));
        assert_eq!(find_zone(&between, &zones).map(|z| z.id), Some(1));
    }

    #[test]
    fn zone_kind_deserializes_from_type_field() {
        let z: DangerZone = toml::from_str(
            r#"
id = 9
latitude = 1.0
longitude = 2.0
radius_meters = 30.0
name = "Alley"
type = "isolated"
severity = "low"
"#,
        )
        .unwrap();
        assert_eq!(z.kind, ZoneKind::Isolated);
        assert_eq!(z.severity, Severity::Low);
    }
}
