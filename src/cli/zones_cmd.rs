//! Zone inspection commands

use crate::domain::error::CoordinateParseError;
use crate::domain::geo::{find_zone, DangerZone, Position};

use super::args::ZonesAction;
use super::presenter::Presenter;

/// Handle zones subcommand. Invalid coordinates are a usage error.
pub fn handle_zones_command(
    action: ZonesAction,
    zones: &[DangerZone],
    presenter: &Presenter,
) -> Result<(), CoordinateParseError> {
    match action {
        ZonesAction::List => {
            for zone in zones {
                presenter.zone_row(zone);
            }
        }
        ZonesAction::Check {
            latitude,
            longitude,
        } => {
            let position = checked_position(latitude, longitude)?;
            match find_zone(&position, zones) {
                Some(zone) => presenter.output(&format!(
                    "Inside {} ({:.0} m from centre, radius {:.0} m)",
                    zone,
                    zone.distance_to(&position),
                    zone.radius_meters
                )),
                None => presenter.output("Not inside any danger zone"),
            }
        }
    }
    Ok(())
}

/// Build a position from CLI coordinates, rejecting out-of-range values
pub fn checked_position(latitude: f64, longitude: f64) -> Result<Position, CoordinateParseError> {
    let position = Position::new(latitude, longitude);
    if position.is_valid() {
        Ok(position)
    } else {
        Err(CoordinateParseError {
            input: format!("{},{}", latitude, longitude),
        })
    }
}
