//! CLI presenter for output formatting

use colored::*;

use crate::domain::geo::DangerZone;

/// Presenter for CLI output formatting.
///
/// Status lines go to stderr, results to stdout.
pub struct Presenter;

impl Presenter {
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a monitor status line
    pub fn monitor_status(&self, state: &str) {
        eprintln!("{} Monitor: {}", "●".cyan(), state);
    }

    /// Loud line for a sent or failed alert
    pub fn alert(&self, message: &str) {
        eprintln!("{} {}", "‼".red().bold(), message.bold());
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// One zone per line
    pub fn zone_row(&self, zone: &DangerZone) {
        println!("{}", Self::format_zone(zone));
    }

    pub fn format_zone(zone: &DangerZone) -> String {
        format!(
            "{:>3}  {:<24} {:<11} {:<7} {:>7.0} m  {:.4},{:.4}",
            zone.id,
            zone.name,
            zone.kind.as_str(),
            zone.severity.as_str(),
            zone.radius_meters,
            zone.latitude,
            zone.longitude
        )
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{Severity, ZoneKind};

    #[test]
    fn format_zone_row() {
        let zone = DangerZone::new(
            7,
            37.7749,
            -122.4194,
            300.0,
            "Civic Center",
            ZoneKind::Crime,
            Severity::High,
        );
        let row = Presenter::format_zone(&zone);
        assert!(row.starts_with("  7  Civic Center"));
        assert!(row.contains("crime"));
        assert!(row.contains("high"));
        assert!(row.contains("300 m"));
        assert!(row.ends_with("37.7749,-122.4194"));
    }
}
