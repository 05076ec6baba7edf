//! Alert message composition

use crate::domain::geo::Position;
use crate::domain::trigger::TriggerWord;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Map link for a coordinate pair.
///
/// Coordinates are written as plain decimals joined by a comma, which needs
/// no percent-encoding in a query string.
pub fn generate_maps_url(latitude: f64, longitude: f64) -> String {
    format!("{}{},{}", MAPS_SEARCH_URL, latitude, longitude)
}

/// Body of the SMS sent to emergency contacts
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    body: String,
    maps_url: String,
}

impl AlertMessage {
    /// Compose the alert for a detected trigger word at `position`
    pub fn compose(trigger_word: &TriggerWord, position: &Position) -> Self {
        let maps_url = generate_maps_url(position.latitude, position.longitude);
        let body = format!(
            "EMERGENCY: the safety word \"{}\" was heard near me. I may need help. My location: {}",
            trigger_word, maps_url
        );
        Self { body, maps_url }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn maps_url(&self) -> &str {
        &self.maps_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_url_contains_both_coordinates() {
        let url = generate_maps_url(37.7749, -122.4194);
        assert!(url.contains("37.7749"));
        assert!(url.contains("-122.4194"));
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=37.7749,-122.4194"
        );
    }

    #[test]
    fn message_embeds_trigger_word_and_link() {
        let msg = AlertMessage::compose(&TriggerWord::new("pineapple"), &Position::new(1.5, -2.25));
        assert!(msg.body().contains("\"pineapple\""));
        assert!(msg.body().ends_with(msg.maps_url()));
        assert!(msg.maps_url().ends_with("1.5,-2.25"));
    }
}
