//! Alert dispatch use case

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::alert::AlertMessage;
use crate::domain::contacts::ContactList;
use crate::domain::geo::Position;
use crate::domain::trigger::TriggerWord;

use super::ports::{LocationError, LocationProvider, NotificationIcon, Notifier, SmsError, SmsRelay};

/// Errors from the alert use case
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("No emergency contacts configured. Add one with 'safeguard contacts add <name> <phone>'")]
    NoContacts,

    #[error("Could not determine location: {0}")]
    Location(#[from] LocationError),

    #[error("Failed to send SMS alert: {0}")]
    Relay(#[from] SmsError),
}

/// Configuration for alert dispatch
#[derive(Debug, Clone, Default)]
pub struct AlertConfig {
    /// Whether to raise a local notification after relaying
    pub enable_notify: bool,
}

/// What was sent
#[derive(Debug, Clone)]
pub struct AlertReceipt {
    pub recipients: Vec<String>,
    pub message: AlertMessage,
    pub position: Position,
    pub notified: bool,
}

/// Sends the emergency SMS and raises a local notification.
///
/// Fire-and-forget: one relay call, no delivery confirmation, no per-contact
/// retry. Wrap the relay in a retrying adapter if resilience is wanted.
pub struct AlertDispatcher<S, L, N>
where
    S: SmsRelay,
    L: LocationProvider,
    N: Notifier,
{
    relay: S,
    location: L,
    notifier: N,
    config: AlertConfig,
}

impl<S, L, N> AlertDispatcher<S, L, N>
where
    S: SmsRelay,
    L: LocationProvider,
    N: Notifier,
{
    pub fn new(relay: S, location: L, notifier: N, config: AlertConfig) -> Self {
        Self {
            relay,
            location,
            notifier,
            config,
        }
    }

    /// Relay an alert for `trigger_word` to every contact.
    ///
    /// Nothing is sent when `contacts` is empty.
    pub async fn dispatch(
        &self,
        contacts: &ContactList,
        trigger_word: &TriggerWord,
    ) -> Result<AlertReceipt, AlertError> {
        if contacts.is_empty() {
            warn!("Alert requested with no emergency contacts");
            return Err(AlertError::NoContacts);
        }

        let position = self.location.current_position().await?;
        let message = AlertMessage::compose(trigger_word, &position);
        let recipients = contacts.phone_numbers();

        self.relay.send(&recipients, message.body()).await?;
        info!(
            recipients = recipients.len(),
            location = %position,
            "Emergency SMS relayed"
        );

        let notified = if self.config.enable_notify {
            match self
                .notifier
                .notify(
                    "Emergency alert sent",
                    &format!(
                        "Your location was sent to {} emergency contact(s).",
                        recipients.len()
                    ),
                    NotificationIcon::Alert,
                )
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Alert notification failed");
                    false
                }
            }
        } else {
            false
        };

        Ok(AlertReceipt {
            recipients,
            message,
            position,
            notified,
        })
    }
}
