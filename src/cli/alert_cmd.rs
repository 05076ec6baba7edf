//! Manual alert command

use std::process::ExitCode;

use crate::application::{AlertConfig, AlertDispatcher, Preferences};
use crate::domain::alert::AlertMessage;
use crate::infrastructure::{create_notifier, FixedLocation};

use super::app::{preference_store, AlertOptions, EXIT_ERROR, EXIT_SUCCESS};
use super::presenter::Presenter;

/// Send the emergency SMS immediately
pub async fn run_alert(options: AlertOptions) -> ExitCode {
    let presenter = Presenter::new();
    let preferences = Preferences::new(preference_store());

    let contacts = match preferences.load_contacts().await {
        Ok(contacts) => contacts,
        Err(e) => {
            presenter.error(&format!("Failed to load emergency contacts: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let trigger_word = match options.trigger_word.clone() {
        Some(word) => word,
        None => match preferences.load_trigger_word().await {
            Ok(word) => word,
            Err(e) => {
                presenter.error(&format!("Failed to load safety word: {}", e));
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    if options.dry_run {
        let message = AlertMessage::compose(&trigger_word, &options.position);
        for contact in contacts.iter() {
            presenter.key_value("to", &contact.to_string());
        }
        presenter.output(message.body());
        return ExitCode::from(EXIT_SUCCESS);
    }

    let dispatcher = AlertDispatcher::new(
        options.relay(),
        FixedLocation(options.position),
        create_notifier(options.notify),
        AlertConfig {
            enable_notify: options.notify,
        },
    );

    match dispatcher.dispatch(&contacts, &trigger_word).await {
        Ok(receipt) => {
            presenter.success(&format!(
                "Alert sent to {} contact(s)",
                receipt.recipients.len()
            ));
            presenter.output(receipt.message.body());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
