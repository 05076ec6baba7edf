//! Contacts and safety word command handlers

use crate::application::ports::KeyValueStore;
use crate::application::{Preferences, PreferencesError};

use super::args::{ContactsAction, TriggerAction};
use super::presenter::Presenter;

/// Handle contacts subcommand
pub async fn handle_contacts_command<S: KeyValueStore>(
    action: ContactsAction,
    preferences: &Preferences<S>,
    presenter: &Presenter,
) -> Result<(), PreferencesError> {
    match action {
        ContactsAction::List => {
            let contacts = preferences.load_contacts().await?;
            if contacts.is_empty() {
                presenter.warn("No emergency contacts. Add one with 'safeguard contacts add <name> <phone>'");
            }
            for contact in contacts.iter() {
                presenter.output(&contact.to_string());
            }
        }
        ContactsAction::Add { name, phone } => {
            let contacts = preferences.add_contact(&name, &phone).await?;
            presenter.success(&format!("Added {} ({} contacts)", name.trim(), contacts.len()));
        }
        ContactsAction::Remove { contact } => {
            let removed = preferences.remove_contact(&contact).await?;
            for contact in &removed {
                presenter.success(&format!("Removed {}", contact));
            }
        }
        ContactsAction::Reset => {
            let contacts = preferences.reset_contacts().await?;
            presenter.success(&format!("Restored {} default contacts", contacts.len()));
        }
    }
    Ok(())
}

/// Handle trigger subcommand
pub async fn handle_trigger_command<S: KeyValueStore>(
    action: TriggerAction,
    preferences: &Preferences<S>,
    presenter: &Presenter,
) -> Result<(), PreferencesError> {
    match action {
        TriggerAction::Get => {
            let word = preferences.load_trigger_word().await?;
            presenter.output(word.as_str());
        }
        TriggerAction::Set { word } => {
            let word = preferences.save_trigger_word(&word).await?;
            presenter.success(&format!("Safety word set to \"{}\"", word));
        }
    }
    Ok(())
}
