//! Emergency contacts and trigger word persistence

use thiserror::Error;
use tracing::warn;

use crate::domain::contacts::{ContactList, EmergencyContact};
use crate::domain::error::InvalidContactError;
use crate::domain::trigger::TriggerWord;

use super::ports::{KeyValueStore, StorageError};

/// Storage key for the contact list (JSON array of strings)
pub const CONTACTS_KEY: &str = "emergency_contacts";

/// Storage key for the trigger word (plain string)
pub const TRIGGER_WORD_KEY: &str = "trigger_word";

/// Errors from preference updates
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    InvalidContact(#[from] InvalidContactError),

    #[error("A contact with phone number {0} already exists")]
    DuplicateContact(String),

    #[error("No contact matches '{0}'")]
    ContactNotFound(String),

    #[error("Trigger word cannot be empty")]
    EmptyTriggerWord,
}

/// Reads and writes the user's safety preferences
pub struct Preferences<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saved contacts, or the default list if none were ever saved.
    /// Unreadable data is logged and replaced by the defaults.
    pub async fn load_contacts(&self) -> Result<ContactList, StorageError> {
        let Some(raw) = self.store.get(CONTACTS_KEY).await? else {
            return Ok(ContactList::defaults());
        };

        let decoded = serde_json::from_str::<Vec<String>>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|entries| ContactList::from_stored(&entries).map_err(|e| e.to_string()));

        match decoded {
            Ok(list) => Ok(list),
            Err(message) => {
                warn!(key = CONTACTS_KEY, %message, "Stored contacts are corrupt, using defaults");
                Ok(ContactList::defaults())
            }
        }
    }

    pub async fn save_contacts(&self, contacts: &ContactList) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&contacts.to_stored()).map_err(|e| {
            StorageError::WriteFailed {
                key: CONTACTS_KEY.to_string(),
                message: e.to_string(),
            }
        })?;
        self.store.set(CONTACTS_KEY, &encoded).await
    }

    pub async fn add_contact(
        &self,
        name: &str,
        phone_number: &str,
    ) -> Result<ContactList, PreferencesError> {
        let contact = EmergencyContact::new(name, phone_number)?;
        let mut contacts = self.load_contacts().await?;
        if !contacts.add(contact.clone()) {
            return Err(PreferencesError::DuplicateContact(contact.phone_number));
        }
        self.save_contacts(&contacts).await?;
        Ok(contacts)
    }

    /// Remove contacts by phone number or name
    pub async fn remove_contact(&self, key: &str) -> Result<Vec<EmergencyContact>, PreferencesError> {
        let mut contacts = self.load_contacts().await?;
        let removed = contacts.remove(key);
        if removed.is_empty() {
            return Err(PreferencesError::ContactNotFound(key.to_string()));
        }
        self.save_contacts(&contacts).await?;
        Ok(removed)
    }

    /// Forget saved contacts so the defaults apply again
    pub async fn reset_contacts(&self) -> Result<ContactList, StorageError> {
        self.store.remove(CONTACTS_KEY).await?;
        Ok(ContactList::defaults())
    }

    /// Saved trigger word, or "help"
    pub async fn load_trigger_word(&self) -> Result<TriggerWord, StorageError> {
        let word = self
            .store
            .get(TRIGGER_WORD_KEY)
            .await?
            .map(TriggerWord::new)
            .filter(|word| !word.is_empty())
            .unwrap_or_default();
        Ok(word)
    }

    pub async fn save_trigger_word(&self, word: &str) -> Result<TriggerWord, PreferencesError> {
        let word = TriggerWord::new(word);
        if word.is_empty() {
            return Err(PreferencesError::EmptyTriggerWord);
        }
        self.store.set(TRIGGER_WORD_KEY, word.as_str()).await?;
        Ok(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn defaults_when_nothing_saved() {
        let prefs = Preferences::new(MemoryStore::default());
        assert_eq!(prefs.load_contacts().await.unwrap().len(), 4);
        assert_eq!(prefs.load_trigger_word().await.unwrap().as_str(), "help");
    }

    #[tokio::test]
    async fn added_contact_is_persisted_as_json_strings() {
        let prefs = Preferences::new(MemoryStore::default());
        prefs.add_contact("Sam", "+1 555 0199").await.unwrap();

        let raw = prefs.store.get(CONTACTS_KEY).await.unwrap().unwrap();
        let entries: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4], "Sam: +15550199");
    }

    #[tokio::test]
    async fn duplicate_contact_is_rejected() {
        let prefs = Preferences::new(MemoryStore::default());
        let err = prefs.add_contact("Again", "911").await.unwrap_err();
        assert!(matches!(err, PreferencesError::DuplicateContact(_)));
    }

    #[tokio::test]
    async fn removing_everything_leaves_an_empty_list() {
        let prefs = Preferences::new(MemoryStore::default());
        prefs.save_contacts(&ContactList::new()).await.unwrap();
        assert!(prefs.load_contacts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_contact_fails() {
        let prefs = Preferences::new(MemoryStore::default());
        let err = prefs.remove_contact("nobody").await.unwrap_err();
        assert!(matches!(err, PreferencesError::ContactNotFound(_)));
    }

    #[tokio::test]
    async fn corrupt_contacts_fall_back_to_defaults() {
        let store = MemoryStore::default();
        store.set(CONTACTS_KEY, "{not json").await.unwrap();
        let prefs = Preferences::new(store);
        assert_eq!(prefs.load_contacts().await.unwrap(), ContactList::defaults());
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let prefs = Preferences::new(MemoryStore::default());
        prefs.save_contacts(&ContactList::new()).await.unwrap();
        prefs.reset_contacts().await.unwrap();
        assert_eq!(prefs.load_contacts().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn trigger_word_round_trip_and_validation() {
        let prefs = Preferences::new(MemoryStore::default());
        prefs.save_trigger_word("  Pineapple ").await.unwrap();
        assert_eq!(prefs.load_trigger_word().await.unwrap().as_str(), "Pineapple");
        assert!(matches!(
            prefs.save_trigger_word("   ").await,
            Err(PreferencesError::EmptyTriggerWord)
        ));
    }
}
