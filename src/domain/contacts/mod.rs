//! Emergency contacts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidContactError;

/// A person or service that receives SMS alerts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone_number: String,
}

impl EmergencyContact {
    /// Create a contact, normalising the phone number.
    ///
    /// The number may start with `+` and contain spaces, dashes, dots or
    /// parentheses; at least three digits are required (short codes like 911).
    pub fn new(name: &str, phone_number: &str) -> Result<Self, InvalidContactError> {
        let phone_number = normalize_phone(phone_number)?;
        let name = name.trim();
        let name = if name.is_empty() {
            phone_number.clone()
        } else {
            name.to_string()
        };
        Ok(Self { name, phone_number })
    }
}

impl FromStr for EmergencyContact {
    type Err = InvalidContactError;

    /// Parse the stored form `"Name: +15551234567"`. A bare number is accepted
    /// and doubles as the name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((name, phone)) => Self::new(name, phone),
            None => Self::new("", s),
        }
    }
}

impl fmt::Display for EmergencyContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.phone_number)
    }
}

fn normalize_phone(raw: &str) -> Result<String, InvalidContactError> {
    let trimmed = raw.trim();
    let err = |reason: &str| InvalidContactError {
        input: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut normalized = String::with_capacity(trimmed.len());
    for (i, ch) in trimmed.chars().enumerate() {
        match ch {
            '+' if i == 0 => normalized.push(ch),
            '0'..='9' => normalized.push(ch),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(err("Phone numbers may only contain digits and a leading '+'")),
        }
    }

    let digits = normalized.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 3 {
        return Err(err("Phone number needs at least 3 digits"));
    }
    Ok(normalized)
}

/// Ordered list of emergency contacts, unique by phone number
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactList {
    contacts: Vec<EmergencyContact>,
}

impl ContactList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from contacts, keeping the first entry for each phone number
    pub fn from_contacts(contacts: impl IntoIterator<Item = EmergencyContact>) -> Self {
        let mut list = Self::new();
        for contact in contacts {
            list.add(contact);
        }
        list
    }

    /// The fixed list used until the user saves their own
    pub fn defaults() -> Self {
        let entries = [
            ("Emergency Services", "911"),
            ("National DV Hotline", "+18007997233"),
            ("Crisis Text Line", "741741"),
            ("Trusted Friend", "+15555550123"),
        ];
        Self::from_contacts(entries.iter().filter_map(|(name, phone)| {
            EmergencyContact::new(name, phone).ok()
        }))
    }

    /// Add a contact. Returns false if the phone number is already present.
    pub fn add(&mut self, contact: EmergencyContact) -> bool {
        if self.contains_phone(&contact.phone_number) {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    /// Remove every contact whose phone number or name equals `key`
    /// (names compared case-insensitively). Returns the removed contacts.
    pub fn remove(&mut self, key: &str) -> Vec<EmergencyContact> {
        let key = key.trim();
        let phone_key = normalize_phone(key).ok();
        let (removed, kept): (Vec<_>, Vec<_>) = self.contacts.drain(..).partition(|c| {
            phone_key.as_deref() == Some(c.phone_number.as_str())
                || c.name.eq_ignore_ascii_case(key)
        });
        self.contacts = kept;
        removed
    }

    pub fn contains_phone(&self, phone_number: &str) -> bool {
        self.contacts.iter().any(|c| c.phone_number == phone_number)
    }

    pub fn phone_numbers(&self) -> Vec<String> {
        self.contacts.iter().map(|c| c.phone_number.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmergencyContact> {
        self.contacts.iter()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Encode as the stored string array (`"Name: phone"` per entry)
    pub fn to_stored(&self) -> Vec<String> {
        self.contacts.iter().map(|c| c.to_string()).collect()
    }

    /// Decode the stored string array
    pub fn from_stored(entries: &[String]) -> Result<Self, InvalidContactError> {
        let contacts = entries
            .iter()
            .map(|entry| entry.parse::<EmergencyContact>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_contacts(contacts))
    }
}
