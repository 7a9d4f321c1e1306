//! Personal emergency contacts and the location links used by the
//! emergency panel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ToolError;
use crate::storage::{keys, LocalStore};
use crate::validation::{self, FieldKind, FormField};

pub const SHARE_TITLE: &str = "My Current Location - Health Emergency";
pub const SHARE_TEXT: &str = "I need medical assistance. Here is my location:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub relationship: String,
    pub phone: String,
    #[serde(default)]
    pub location: String,
}

impl EmergencyContact {
    pub fn tel_link(&self) -> String {
        format!("tel:{}", self.phone.replace(' ', ""))
    }
}

pub struct EmergencyContacts {
    store: LocalStore,
    contacts: Vec<EmergencyContact>,
}

impl EmergencyContacts {
    pub fn load(store: LocalStore) -> Self {
        let contacts = store.load_or_default(keys::EMERGENCY_CONTACTS);
        Self { store, contacts }
    }

    pub fn list(&self) -> &[EmergencyContact] {
        &self.contacts
    }

    pub fn add(
        &mut self,
        name: &str,
        relationship: &str,
        phone: &str,
        location: &str,
    ) -> Result<EmergencyContact, ToolError> {
        let report = validation::validate(&[
            FormField::required("contact-name", FieldKind::Text, name),
            FormField::required("contact-relationship", FieldKind::Choice, relationship),
            FormField::required("contact-phone", FieldKind::Phone, phone),
        ]);
        if let Some((field, message)) = report.errors.iter().next() {
            return Err(ToolError::InvalidInput(format!("{field}: {message}")));
        }

        let contact = EmergencyContact {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            relationship: relationship.to_string(),
            phone: phone.trim().to_string(),
            location: location.trim().to_string(),
        };
        self.contacts.push(contact.clone());
        self.store.save(keys::EMERGENCY_CONTACTS, &self.contacts);
        tracing::info!(id = %contact.id, "Emergency contact added");
        Ok(contact)
    }

    pub fn delete(&mut self, id: &str) -> Result<EmergencyContact, ToolError> {
        let pos = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ToolError::NotFound(format!("contact {id}")))?;
        let removed = self.contacts.remove(pos);
        self.store.save(keys::EMERGENCY_CONTACTS, &self.contacts);
        Ok(removed)
    }
}

/// Map search for hospitals around a position.
pub fn maps_search_url(lat: f64, lng: f64) -> String {
    format!("https://www.google.com/maps/search/hospital/@{lat},{lng},15z")
}

/// Link shared (or copied) when the user sends their location.
pub fn share_location_url(lat: f64, lng: f64) -> String {
    format!("https://maps.google.com/?q={lat},{lng}")
}
