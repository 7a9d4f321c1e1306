use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validation::FormField;

/// Field name → value as entered. Serialises as a flat JSON object, the
/// shape already sitting under `bookingData` in users' browsers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingDraft {
    fields: BTreeMap<String, String>,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Non-empty value for `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Copy every submitted field, values untouched.
    pub fn absorb(&mut self, inputs: &[FormField]) {
        for field in inputs {
            self.set(&field.name, field.value.clone());
        }
    }

    /// Overlay `other` onto this draft.
    pub fn merge(&mut self, other: &BookingDraft) {
        for (k, v) in &other.fields {
            self.fields.insert(k.clone(), v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldKind;

    #[test]
    fn absorb_keeps_values_verbatim() {
        let mut draft = BookingDraft::new();
        draft.absorb(&[
            FormField::required("firstName", FieldKind::Text, "  Wanjiru "),
            FormField::new("gender", FieldKind::Choice, ""),
        ]);
        assert_eq!(draft.get("firstName"), Some("  Wanjiru "));
        assert_eq!(draft.get("gender"), Some(""));
        assert!(draft.value("gender").is_none());
    }

    #[test]
    fn serialises_as_flat_object() {
        let mut draft = BookingDraft::new();
        draft.set("clinic", "kibera");
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"clinic":"kibera"}"#);
        let back: BookingDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn merge_overlays() {
        let mut a = BookingDraft::new();
        a.set("service", "vaccinations");
        a.set("clinic", "kibera");
        let mut b = BookingDraft::new();
        b.set("clinic", "kisumu");
        a.merge(&b);
        assert_eq!(a.get("clinic"), Some("kisumu"));
        assert_eq!(a.len(), 2);
    }
}
