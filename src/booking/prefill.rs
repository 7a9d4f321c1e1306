//! Booking page query parameters: `clinic`, `hospital`, `emergency`.
//!
//! Links from the clinic map, hospital directory and health tools land on
//! the booking page with these set.

use reqwest::Url;

use super::catalog;
use super::flow::BookingFlow;
use crate::services::notify::Notice;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPrefill {
    pub clinic: Option<String>,
    pub hospital: Option<String>,
    pub emergency: bool,
}

impl BookingPrefill {
    /// Parse from a full page URL. `None` when the URL does not parse.
    pub fn from_url(page_url: &str) -> Option<Self> {
        let url = Url::parse(page_url).ok()?;
        Some(Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned()))))
    }

    /// Parse a bare query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        match Url::parse(&format!("http://localhost/?{query}")) {
            Ok(url) => Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned()))),
            Err(_) => Self::default(),
        }
    }

    fn from_pairs(pairs: impl Iterator<Item = (String, String)>) -> Self {
        let mut prefill = Self::default();
        for (key, value) in pairs {
            let value = value.trim().to_string();
            match key.as_str() {
                "clinic" if !value.is_empty() => prefill.clinic = Some(value),
                "hospital" if !value.is_empty() => prefill.hospital = Some(value),
                "emergency" => prefill.emergency = value == "true",
                _ => {}
            }
        }
        prefill
    }

    pub fn is_empty(&self) -> bool {
        self.clinic.is_none() && self.hospital.is_none() && !self.emergency
    }

    /// Apply to a fresh flow; returns the notices to show.
    pub fn apply(&self, flow: &mut BookingFlow) -> Vec<Notice> {
        let mut notices = Vec::new();

        if let Some(id) = &self.clinic {
            match flow.select_clinic(id) {
                Ok(_) => {
                    if let Some(clinic) = catalog::find_clinic(id) {
                        notices.push(Notice::info(format!("{} has been pre-selected", clinic.name)));
                    }
                }
                Err(e) => tracing::warn!(clinic = %id, "Ignoring clinic parameter: {e}"),
            }
        }

        if let Some(hospital) = &self.hospital {
            flow.update_field("symptoms", &format!("Referred from hospital: {hospital}"));
        }

        if self.emergency {
            notices.push(flow.request_emergency());
        }

        notices
    }
}
