//! Community stories: submission form and the country filter.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::notify::Notice;
use crate::storage::{keys, LocalStore};
use crate::validation::ValidationReport;

pub const STORY_MIN_LENGTH: usize = 50;
pub const THANK_YOU: &str = "Thank you for sharing your story! We'll review it and may feature it on our platform to inspire others.";

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Validation failed for {} field(s)", .0.errors.len())]
    Validation(ValidationReport),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryForm {
    pub name: String,
    pub location: String,
    pub category: String,
    pub story: String,
    pub consent: bool,
}

impl StoryForm {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.name.trim().is_empty() {
            report.add("name", "Name is required");
        }
        if self.location.trim().is_empty() {
            report.add("location", "Location is required");
        }
        if self.category.is_empty() {
            report.add("category", "Please select a category");
        }
        let story = self.story.trim();
        if story.is_empty() {
            report.add("story", "Please share your story");
        } else if story.chars().count() < STORY_MIN_LENGTH {
            report.add("story", "Story must be at least 50 characters long");
        }
        if !self.consent {
            report.add("consent", "Please provide consent to share your story");
        }
        report
    }
}

/// Stored submission. `consent` keeps the checkbox's form value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredStory {
    pub name: String,
    pub location: String,
    pub category: String,
    pub story: String,
    pub consent: Option<String>,
    pub timestamp: String,
}

pub struct StoryBoard {
    store: LocalStore,
    delay: Duration,
}

impl StoryBoard {
    pub fn new(store: LocalStore, delay: Duration) -> Self {
        Self { store, delay }
    }

    pub async fn submit(&self, form: &StoryForm) -> Result<Notice, StoryError> {
        let report = form.validate();
        if !report.is_valid() {
            return Err(StoryError::Validation(report));
        }
        tokio::time::sleep(self.delay).await;

        let mut stories: Vec<StoredStory> = self.store.load_or_default(keys::COMMUNITY_STORIES);
        stories.push(StoredStory {
            name: form.name.trim().to_string(),
            location: form.location.trim().to_string(),
            category: form.category.clone(),
            story: form.story.trim().to_string(),
            consent: form.consent.then(|| "on".to_string()),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.store.save(keys::COMMUNITY_STORIES, &stories);
        tracing::info!(category = %form.category, "Community story submitted");
        Ok(Notice::success(THANK_YOU))
    }

    pub fn stories(&self) -> Vec<StoredStory> {
        self.store.load_or_default(keys::COMMUNITY_STORIES)
    }
}

pub const COUNTRIES: &[(&str, &str)] = &[
    ("all", "All Countries"),
    ("ethiopia", "Ethiopia"),
    ("kenya", "Kenya"),
    ("uganda", "Uganda"),
    ("tanzania", "Tanzania"),
    ("rwanda", "Rwanda"),
    ("burundi", "Burundi"),
    ("somalia", "Somalia"),
    ("south-sudan", "South Sudan"),
];

pub fn country_label(code: &str) -> Option<&'static str> {
    COUNTRIES.iter().find(|(c, _)| *c == code).map(|(_, label)| *label)
}

/// Whether a story tagged `country` shows under filter `selected`.
pub fn is_visible(country: &str, selected: &str) -> bool {
    selected == "all" || country == selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> StoryForm {
        StoryForm {
            name: "Halima".into(),
            location: "Garissa, Kenya".into(),
            category: "maternal-health".into(),
            story: "The mobile clinic reached our village when my daughter was born early.".into(),
            consent: true,
        }
    }

    #[test]
    fn every_rule_reported() {
        let report = StoryForm::default().validate();
        assert_eq!(report.errors.len(), 5);
        assert_eq!(report.message_for("story"), Some("Please share your story"));
    }

    #[test]
    fn short_story_rejected() {
        let form = StoryForm {
            story: "Too short".into(),
            ..valid()
        };
        assert_eq!(
            form.validate().message_for("story"),
            Some("Story must be at least 50 characters long")
        );
        assert!(valid().validate().is_valid());
    }

    #[tokio::test]
    async fn submit_appends_story() {
        let board = StoryBoard::new(LocalStore::in_memory(), Duration::ZERO);
        let notice = board.submit(&valid()).await.unwrap();
        assert_eq!(notice.message, THANK_YOU);
        let stories = board.stories();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].consent.as_deref(), Some("on"));
    }

    #[tokio::test]
    async fn missing_consent_blocks_submit() {
        let board = StoryBoard::new(LocalStore::in_memory(), Duration::ZERO);
        let form = StoryForm {
            consent: false,
            ..valid()
        };
        assert!(board.submit(&form).await.is_err());
        assert!(board.stories().is_empty());
    }

    #[test]
    fn country_filter() {
        assert!(is_visible("kenya", "all"));
        assert!(is_visible("kenya", "kenya"));
        assert!(!is_visible("uganda", "kenya"));
        assert_eq!(country_label("south-sudan"), Some("South Sudan"));
        assert_eq!(country_label("mars"), None);
    }
}
