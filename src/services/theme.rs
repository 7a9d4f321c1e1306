//! Light/dark theme and the high-contrast accessibility flag.
//!
//! Both values are stored as plain strings (`"dark"`, `"true"`), matching
//! what the site wrote.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::notify::Notice;
use crate::storage::{keys, LocalStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_matches('"') {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

pub struct ThemeService {
    store: LocalStore,
    theme: RwLock<Theme>,
    high_contrast: RwLock<bool>,
}

impl ThemeService {
    /// Read saved preferences; anything unrecognised means light, normal
    /// contrast.
    pub fn load(store: LocalStore) -> Self {
        let theme = store
            .load_text(keys::THEME)
            .and_then(|v| Theme::parse(&v))
            .unwrap_or_default();
        let high_contrast = store.load_text(keys::HIGH_CONTRAST).as_deref() == Some("true");
        Self {
            store,
            theme: RwLock::new(theme),
            high_contrast: RwLock::new(high_contrast),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme.read().map(|t| *t).unwrap_or_default()
    }

    pub fn high_contrast(&self) -> bool {
        self.high_contrast.read().map(|h| *h).unwrap_or(false)
    }

    pub fn set_theme(&self, theme: Theme) {
        if let Ok(mut t) = self.theme.write() {
            *t = theme;
        }
        self.store.save_text(keys::THEME, theme.as_str());
    }

    /// Flip light/dark and report the switch.
    pub fn toggle(&self) -> Notice {
        let next = self.theme().toggled();
        self.set_theme(next);
        tracing::debug!(theme = next.as_str(), "Theme switched");
        Notice::success(format!("Switched to {} mode", next.as_str()))
    }

    pub fn toggle_high_contrast(&self) -> bool {
        let next = !self.high_contrast();
        if let Ok(mut h) = self.high_contrast.write() {
            *h = next;
        }
        self.store.save_text(keys::HIGH_CONTRAST, if next { "true" } else { "false" });
        next
    }
}
