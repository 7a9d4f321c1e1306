//! Saved health resources, kept under `healthBookmarks`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::notify::Notice;
use crate::storage::{keys, LocalStore};

pub const MSG_BOOKMARKED: &str = "Resource bookmarked successfully!";
pub const MSG_ALREADY_BOOKMARKED: &str = "Resource is already bookmarked.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub timestamp: String,
}

pub struct Bookmarks {
    store: LocalStore,
}

impl Bookmarks {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Bookmark> {
        self.store.load_or_default(keys::HEALTH_BOOKMARKS)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list().iter().any(|b| b.id == id)
    }

    /// Add once per resource id; a repeat leaves the list untouched.
    pub fn add(&self, id: &str, title: &str, url: &str) -> Notice {
        let mut bookmarks = self.list();
        if bookmarks.iter().any(|b| b.id == id) {
            return Notice::error(MSG_ALREADY_BOOKMARKED);
        }
        bookmarks.push(Bookmark {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.store.save(keys::HEALTH_BOOKMARKS, &bookmarks);
        tracing::debug!(id, "Bookmark added");
        Notice::success(MSG_BOOKMARKED)
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut bookmarks = self.list();
        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != id);
        if bookmarks.len() == before {
            return false;
        }
        self.store.save(keys::HEALTH_BOOKMARKS, &bookmarks);
        true
    }
}
