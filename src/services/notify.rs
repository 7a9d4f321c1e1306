//! Toast and browser-notification service.
//!
//! Every flow reports user-facing outcomes as `Notice` values; this service
//! keeps the on-screen queue and decides when a system notification is
//! also warranted.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Error => "❌",
            Self::Warning => "⚠️",
            Self::Info => "ℹ️",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
            Self::Warning => "toast-warning",
            Self::Info => "toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }
}

/// Toast for a connectivity change reported by the host.
pub fn connectivity_notice(online: bool) -> Notice {
    if online {
        Notice::success("You are back online!")
    } else {
        Notice::warning("You are offline. Some features may be limited.")
    }
}

/// Browser notification permission, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Default,
    Granted,
    Denied,
}

/// System notification payload for the host to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

pub struct NotificationService {
    visible: Mutex<VecDeque<Notice>>,
    max_visible: usize,
    permission: Mutex<PermissionState>,
}

impl NotificationService {
    pub fn new(max_visible: usize) -> Self {
        Self {
            visible: Mutex::new(VecDeque::new()),
            max_visible: max_visible.max(1),
            permission: Mutex::new(PermissionState::Default),
        }
    }

    pub fn set_permission(&self, state: PermissionState) {
        if let Ok(mut p) = self.permission.lock() {
            *p = state;
        }
    }

    pub fn permission(&self) -> PermissionState {
        self.permission.lock().map(|p| *p).unwrap_or_default()
    }

    /// Whether the host should prompt for permission on load.
    pub fn should_request_permission(&self) -> bool {
        self.permission() == PermissionState::Default
    }

    /// Queue a toast. Oldest toasts drop off once the queue is full.
    /// Returns the browser notification to raise alongside it, if any.
    pub fn show(&self, notice: Notice) -> Option<BrowserNotification> {
        tracing::info!(kind = ?notice.kind, "{}", notice.message);

        let system = match notice.kind {
            NoticeKind::Success | NoticeKind::Warning => self.browser_notification(&notice.message),
            _ => None,
        };

        if let Ok(mut visible) = self.visible.lock() {
            while visible.len() >= self.max_visible {
                visible.pop_front();
            }
            visible.push_back(notice);
        }
        system
    }

    pub fn show_all(&self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.show(notice);
        }
    }

    /// System notification with the app title, when permission allows.
    pub fn browser_notification(&self, body: &str) -> Option<BrowserNotification> {
        (self.permission() == PermissionState::Granted).then(|| BrowserNotification {
            title: "HealthConnect Platform".into(),
            body: body.to_string(),
            icon: "/images/logo.png".into(),
        })
    }

    pub fn visible(&self) -> Vec<Notice> {
        self.visible
            .lock()
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn dismiss(&self, index: usize) -> Option<Notice> {
        self.visible.lock().ok().and_then(|mut v| v.remove(index))
    }

    pub fn clear(&self) {
        if let Ok(mut v) = self.visible.lock() {
            v.clear();
        }
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_bounded() {
        let svc = NotificationService::new(2);
        svc.show(Notice::info("one"));
        svc.show(Notice::info("two"));
        svc.show(Notice::info("three"));
        let visible = svc.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].message, "two");
    }

    #[test]
    fn browser_notification_needs_permission() {
        let svc = NotificationService::default();
        assert!(svc.should_request_permission());
        assert!(svc.show(Notice::success("Saved")).is_none());

        svc.set_permission(PermissionState::Granted);
        let system = svc.show(Notice::success("Saved")).unwrap();
        assert_eq!(system.body, "Saved");
        assert!(svc.show(Notice::error("Oops")).is_none());
    }

    #[test]
    fn dismiss_removes_toast() {
        let svc = NotificationService::default();
        svc.show(Notice::warning("Offline"));
        assert_eq!(svc.dismiss(0).unwrap().message, "Offline");
        assert!(svc.visible().is_empty());
        assert!(svc.dismiss(0).is_none());
    }

    #[test]
    fn connectivity_changes() {
        assert_eq!(connectivity_notice(true).kind, NoticeKind::Success);
        let offline = connectivity_notice(false);
        assert_eq!(offline.kind, NoticeKind::Warning);
        assert!(offline.message.starts_with("You are offline"));
    }

    #[test]
    fn kinds_have_icons() {
        assert_eq!(NoticeKind::Success.icon(), "✅");
        assert_eq!(NoticeKind::Error.css_class(), "toast-error");
    }
}
