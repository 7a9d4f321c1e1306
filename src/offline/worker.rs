//! Offline worker lifecycle and event handlers.
//!
//! Install precaches the site, activate prunes stale cache versions, and
//! fetch routes every request through a caching strategy. The sync, push
//! and notification handlers are scaffolding: the `/api/sync/...`
//! endpoints do not exist yet, so their failures are logged and reported
//! as outcomes rather than raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::cache::CacheStorage;
use super::fetcher::{FetchError, Fetcher};
use super::request::{CacheRequest, CachedResponse};
use super::strategy::{self, Strategy};
use super::{OfflineError, DYNAMIC_CACHE, ESSENTIAL_ASSETS, STATIC_ASSETS, STATIC_CACHE};
use crate::storage::{keys, LocalStore};

pub const CLINIC_UPDATES_TAG: &str = "clinic-updates";
pub const CLINIC_UPDATES_URL: &str = "/api/clinics/updates";

pub const REMINDER_TITLE: &str = "HealthConnect Reminder";
pub const DEFAULT_PUSH_BODY: &str = "You have a health reminder!";
pub const SNOOZED_BODY: &str = "Snoozed reminder: Time for your medication!";
pub const SNOOZE_DELAY: Duration = Duration::from_secs(10 * 60);

const REMINDER_TAG: &str = "health-reminder";
const REMINDER_ICON: &str = "/images/icon-192x192.png";

/// Background sync tags, the local key each drains and its endpoint.
const SYNC_TARGETS: &[(&str, &str, &str)] = &[
    ("health-data-sync", keys::HEALTH_DATA, "/api/sync/health-data"),
    ("appointment-sync", keys::OFFLINE_APPOINTMENTS, "/api/sync/appointments"),
    ("medication-sync", keys::MEDICATIONS, "/api/sync/medications"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Parsed,
    Installed,
    Activated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SyncOutcome {
    UnknownTag,
    NothingToSync,
    /// Uploaded and the local copy removed.
    Synced,
    Rejected { status: u16 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    pub action: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

/// System notification the host should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: Option<String>,
    pub vibrate: Vec<u32>,
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClickOutcome {
    OpenWindow { url: String },
    /// Show `notification` again after `delay`.
    Snooze {
        #[serde(with = "millis")]
        delay: Duration,
        notification: PushNotification,
    },
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

/// Page-to-worker message.
#[derive(Debug, Deserialize)]
struct WorkerMessage {
    #[serde(rename = "type")]
    kind: String,
}

pub struct OfflineWorker<F: Fetcher> {
    caches: Arc<CacheStorage>,
    fetcher: Arc<F>,
    store: LocalStore,
    state: Mutex<WorkerState>,
    skip_waiting: AtomicBool,
    refreshes: Mutex<Vec<JoinHandle<()>>>,
}

impl<F: Fetcher> OfflineWorker<F> {
    pub fn new(caches: Arc<CacheStorage>, fetcher: Arc<F>, store: LocalStore) -> Self {
        Self {
            caches,
            fetcher,
            store,
            state: Mutex::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
            refreshes: Mutex::new(Vec::new()),
        }
    }

    pub fn caches(&self) -> &Arc<CacheStorage> {
        &self.caches
    }

    pub fn state(&self) -> WorkerState {
        self.state.lock().map(|s| *s).unwrap_or(WorkerState::Parsed)
    }

    fn set_state(&self, state: WorkerState) {
        if let Ok(mut s) = self.state.lock() {
            *s = state;
        }
    }

    /// Whether the worker asked to take over without waiting for old tabs.
    pub fn skip_waiting(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    // ═══════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════

    /// Cache the full manifest; if any entry fails, cache only the
    /// essentials. Returns how many entries were stored.
    pub async fn install(&self) -> Result<usize, OfflineError> {
        tracing::info!("Installing offline worker");
        self.skip_waiting.store(true, Ordering::SeqCst);

        let count = match self.precache(STATIC_ASSETS).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!(error = %e, "Failed to cache static assets, caching essentials");
                self.precache(ESSENTIAL_ASSETS).await?
            }
        };
        self.set_state(WorkerState::Installed);
        tracing::info!(count, "Static assets cached");
        Ok(count)
    }

    /// All-or-nothing, like `Cache.addAll`.
    async fn precache(&self, urls: &[&str]) -> Result<usize, OfflineError> {
        let fetches = urls.iter().map(|url| async move {
            let response = self.fetcher.fetch(&CacheRequest::get(*url)).await;
            (url.to_string(), response)
        });

        let mut responses = Vec::with_capacity(urls.len());
        for (url, result) in join_all(fetches).await {
            match result {
                Ok(response) => responses.push((url, response)),
                Err(e) => {
                    return Err(OfflineError::Precache {
                        url,
                        reason: e.to_string(),
                    })
                }
            }
        }

        let cache = self.caches.open(STATIC_CACHE).await;
        let status_of = |url: &str| {
            responses
                .iter()
                .find(|(u, _)| u == url)
                .map(|(_, r)| r.status)
                .unwrap_or_default()
        };
        if let Err(url) = cache.put_all(responses.clone()).await {
            let status = status_of(&url);
            return Err(OfflineError::BadStatus { url, status });
        }
        Ok(responses.len())
    }

    /// Delete every cache that is not a current version. Returns the names
    /// removed.
    pub async fn activate(&self) -> Vec<String> {
        tracing::info!("Activating offline worker");
        let mut deleted = Vec::new();
        for name in self.caches.keys().await {
            if name != STATIC_CACHE && name != DYNAMIC_CACHE {
                tracing::info!(cache = %name, "Deleting old cache");
                self.caches.delete(&name).await;
                deleted.push(name);
            }
        }
        self.set_state(WorkerState::Activated);
        deleted
    }

    // ═══════════════════════════════════════════
    // Fetch
    // ═══════════════════════════════════════════

    /// Answer a request. Only pass-through requests can fail; GETs always
    /// resolve to a response, 503 when nothing is available.
    pub async fn handle_fetch(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError> {
        let strategy = Strategy::for_request(request);
        tracing::debug!(url = %request.url, ?strategy, "Handling fetch");
        let response = match strategy {
            Strategy::Passthrough => return self.fetcher.fetch(request).await,
            Strategy::CacheFirst => strategy::cache_first(&self.caches, self.fetcher.as_ref(), request).await,
            Strategy::NetworkFirst => {
                strategy::network_first(&self.caches, self.fetcher.as_ref(), request).await
            }
            Strategy::StaleWhileRevalidate => {
                let (response, refresh) =
                    strategy::stale_while_revalidate(self.caches.clone(), self.fetcher.clone(), request).await;
                if let Some(handle) = refresh {
                    if let Ok(mut refreshes) = self.refreshes.lock() {
                        refreshes.retain(|h| !h.is_finished());
                        refreshes.push(handle);
                    }
                }
                response
            }
        };
        Ok(response)
    }

    /// Wait for background revalidations started so far.
    pub async fn settle(&self) {
        let pending: Vec<JoinHandle<()>> = self
            .refreshes
            .lock()
            .map(|mut r| r.drain(..).collect())
            .unwrap_or_default();
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Revalidation task ended abnormally");
            }
        }
    }

    // ═══════════════════════════════════════════
    // Sync, push, notifications, messages
    // ═══════════════════════════════════════════

    /// Upload the local data behind `tag` and clear it once accepted.
    pub async fn handle_sync(&self, tag: &str) -> SyncOutcome {
        tracing::info!(tag, "Background sync triggered");
        let Some((_, key, endpoint)) = SYNC_TARGETS.iter().find(|(t, _, _)| *t == tag) else {
            return SyncOutcome::UnknownTag;
        };

        let pending: Option<serde_json::Value> = self.store.load(key);
        let Some(pending) = pending.filter(has_entries) else {
            return SyncOutcome::NothingToSync;
        };

        let body = match serde_json::to_vec(&pending) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(tag, error = %e, "Failed to encode sync payload");
                return SyncOutcome::Failed { reason: e.to_string() };
            }
        };

        match self.fetcher.fetch(&CacheRequest::post_json(*endpoint, body)).await {
            Ok(response) if response.ok() => {
                self.store.remove(key);
                tracing::info!(tag, "Synced successfully");
                SyncOutcome::Synced
            }
            Ok(response) => {
                tracing::error!(tag, status = response.status, "Sync rejected");
                SyncOutcome::Rejected { status: response.status }
            }
            Err(e) => {
                tracing::error!(tag, error = %e, "Failed to sync");
                SyncOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    /// Refresh clinic data into the dynamic cache. Returns whether the
    /// cache was updated.
    pub async fn handle_periodic_sync(&self, tag: &str) -> bool {
        if tag != CLINIC_UPDATES_TAG {
            return false;
        }
        match self.refresh_clinic_data().await {
            Ok(()) => {
                tracing::info!("Clinic data updated");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to sync clinic data");
                false
            }
        }
    }

    async fn refresh_clinic_data(&self) -> Result<(), OfflineError> {
        let response = self.fetcher.fetch(&CacheRequest::get(CLINIC_UPDATES_URL)).await?;
        if !response.ok() {
            return Err(OfflineError::BadStatus {
                url: CLINIC_UPDATES_URL.into(),
                status: response.status,
            });
        }
        let data: serde_json::Value = serde_json::from_slice(&response.body)?;
        self.caches
            .open(DYNAMIC_CACHE)
            .await
            .put(CLINIC_UPDATES_URL, CachedResponse::json(&data)?)
            .await;
        Ok(())
    }

    /// Reminder notification for a push, with view and snooze actions.
    pub fn handle_push(&self, payload: Option<&str>) -> PushNotification {
        tracing::info!(has_payload = payload.is_some(), "Push message received");
        PushNotification {
            title: REMINDER_TITLE.into(),
            body: payload.unwrap_or(DEFAULT_PUSH_BODY).to_string(),
            icon: REMINDER_ICON.into(),
            badge: Some("/images/badge-72x72.png".into()),
            vibrate: vec![200, 100, 200],
            tag: REMINDER_TAG.into(),
            require_interaction: true,
            actions: vec![
                NotificationAction {
                    action: "view",
                    title: "View",
                    icon: "/images/action-view.png",
                },
                NotificationAction {
                    action: "snooze",
                    title: "Snooze 10min",
                    icon: "/images/action-snooze.png",
                },
            ],
        }
    }

    pub fn handle_notification_click(&self, action: Option<&str>) -> ClickOutcome {
        match action {
            Some("view") => ClickOutcome::OpenWindow {
                url: "/health-tools.html#medication-reminder".into(),
            },
            Some("snooze") => ClickOutcome::Snooze {
                delay: SNOOZE_DELAY,
                notification: PushNotification {
                    title: REMINDER_TITLE.into(),
                    body: SNOOZED_BODY.into(),
                    icon: REMINDER_ICON.into(),
                    badge: None,
                    vibrate: Vec::new(),
                    tag: REMINDER_TAG.into(),
                    require_interaction: false,
                    actions: Vec::new(),
                },
            },
            _ => ClickOutcome::OpenWindow {
                url: "/health-tools.html".into(),
            },
        }
    }

    /// `{"type": "SKIP_WAITING"}` activates a waiting worker. Returns
    /// whether the message was understood.
    pub fn handle_message(&self, message: &serde_json::Value) -> bool {
        match WorkerMessage::deserialize(message) {
            Ok(msg) if msg.kind == "SKIP_WAITING" => {
                self.skip_waiting.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }
}

/// Non-empty array or object.
fn has_entries(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::fetcher::MockFetcher;
    use crate::offline::{MSG_OFFLINE_ASSET, MSG_OFFLINE_CONTENT};

    fn worker(fetcher: MockFetcher) -> OfflineWorker<MockFetcher> {
        OfflineWorker::new(Arc::new(CacheStorage::new()), Arc::new(fetcher), LocalStore::in_memory())
    }

    #[tokio::test]
    async fn install_caches_full_manifest() {
        let w = worker(MockFetcher::serving(STATIC_ASSETS));
        assert_eq!(w.install().await.unwrap(), STATIC_ASSETS.len());
        assert_eq!(w.state(), WorkerState::Installed);
        assert!(w.skip_waiting());
        let cache = w.caches().open(STATIC_CACHE).await;
        assert_eq!(cache.len().await, STATIC_ASSETS.len());
    }

    #[tokio::test]
    async fn install_falls_back_to_essentials() {
        // CDN assets unreachable: 404 for everything not listed.
        let w = worker(MockFetcher::serving(ESSENTIAL_ASSETS));
        assert_eq!(w.install().await.unwrap(), ESSENTIAL_ASSETS.len());
        let keys = w.caches().open(STATIC_CACHE).await.keys().await;
        assert_eq!(keys, vec!["/", "/css/styles.css", "/index.html", "/js/main.js"]);
    }

    #[tokio::test]
    async fn install_fails_when_offline() {
        let fetcher = MockFetcher::new();
        fetcher.set_offline(true);
        let w = worker(fetcher);
        assert!(matches!(w.install().await, Err(OfflineError::Precache { .. })));
        assert_eq!(w.state(), WorkerState::Parsed);
    }

    #[tokio::test]
    async fn activate_prunes_old_versions() {
        let w = worker(MockFetcher::new());
        for name in ["healthconnect-v0.9.0", STATIC_CACHE, DYNAMIC_CACHE, "healthconnect-static-v0.9.0"] {
            w.caches().open(name).await;
        }
        let mut deleted = w.activate().await;
        deleted.sort();
        assert_eq!(deleted, vec!["healthconnect-static-v0.9.0", "healthconnect-v0.9.0"]);
        assert_eq!(w.caches().keys().await, vec![STATIC_CACHE, DYNAMIC_CACHE]);
        assert_eq!(w.state(), WorkerState::Activated);
    }

    #[tokio::test]
    async fn fetch_offline_after_install() {
        let w = worker(MockFetcher::serving(STATIC_ASSETS));
        w.install().await.unwrap();
        w.fetcher.set_offline(true);

        let css = w.handle_fetch(&CacheRequest::get("/css/styles.css")).await.unwrap();
        assert_eq!(css.body_text(), "/css/styles.css");

        let img = w.handle_fetch(&CacheRequest::get("/images/map.png")).await.unwrap();
        assert_eq!(img.body_text(), MSG_OFFLINE_ASSET);

        let api = w.handle_fetch(&CacheRequest::get("/api/clinics")).await.unwrap();
        assert_eq!(api.body_text(), MSG_OFFLINE_CONTENT);

        let post = w
            .handle_fetch(&CacheRequest::post_json("/api/sync/medications", Vec::new()))
            .await;
        assert!(post.is_err());
    }

    #[tokio::test]
    async fn page_fetch_revalidates_in_background() {
        let w = worker(MockFetcher::new().with_route("/contact.html", CachedResponse::text(200, "v1")));
        let req = CacheRequest::navigate("/contact.html");
        assert_eq!(w.handle_fetch(&req).await.unwrap().body_text(), "v1");

        w.fetcher.set_route("/contact.html", CachedResponse::text(200, "v2"));
        assert_eq!(w.handle_fetch(&req).await.unwrap().body_text(), "v1");
        w.settle().await;
        assert_eq!(w.handle_fetch(&req).await.unwrap().body_text(), "v2");
    }

    #[tokio::test]
    async fn sync_uploads_and_clears() {
        let fetcher = MockFetcher::new().with_route("/api/sync/medications", CachedResponse::new(200, "{}"));
        let w = worker(fetcher);
        w.store.save(keys::MEDICATIONS, &serde_json::json!([{"name": "Metformin"}]));

        assert_eq!(w.handle_sync("medication-sync").await, SyncOutcome::Synced);
        assert!(!w.store.contains(keys::MEDICATIONS));
        assert_eq!(w.handle_sync("medication-sync").await, SyncOutcome::NothingToSync);
    }

    #[tokio::test]
    async fn sync_failure_keeps_local_data() {
        let w = worker(MockFetcher::new());
        w.store.save(keys::OFFLINE_APPOINTMENTS, &serde_json::json!([{"service": "general"}]));
        assert_eq!(
            w.handle_sync("appointment-sync").await,
            SyncOutcome::Rejected { status: 404 }
        );
        assert!(w.store.contains(keys::OFFLINE_APPOINTMENTS));

        w.fetcher.set_offline(true);
        assert!(matches!(
            w.handle_sync("appointment-sync").await,
            SyncOutcome::Failed { .. }
        ));
        assert_eq!(w.handle_sync("unknown").await, SyncOutcome::UnknownTag);
    }

    #[tokio::test]
    async fn periodic_sync_caches_clinic_updates() {
        let body = serde_json::json!({"clinics": ["kibera"]});
        let fetcher = MockFetcher::new().with_route(
            CLINIC_UPDATES_URL,
            CachedResponse::new(200, serde_json::to_vec(&body).unwrap()),
        );
        let w = worker(fetcher);
        assert!(!w.handle_periodic_sync("other").await);
        assert!(w.handle_periodic_sync(CLINIC_UPDATES_TAG).await);
        let cached = w
            .caches()
            .open(DYNAMIC_CACHE)
            .await
            .match_url(CLINIC_UPDATES_URL)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&cached.body).unwrap();
        assert_eq!(parsed, body);
    }

    #[tokio::test]
    async fn periodic_sync_ignores_bad_json() {
        let fetcher = MockFetcher::new().with_route(CLINIC_UPDATES_URL, CachedResponse::text(200, "<html>"));
        let w = worker(fetcher);
        assert!(!w.handle_periodic_sync(CLINIC_UPDATES_TAG).await);
    }

    #[test]
    fn push_and_click_handlers() {
        let w = worker(MockFetcher::new());
        let push = w.handle_push(None);
        assert_eq!(push.body, DEFAULT_PUSH_BODY);
        assert_eq!(push.actions.len(), 2);
        assert_eq!(w.handle_push(Some("Take Metformin")).body, "Take Metformin");

        assert_eq!(
            w.handle_notification_click(Some("view")),
            ClickOutcome::OpenWindow {
                url: "/health-tools.html#medication-reminder".into()
            }
        );
        match w.handle_notification_click(Some("snooze")) {
            ClickOutcome::Snooze { delay, notification } => {
                assert_eq!(delay, Duration::from_secs(600));
                assert_eq!(notification.body, SNOOZED_BODY);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            w.handle_notification_click(None),
            ClickOutcome::OpenWindow {
                url: "/health-tools.html".into()
            }
        );
    }

    #[test]
    fn skip_waiting_message() {
        let w = worker(MockFetcher::new());
        assert!(!w.handle_message(&serde_json::json!({"type": "PING"})));
        assert!(!w.handle_message(&serde_json::json!("SKIP_WAITING")));
        assert!(!w.skip_waiting());
        assert!(w.handle_message(&serde_json::json!({"type": "SKIP_WAITING"})));
        assert!(w.skip_waiting());
    }
}
