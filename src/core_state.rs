//! Application state shared by every page handler.
//!
//! `CoreState` owns the local store and the long-lived services, and hands
//! out the per-feature stores (tracker, medications, contacts, ...) bound
//! to the same backend. Wrapped in `Arc` by the host.

use std::sync::{Arc, Mutex};

use crate::booking::{
    spawn_auto_save, AutoSaveHandle, AutoSaver, BookingError, BookingFlow, ConfirmationRecord,
    RestorePrompt, SimulatedBackend,
};
use crate::config::{self, Settings};
use crate::contact::ContactDesk;
use crate::directory::{self, DirectoryError};
use crate::health_tools::{EmergencyContacts, HealthTracker, MedicationCabinet};
use crate::navigation::{ScrollEffects, ScrollView};
use crate::offline::{CacheStorage, Fetcher, OfflineWorker};
use crate::services::blog::{self, NewsletterForm};
use crate::services::{Assistant, Bookmarks, Notice, NotificationService, ThemeService};
use crate::storage::{LocalStore, SqliteStore};
use crate::stories::StoryBoard;

pub struct CoreState {
    pub settings: Settings,
    store: LocalStore,
    pub theme: ThemeService,
    pub notifications: NotificationService,
    pub bookmarks: Bookmarks,
    /// Shared with the auto-save task.
    booking: Arc<tokio::sync::Mutex<BookingFlow>>,
    auto_save: Mutex<Option<AutoSaveHandle>>,
    /// tokio Mutex: held across the simulated reply delay.
    pub assistant: tokio::sync::Mutex<Assistant>,
    scroll: Mutex<ScrollEffects>,
    caches: Arc<CacheStorage>,
}

impl CoreState {
    /// Persistent state under the app data dir. Falls back to a volatile
    /// store when the database cannot be opened, like a browser with
    /// storage disabled.
    pub fn new(settings: Settings) -> Self {
        let path = config::storage_db_path();
        let store = match SqliteStore::open(&path) {
            Ok(db) => {
                tracing::info!(path = %path.display(), "Local storage opened");
                LocalStore::new(Arc::new(db))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Local storage unavailable, using memory: {e}");
                LocalStore::in_memory()
            }
        };
        Self::with_store(store, settings)
    }

    pub fn with_store(store: LocalStore, settings: Settings) -> Self {
        Self {
            theme: ThemeService::load(store.clone()),
            notifications: NotificationService::new(settings.max_visible_toasts),
            bookmarks: Bookmarks::new(store.clone()),
            booking: Arc::new(tokio::sync::Mutex::new(BookingFlow::new(store.clone()))),
            auto_save: Mutex::new(None),
            assistant: tokio::sync::Mutex::new(Assistant::new(settings.bot_reply_delay)),
            scroll: Mutex::new(ScrollEffects::new()),
            caches: Arc::new(CacheStorage::new()),
            store,
            settings,
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    // ── Booking ─────────────────────────────────────────────

    pub fn booking(&self) -> Arc<tokio::sync::Mutex<BookingFlow>> {
        Arc::clone(&self.booking)
    }

    /// Start the periodic draft save. Must run inside a tokio runtime.
    /// A second call while the task is alive is a no-op.
    pub fn start_auto_save(&self) {
        let Ok(mut slot) = self.auto_save.lock() else {
            return;
        };
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        *slot = Some(spawn_auto_save(
            self.booking(),
            AutoSaver::new(self.store.clone()),
            self.settings.auto_save_interval,
        ));
    }

    pub fn stop_auto_save(&self) {
        if let Ok(mut slot) = self.auto_save.lock() {
            if let Some(handle) = slot.take() {
                handle.shutdown();
            }
        }
    }

    pub fn booking_restore_prompt(&self) -> Option<RestorePrompt> {
        AutoSaver::new(self.store.clone()).restore_prompt()
    }

    /// Accept the restore prompt; the toast is queued.
    pub async fn restore_booking(&self) {
        let mut flow = self.booking.lock().await;
        if let Some(notice) = AutoSaver::new(self.store.clone()).restore(&mut flow) {
            self.notifications.show(notice);
        }
    }

    pub fn dismiss_booking_restore(&self) {
        AutoSaver::new(self.store.clone()).dismiss();
    }

    /// Submit the reviewed draft through the simulated backend.
    pub async fn submit_booking(&self) -> Result<ConfirmationRecord, BookingError> {
        let backend = SimulatedBackend::new(self.settings.submit_delay);
        let mut flow = self.booking.lock().await;
        let record = flow.submit(&backend).await?;
        self.notifications.show(Notice::success(format!(
            "Appointment booked! Confirmation: {}",
            record.confirmation_number
        )));
        Ok(record)
    }

    // ── Health tools and forms ──────────────────────────────

    pub fn tracker(&self) -> HealthTracker {
        HealthTracker::load(self.store.clone(), self.settings.retention)
    }

    pub fn medications(&self) -> MedicationCabinet {
        MedicationCabinet::load(self.store.clone())
    }

    pub fn emergency_contacts(&self) -> EmergencyContacts {
        EmergencyContacts::load(self.store.clone())
    }

    pub fn contact_desk(&self) -> ContactDesk {
        ContactDesk::new(self.store.clone(), self.settings.submit_delay)
    }

    pub fn story_board(&self) -> StoryBoard {
        StoryBoard::new(self.store.clone(), self.settings.submit_delay)
    }

    // ── Directory and blog ──────────────────────────────────

    /// Save the hospital's emergency context; returns the booking link.
    pub fn book_emergency_appointment(&self, hospital_id: &str) -> Result<String, DirectoryError> {
        directory::book_emergency_appointment(&self.store, hospital_id, chrono::Utc::now())
    }

    /// Newsletter signup; every outcome is queued as a toast.
    pub async fn subscribe_newsletter(&self, form: &NewsletterForm) -> bool {
        match blog::subscribe(form, self.settings.submit_delay).await {
            Ok(notice) => {
                self.notifications.show(notice);
                true
            }
            Err(e) => {
                self.notifications.show(e.notice());
                false
            }
        }
    }

    // ── Navigation and offline ──────────────────────────────

    pub fn on_scroll(&self, scroll_y: f64) -> Option<ScrollView> {
        self.scroll.lock().ok().map(|mut fx| fx.update(scroll_y))
    }

    /// Offline worker over this state's caches and store.
    pub fn offline_worker<F: Fetcher>(&self, fetcher: Arc<F>) -> OfflineWorker<F> {
        OfflineWorker::new(Arc::clone(&self.caches), fetcher, self.store.clone())
    }
}

impl Drop for CoreState {
    fn drop(&mut self) {
        self.stop_auto_save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::flow::tests::step1;
    use crate::booking::BookingStep;
    use crate::offline::MockFetcher;
    use crate::storage::keys;

    fn state() -> CoreState {
        CoreState::with_store(LocalStore::in_memory(), Settings::instant())
    }

    #[tokio::test]
    async fn services_share_one_store() {
        let state = state();
        state.theme.toggle();
        state.bookmarks.add("nutrition", "Nutrition Basics", "/health-resources.html");
        assert_eq!(state.store().load_text(keys::THEME).as_deref(), Some("dark"));
        assert!(state.store().contains(keys::HEALTH_BOOKMARKS));
    }

    #[tokio::test]
    async fn booking_restore_round_trip() {
        let state = state();
        {
            let flow = state.booking();
            let mut flow = flow.lock().await;
            flow.advance(BookingStep::Step2, &step1()).unwrap();
            AutoSaver::new(state.store().clone()).tick(&flow);
            flow.reset();
        }
        let prompt = state.booking_restore_prompt().unwrap();
        assert!(prompt.field_count > 0);

        state.restore_booking().await;
        assert!(!state.booking().lock().await.snapshot().is_empty());
        assert_eq!(state.notifications.visible().len(), 1);

        state.dismiss_booking_restore();
        assert!(state.booking_restore_prompt().is_none());
    }

    #[tokio::test]
    async fn submit_outside_review_is_rejected() {
        let state = state();
        assert!(state.submit_booking().await.is_err());
        assert!(state.notifications.visible().is_empty());
    }

    #[tokio::test]
    async fn auto_save_starts_once() {
        let state = state();
        state.start_auto_save();
        state.start_auto_save();
        assert!(state.auto_save.lock().unwrap().is_some());
        state.stop_auto_save();
        assert!(state.auto_save.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn feature_stores_are_bound() {
        let state = state();
        assert_eq!(state.tracker().summary().total_entries, 0);
        assert!(state.medications().list().is_empty());
        assert!(state.emergency_contacts().list().is_empty());
        assert!(state.contact_desk().inquiries().is_empty());
        assert!(state.story_board().stories().is_empty());
    }

    #[tokio::test]
    async fn emergency_hand_off_and_newsletter() {
        let state = state();
        let link = state.book_emergency_appointment("menelik-ii").unwrap();
        assert!(link.ends_with("hospital=menelik-ii&emergency=true"));
        assert!(state.store().contains(keys::EMERGENCY_APPOINTMENT));

        let rejected = NewsletterForm { email: "amina@example.co.ke".into(), terms_accepted: false };
        assert!(!state.subscribe_newsletter(&rejected).await);
        let accepted = NewsletterForm { terms_accepted: true, ..rejected };
        assert!(state.subscribe_newsletter(&accepted).await);
        let messages: Vec<_> = state.notifications.visible().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["Please accept the terms to subscribe.", blog::MSG_SUBSCRIBED]);
    }

    #[tokio::test]
    async fn scroll_and_worker() {
        let state = state();
        assert!(state.on_scroll(400.0).unwrap().fab_visible);
        let worker = state.offline_worker(Arc::new(MockFetcher::serving(crate::offline::ESSENTIAL_ASSETS)));
        assert_eq!(worker.install().await.unwrap(), 4);
    }
}
