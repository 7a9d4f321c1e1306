//! Periodic snapshot of the booking form under `autoSaveBooking`, and the
//! restore banner shown when a snapshot is found on load.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::draft::BookingDraft;
use super::flow::BookingFlow;
use crate::services::notify::Notice;
use crate::storage::{keys, LocalStore};

pub const RESTORE_BANNER: &str =
    "We found some previously entered information. Would you like to restore it?";
pub const RESTORED_MESSAGE: &str = "Previous form data restored";

/// Banner offered when an auto-saved snapshot exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestorePrompt {
    pub message: String,
    pub field_count: usize,
}

#[derive(Clone)]
pub struct AutoSaver {
    store: LocalStore,
}

impl AutoSaver {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Persist committed and live inputs together. Never fails.
    pub fn tick(&self, flow: &BookingFlow) {
        let snapshot = flow.snapshot();
        if snapshot.is_empty() {
            return;
        }
        self.store.save(keys::AUTO_SAVE_BOOKING, &snapshot);
        tracing::debug!(fields = snapshot.len(), "Booking form auto-saved");
    }

    fn saved(&self) -> Option<BookingDraft> {
        self.store
            .load::<BookingDraft>(keys::AUTO_SAVE_BOOKING)
            .filter(|d| !d.is_empty())
    }

    pub fn restore_prompt(&self) -> Option<RestorePrompt> {
        self.saved().map(|d| RestorePrompt {
            message: RESTORE_BANNER.to_string(),
            field_count: d.len(),
        })
    }

    /// Merge the snapshot back into the form. `None` when nothing was saved.
    pub fn restore(&self, flow: &mut BookingFlow) -> Option<Notice> {
        let saved = self.saved()?;
        flow.restore_inputs(&saved);
        tracing::info!(fields = saved.len(), "Restored auto-saved booking form");
        Some(Notice::success(RESTORED_MESSAGE))
    }

    pub fn dismiss(&self) {
        self.store.remove(keys::AUTO_SAVE_BOOKING);
    }
}

/// Running auto-save task. Dropping the handle stops it.
pub struct AutoSaveHandle {
    handle: JoinHandle<()>,
}

impl AutoSaveHandle {
    pub fn shutdown(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoSaveHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Tick `saver` every `interval`, first tick one interval after start.
pub fn spawn_auto_save(
    flow: Arc<Mutex<BookingFlow>>,
    saver: AutoSaver,
    interval: Duration,
) -> AutoSaveHandle {
    let period = interval.max(Duration::from_millis(1));
    let handle = tokio::spawn(async move {
        tracing::info!("Booking auto-save started (every {}s)", period.as_secs());
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let flow = flow.lock().await;
            saver.tick(&flow);
        }
    });
    AutoSaveHandle { handle }
}
