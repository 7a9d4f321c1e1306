//! Submission boundary. The site never transmitted bookings; the simulated
//! backend keeps the fixed delay and mints the confirmation code locally.
//! A real scheduling service slots in behind the same trait.

use std::future::Future;
use std::time::Duration;

use chrono::Local;

use super::confirmation::generate_confirmation_code;
use super::draft::BookingDraft;
use super::BookingError;

pub trait SubmissionBackend: Send + Sync {
    /// Submit a reviewed draft; resolves to the confirmation number.
    fn submit(
        &self,
        draft: &BookingDraft,
    ) -> impl Future<Output = Result<String, BookingError>> + Send;
}

/// Waits `delay`, then generates `HC{YYMMDD}{nnn}` for today.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl SubmissionBackend for SimulatedBackend {
    fn submit(
        &self,
        draft: &BookingDraft,
    ) -> impl Future<Output = Result<String, BookingError>> + Send {
        let delay = self.delay;
        let fields = draft.len();
        async move {
            tracing::debug!(fields, delay_ms = delay.as_millis() as u64, "Simulating booking submission");
            tokio::time::sleep(delay).await;
            let code = generate_confirmation_code(Local::now().date_naive(), &mut rand::thread_rng());
            Ok(code)
        }
    }
}
