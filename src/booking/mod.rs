//! Appointment booking wizard.
//!
//! Four form steps, a review screen and a confirmation, driven by one
//! `BookingFlow` instance that owns the draft. Submission goes through the
//! `SubmissionBackend` async boundary; the only shipped backend simulates
//! the request locally.

pub mod autosave;
pub mod backend;
pub mod catalog;
pub mod confirmation;
pub mod draft;
pub mod flow;
pub mod prefill;

pub use autosave::{spawn_auto_save, AutoSaveHandle, AutoSaver, RestorePrompt};
pub use backend::{SimulatedBackend, SubmissionBackend};
pub use confirmation::{ConfirmationRecord, ReviewSummary};
pub use draft::BookingDraft;
pub use flow::{BookingFlow, BookingStep, StepInput, StepView, ViewEffect};
pub use prefill::BookingPrefill;

use thiserror::Error;

use crate::validation::ValidationReport;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation failed for {} field(s)", .0.errors.len())]
    Validation(ValidationReport),

    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: BookingStep, to: BookingStep },

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown clinic: {0}")]
    UnknownClinic(String),

    #[error("Time slot {time} is not available at {clinic}")]
    SlotUnavailable { clinic: String, time: String },

    #[error("Submission failed: {0}")]
    Submission(String),
}

impl BookingError {
    /// Field-level messages, when this is a validation failure.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }
}
