//! Health tools panel: symptom analysis, personal tracker, BMI calculator,
//! medication cabinet, emergency contacts and daily tips.
//!
//! One implementation per tool. Every persisted collection lives behind
//! `LocalStore` under its own key.

pub mod bmi;
pub mod contacts;
pub mod medications;
pub mod symptoms;
pub mod tips;
pub mod tracker;

pub use bmi::{calculate_bmi, BmiCategory, BmiResult};
pub use contacts::{EmergencyContact, EmergencyContacts};
pub use medications::{Medication, MedicationCabinet, Reminder, ScheduleItem};
pub use symptoms::{analyze, analyze_async, check_symptoms, ConditionRecord, SymptomInputs};
pub use tracker::{HealthData, HealthSummary, HealthTracker};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ToolError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Please select at least one symptom to check.")]
    NothingSelected,
}
