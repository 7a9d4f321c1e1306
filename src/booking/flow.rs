//! Booking state machine: `Step1 → Step2 → Step3 → Step4 → Review → Confirmed`.
//!
//! The flow owns two maps. `draft` holds values committed by a successful
//! step transition; `live` holds whatever the form currently shows (typed
//! but not yet committed). Rendering and auto-save read from these maps
//! only, never from the view.

use std::collections::BTreeMap;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::backend::SubmissionBackend;
use super::catalog::{self, ClinicView, TimeSlotView};
use super::confirmation::{build_review_summary, ConfirmationRecord, ReviewSummary};
use super::draft::BookingDraft;
use super::BookingError;
use crate::services::notify::Notice;
use crate::storage::{keys, LocalStore};
use crate::validation::{self, FieldKind, FormField, ValidationReport};

pub const MSG_SELECT_SERVICE: &str = "Please select a healthcare service";
pub const MSG_SELECT_CLINIC: &str = "Please select a clinic location";
pub const MSG_SELECT_TIME: &str = "Please select a time slot";
pub const MSG_SLOT_FULL: &str = "This time slot is full. Please choose another";
pub const MSG_CLINIC_SERVICE: &str = "This clinic does not offer the selected service";
pub const MSG_SELECT_PRIORITY: &str = "Please select an appointment priority";
pub const MSG_EMERGENCY: &str =
    "Emergency appointment requested. Our team will contact you within 1 hour.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Step1,
    Step2,
    Step3,
    Step4,
    Review,
    Confirmed,
}

impl BookingStep {
    pub const FORM_STEPS: [BookingStep; 4] = [Self::Step1, Self::Step2, Self::Step3, Self::Step4];

    /// 1-based wizard position; `None` for the pseudo-states.
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Step1 => Some(1),
            Self::Step2 => Some(2),
            Self::Step3 => Some(3),
            Self::Step4 => Some(4),
            Self::Review | Self::Confirmed => None,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Step1),
            2 => Some(Self::Step2),
            3 => Some(Self::Step3),
            4 => Some(Self::Step4),
            _ => None,
        }
    }

    pub fn is_form_step(&self) -> bool {
        self.number().is_some()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Step1 => "Personal Information",
            Self::Step2 => "Select Service",
            Self::Step3 => "Choose Location & Time",
            Self::Step4 => "Additional Details",
            Self::Review => "Review Booking",
            Self::Confirmed => "Booking Confirmed",
        }
    }
}

/// Static description of one input on a wizard step.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec { name, kind, required }
}

const STEP1_FIELDS: &[FieldSpec] = &[
    field("firstName", FieldKind::Text, true),
    field("lastName", FieldKind::Text, true),
    field("email", FieldKind::Email, true),
    field("phone", FieldKind::Phone, true),
    field("age", FieldKind::Age, true),
    field("gender", FieldKind::Choice, false),
];

const STEP2_FIELDS: &[FieldSpec] = &[field("service", FieldKind::Choice, true)];

const STEP3_FIELDS: &[FieldSpec] = &[
    field("clinic", FieldKind::Choice, true),
    field("selectedTime", FieldKind::Choice, true),
];

const STEP4_FIELDS: &[FieldSpec] = &[
    field("priority", FieldKind::Choice, true),
    field("symptoms", FieldKind::TextArea, false),
    field("emergencyContact", FieldKind::Checkbox, false),
];

pub fn fields_for(step: BookingStep) -> &'static [FieldSpec] {
    match step {
        BookingStep::Step1 => STEP1_FIELDS,
        BookingStep::Step2 => STEP2_FIELDS,
        BookingStep::Step3 => STEP3_FIELDS,
        BookingStep::Step4 => STEP4_FIELDS,
        BookingStep::Review | BookingStep::Confirmed => &[],
    }
}

/// Values submitted with a step transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepInput(BTreeMap<String, String>);

impl StepInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StepInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Side effects the view applies after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewEffect {
    ScrollToFormHeader,
}

/// What the view shows after a transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub current: BookingStep,
    /// Progress dots; dot `i` is lit once step `i + 1` is reached.
    pub indicators: [bool; 4],
    pub effects: Vec<ViewEffect>,
}

impl StepView {
    fn of(current: BookingStep) -> Self {
        let reached = current.number().unwrap_or(4);
        let mut indicators = [false; 4];
        for (i, lit) in indicators.iter_mut().enumerate() {
            *lit = (i as u8) < reached;
        }
        Self {
            current,
            indicators,
            effects: vec![ViewEffect::ScrollToFormHeader],
        }
    }
}

pub struct BookingFlow {
    step: BookingStep,
    draft: BookingDraft,
    live: BookingDraft,
    store: LocalStore,
    confirmation: Option<ConfirmationRecord>,
}

impl BookingFlow {
    pub fn new(store: LocalStore) -> Self {
        Self {
            step: BookingStep::Step1,
            draft: BookingDraft::new(),
            live: BookingDraft::new(),
            store,
            confirmation: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn view(&self) -> StepView {
        StepView::of(self.step)
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn confirmation(&self) -> Option<&ConfirmationRecord> {
        self.confirmation.as_ref()
    }

    /// Committed values overlaid with the live form state.
    pub fn snapshot(&self) -> BookingDraft {
        let mut snap = self.draft.clone();
        snap.merge(&self.live);
        snap
    }

    /// Record a keystroke-level edit.
    pub fn update_field(&mut self, name: &str, value: &str) {
        self.live.set(name, value);
    }

    /// Put previously auto-saved values back into the form.
    pub fn restore_inputs(&mut self, saved: &BookingDraft) {
        self.live.merge(saved);
    }

    // ── Selections ──────────────────────────────────────────

    pub fn select_service(&mut self, service_id: &str) -> Result<Vec<ClinicView>, BookingError> {
        let service = catalog::find_service(service_id)
            .ok_or_else(|| BookingError::UnknownService(service_id.to_string()))?;
        self.live.set("service", service.id);
        Ok(catalog::clinic_views(Some(service)))
    }

    /// Choosing a clinic clears any previously chosen slot.
    pub fn select_clinic(&mut self, clinic_id: &str) -> Result<Vec<TimeSlotView>, BookingError> {
        let clinic = catalog::find_clinic(clinic_id)
            .ok_or_else(|| BookingError::UnknownClinic(clinic_id.to_string()))?;
        self.live.set("clinic", clinic.id);
        self.live.remove("selectedTime");
        self.draft.remove("selectedTime");
        Ok(catalog::time_slot_views(clinic.id, None))
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), BookingError> {
        let snap = self.snapshot();
        let clinic = snap.value("clinic").unwrap_or_default();
        if !catalog::is_slot_available(clinic, time) {
            return Err(BookingError::SlotUnavailable {
                clinic: clinic.to_string(),
                time: time.to_string(),
            });
        }
        self.live.set("selectedTime", time);
        Ok(())
    }

    pub fn visible_clinics(&self) -> Vec<ClinicView> {
        let snap = self.snapshot();
        catalog::clinic_views(snap.value("service").and_then(catalog::find_service))
    }

    pub fn time_slots(&self) -> Vec<TimeSlotView> {
        let snap = self.snapshot();
        let clinic = snap.value("clinic").unwrap_or_default();
        catalog::time_slot_views(clinic, snap.value("selectedTime"))
    }

    /// Emergency checkbox: force emergency priority and service.
    pub fn request_emergency(&mut self) -> Notice {
        self.live.set("emergencyContact", "on");
        self.live.set("priority", "emergency");
        self.live.set("service", "emergency-care");
        tracing::info!("Emergency appointment requested");
        Notice::error(MSG_EMERGENCY)
    }

    // ── Validation ──────────────────────────────────────────

    fn build_form(step: BookingStep, values: &BookingDraft) -> Vec<FormField> {
        fields_for(step)
            .iter()
            .map(|f| FormField {
                name: f.name.to_string(),
                kind: f.kind,
                required: f.required,
                value: values.get(f.name).unwrap_or_default().to_string(),
                min_length: None,
            })
            .collect()
    }

    fn step_rules(step: BookingStep, values: &BookingDraft, report: &mut ValidationReport) {
        match step {
            BookingStep::Step2 => {
                if values.value("service").and_then(catalog::find_service).is_none() {
                    report.add("service", MSG_SELECT_SERVICE);
                }
            }
            BookingStep::Step3 => {
                let clinic = values.value("clinic").and_then(catalog::find_clinic);
                match clinic {
                    None => report.add("clinic", MSG_SELECT_CLINIC),
                    Some(c) => {
                        let service = values.value("service").and_then(catalog::find_service);
                        if service.is_some_and(|s| !c.offers(s)) {
                            report.add("clinic", MSG_CLINIC_SERVICE);
                        }
                    }
                }
                match values.value("selectedTime") {
                    None => report.add("selectedTime", MSG_SELECT_TIME),
                    Some(t) => {
                        if let Some(c) = clinic {
                            if !catalog::is_slot_available(c.id, t) {
                                report.add("selectedTime", MSG_SLOT_FULL);
                            }
                        }
                    }
                }
            }
            BookingStep::Step4 => {
                let ok = values
                    .value("priority")
                    .is_some_and(|p| catalog::PRIORITIES.contains(&p));
                if !ok {
                    report.add("priority", MSG_SELECT_PRIORITY);
                }
            }
            _ => {}
        }
    }

    /// Validate `step` against `values`; returns the step's form and report.
    pub fn validate_step(step: BookingStep, values: &BookingDraft) -> (Vec<FormField>, ValidationReport) {
        let form = Self::build_form(step, values);
        let mut report = validation::validate(&form);
        Self::step_rules(step, values, &mut report);
        (form, report)
    }

    /// Take `input` into the live state and validate the current step.
    fn commit_current(&mut self, input: &StepInput) -> Result<(), BookingError> {
        for (name, value) in input.iter() {
            self.live.set(name, value);
        }
        let (form, report) = Self::validate_step(self.step, &self.snapshot());
        if !report.is_valid() {
            tracing::debug!(step = ?self.step, failing = report.errors.len(), "Step validation failed");
            return Err(BookingError::Validation(report));
        }
        self.draft.absorb(&form);
        self.store.save(keys::BOOKING_DATA, &self.draft);
        tracing::info!(step = ?self.step, "Booking step completed");
        Ok(())
    }

    // ── Transitions ─────────────────────────────────────────

    /// Move forward to the next step once the current step validates.
    /// Steps cannot be skipped.
    pub fn advance(&mut self, target: BookingStep, input: &StepInput) -> Result<StepView, BookingError> {
        let next = self.step.number().and_then(|n| BookingStep::from_number(n + 1));
        if next != Some(target) {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: target,
            });
        }
        self.commit_current(input)?;
        self.step = target;
        Ok(self.view())
    }

    /// Move back without validation; nothing committed is lost.
    pub fn retreat(&mut self, target: BookingStep) -> Result<StepView, BookingError> {
        if self.step == BookingStep::Confirmed || !target.is_form_step() || target >= self.step {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: target,
            });
        }
        self.step = target;
        Ok(self.view())
    }

    /// Validate the last step and show the read-only summary.
    pub fn review(&mut self, input: &StepInput) -> Result<ReviewSummary, BookingError> {
        if self.step != BookingStep::Step4 {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: BookingStep::Review,
            });
        }
        self.commit_current(input)?;
        self.step = BookingStep::Review;
        Ok(build_review_summary(&self.draft))
    }

    /// Leave the review screen for the last form step.
    pub fn edit(&mut self) -> Result<StepView, BookingError> {
        if self.step != BookingStep::Review {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: BookingStep::Step4,
            });
        }
        self.step = BookingStep::Step4;
        Ok(self.view())
    }

    /// Every step re-checked against the committed draft.
    pub fn validate_all(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for step in BookingStep::FORM_STEPS {
            report.merge(Self::validate_step(step, &self.draft).1);
        }
        report
    }

    /// Submit the reviewed booking. On success the flow is `Confirmed` and
    /// both persisted booking keys are gone.
    pub async fn submit<B: SubmissionBackend>(&mut self, backend: &B) -> Result<ConfirmationRecord, BookingError> {
        if self.step != BookingStep::Review {
            return Err(BookingError::InvalidTransition {
                from: self.step,
                to: BookingStep::Confirmed,
            });
        }
        let report = self.validate_all();
        if !report.is_valid() {
            return Err(BookingError::Validation(report));
        }

        let confirmation_number = backend.submit(&self.draft).await?;
        let record = ConfirmationRecord {
            confirmation_number,
            summary: build_review_summary(&self.draft),
            draft: self.draft.clone(),
            generated_at: Local::now().naive_local(),
        };

        self.store.remove(keys::BOOKING_DATA);
        self.store.remove(keys::AUTO_SAVE_BOOKING);
        self.draft.clear();
        self.live.clear();
        self.step = BookingStep::Confirmed;
        self.confirmation = Some(record.clone());
        tracing::info!(code = %record.confirmation_number, "Appointment booked");
        Ok(record)
    }

    /// Start over with an empty draft.
    pub fn reset(&mut self) {
        self.step = BookingStep::Step1;
        self.draft.clear();
        self.live.clear();
        self.confirmation = None;
    }
}
