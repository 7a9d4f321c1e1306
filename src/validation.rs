//! Form validation shared by the booking, contact and story flows.
//!
//! Validation is pure: it reports which fields fail and why, and the
//! caller decides what to do with the report. `FieldState` is the view
//! projection (error class + message) for whatever renders the form.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MSG_REQUIRED: &str = "This field is required";
pub const MSG_EMAIL: &str = "Please enter a valid email address";
pub const MSG_PHONE: &str = "Please enter a valid phone number";
pub const MSG_AGE: &str = "Please enter a valid age (1-120)";

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;

/// CSS class applied to a failing input.
pub const ERROR_CLASS: &str = "error";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Digits are ASCII only; `\d` would also take Arabic-Indic or fullwidth ones.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s()-]{10,}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Age,
    Choice,
    TextArea,
    Checkbox,
}

/// One submitted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    /// Minimum trimmed length, when the form asks for detail.
    pub min_length: Option<usize>,
}

impl FormField {
    pub fn new(name: &str, kind: FieldKind, value: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            value: value.to_string(),
            min_length: None,
        }
    }

    pub fn required(name: &str, kind: FieldKind, value: &str) -> Self {
        Self {
            required: true,
            ..Self::new(name, kind, value)
        }
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Whether the field holds any input. Checkboxes count as filled only
    /// when checked.
    pub fn is_filled(&self) -> bool {
        let v = self.value.trim();
        match self.kind {
            FieldKind::Checkbox => !v.is_empty() && v != "false" && v != "off",
            _ => !v.is_empty(),
        }
    }
}

/// Outcome of validating a set of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Failing field name → message.
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Record a form-level or step-level failure.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for (field, message) in other.errors {
            self.add(&field, message);
        }
    }
}

/// Render state for a single input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub name: String,
    pub error_class: Option<String>,
    pub message: Option<String>,
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Leading-integer parse: optional sign then digits, trailing text ignored.
fn parse_leading_int(value: &str) -> Option<i64> {
    let v = value.trim();
    let (sign, digits) = match v.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, v.strip_prefix('+').unwrap_or(v)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

pub fn is_valid_age(value: &str) -> bool {
    matches!(parse_leading_int(value), Some(age) if (MIN_AGE..=MAX_AGE).contains(&age))
}

/// First failing rule's message for `field`, or `None` when it passes.
pub fn validate_field(field: &FormField) -> Option<String> {
    if !field.is_filled() {
        return field.required.then(|| MSG_REQUIRED.to_string());
    }

    let value = field.value.trim();
    match field.kind {
        FieldKind::Email if !is_valid_email(value) => return Some(MSG_EMAIL.into()),
        FieldKind::Phone if !is_valid_phone(value) => return Some(MSG_PHONE.into()),
        FieldKind::Age if !is_valid_age(value) => return Some(MSG_AGE.into()),
        _ => {}
    }

    if let Some(min) = field.min_length {
        if value.chars().count() < min {
            return Some(format!(
                "Please provide more details (at least {min} characters)"
            ));
        }
    }

    None
}

/// Validate every field; pure, no side effects.
pub fn validate(fields: &[FormField]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for field in fields {
        if let Some(message) = validate_field(field) {
            report.add(&field.name, message);
        }
    }
    report
}

/// Project a report onto the inputs: failing fields get the error class and
/// message, passing fields have both cleared.
pub fn field_states(fields: &[FormField], report: &ValidationReport) -> Vec<FieldState> {
    fields
        .iter()
        .map(|f| match report.message_for(&f.name) {
            Some(msg) => FieldState {
                name: f.name.clone(),
                error_class: Some(ERROR_CLASS.to_string()),
                message: Some(msg.to_string()),
            },
            None => FieldState {
                name: f.name.clone(),
                error_class: None,
                message: None,
            },
        })
        .collect()
}
