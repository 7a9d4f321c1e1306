//! Symptom checker: the guided analysis decision table and the quick
//! severity-scoring checklist.
//!
//! Neither is diagnostic. Results are fixed guidance keyed on a handful of
//! common East African presentations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ToolError;

pub const PROLONGED_NOTE: &str = " Prolonged symptoms require medical evaluation.";
pub const DISCLAIMER: &str = "This is not a substitute for professional medical advice. Always consult healthcare providers for proper diagnosis.";
pub const EMERGENCY_NUMBERS: &[(&str, &str)] = &[
    ("General Emergency", "911 or 999"),
    ("Health Emergency", "+254 719 000 000"),
];

// ═══════════════════════════════════════════
// Guided analysis
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probability {
    High,
    Medium,
    Low,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Med,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }

    /// Badge text, e.g. `HIGH RISK`.
    pub fn badge(&self) -> String {
        format!("{} RISK", self.as_str().to_uppercase())
    }
}

/// Symptom checker form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomInputs {
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub primary_symptom: String,
    pub duration: String,
    #[serde(default)]
    pub additional_symptoms: Vec<String>,
}

impl SymptomInputs {
    pub fn new(primary: &str, duration: &str, additional: &[&str]) -> Self {
        Self {
            primary_symptom: primary.to_string(),
            duration: duration.to_string(),
            additional_symptoms: additional.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    fn has(&self, symptom: &str) -> bool {
        self.additional_symptoms.iter().any(|s| s == symptom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub name: String,
    pub probability: Probability,
    pub severity: Severity,
    pub description: String,
    pub recommendations: Vec<String>,
}

fn condition(
    name: &str,
    probability: Probability,
    severity: Severity,
    description: &str,
    recommendations: &[&str],
) -> ConditionRecord {
    ConditionRecord {
        name: name.to_string(),
        probability,
        severity,
        description: description.to_string(),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    }
}

/// Run the decision table. Always returns at least one record.
pub fn analyze(inputs: &SymptomInputs) -> Vec<ConditionRecord> {
    let mut conditions = Vec::new();

    match inputs.primary_symptom.as_str() {
        "fever" => {
            if inputs.has("body-aches") {
                conditions.push(condition(
                    "Malaria",
                    Probability::High,
                    Severity::High,
                    "Common in East Africa. Symptoms include fever, body aches, and fatigue.",
                    &["Seek immediate medical attention", "Get tested for malaria", "Stay hydrated"],
                ));
            }
            conditions.push(condition(
                "Viral Infection",
                Probability::Medium,
                Severity::Med,
                "Common viral infections that cause fever and general discomfort.",
                &["Rest and hydration", "Monitor temperature", "Consult doctor if fever persists"],
            ));
        }
        "diarrhea" => conditions.push(condition(
            "Gastroenteritis",
            Probability::High,
            Severity::Med,
            "Stomach infection causing diarrhea, often from contaminated water/food.",
            &["Stay hydrated with ORS", "Avoid dairy and fatty foods", "Seek medical care if severe"],
        )),
        "headache" => {
            if inputs.has("fever") && inputs.has("nausea") {
                conditions.push(condition(
                    "Meningitis (Concern)",
                    Probability::Low,
                    Severity::High,
                    "Serious condition requiring immediate medical attention.",
                    &["Seek emergency medical care immediately", "Do not delay treatment"],
                ));
            }
            conditions.push(condition(
                "Tension Headache",
                Probability::High,
                Severity::Low,
                "Common headache often caused by stress, dehydration, or fatigue.",
                &["Rest in dark, quiet room", "Stay hydrated", "Consider mild pain relief"],
            ));
        }
        "difficulty-breathing" => conditions.push(condition(
            "Respiratory Infection",
            Probability::Medium,
            Severity::High,
            "Could be pneumonia, COVID-19, or other respiratory conditions.",
            &[
                "Seek immediate medical attention",
                "Monitor oxygen levels if possible",
                "Isolate until diagnosed",
            ],
        )),
        "chest-pain" => conditions.push(condition(
            "Cardiac Event (Emergency)",
            Probability::Unknown,
            Severity::High,
            "Chest pain requires immediate medical evaluation.",
            &[
                "Call emergency services immediately",
                "Do not drive yourself",
                "Chew aspirin if not allergic",
            ],
        )),
        _ => {}
    }

    if inputs.duration == "more-week" {
        for c in &mut conditions {
            c.description.push_str(PROLONGED_NOTE);
        }
    }

    if conditions.is_empty() {
        conditions.push(condition(
            "General Health Concern",
            Probability::Unknown,
            Severity::Med,
            "Your symptoms may indicate various conditions. Medical consultation recommended.",
            &["Consult with healthcare provider", "Monitor symptoms", "Rest and stay hydrated"],
        ));
    }

    tracing::debug!(
        primary = %inputs.primary_symptom,
        results = conditions.len(),
        "Symptom analysis completed"
    );
    conditions
}

/// `analyze` behind the checker's simulated processing delay.
pub async fn analyze_async(inputs: &SymptomInputs, delay: Duration) -> Vec<ConditionRecord> {
    tokio::time::sleep(delay).await;
    analyze(inputs)
}

// ═══════════════════════════════════════════
// Quick checklist
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomWeight {
    Mild,
    Moderate,
    Severe,
}

/// A ticked checklist box: its label and `data-severity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedSymptom {
    pub label: String,
    pub weight: SymptomWeight,
}

impl CheckedSymptom {
    pub fn new(label: &str, weight: SymptomWeight) -> Self {
        Self {
            label: label.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Emergency,
    Urgent,
    Routine,
}

impl Urgency {
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Emergency => "Seek immediate medical attention. These symptoms may indicate a serious condition requiring urgent care.",
            Self::Urgent => "Schedule an appointment with a healthcare provider within 1-3 days. Monitor symptoms closely.",
            Self::Routine => "Monitor your symptoms. If they persist or worsen, consider scheduling a routine appointment.",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Emergency => "danger",
            Self::Urgent => "warning",
            Self::Routine => "normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomAssessment {
    /// Comma-joined labels of the ticked boxes.
    pub symptoms: String,
    pub urgency: Urgency,
    pub recommendation: String,
    pub emergency_numbers: Vec<(String, String)>,
    /// Offer a "Book Appointment Now" link.
    pub suggest_booking: bool,
}

pub fn check_symptoms(checked: &[CheckedSymptom]) -> Result<SymptomAssessment, ToolError> {
    if checked.is_empty() {
        return Err(ToolError::NothingSelected);
    }

    let count = |w: SymptomWeight| checked.iter().filter(|c| c.weight == w).count();
    let (mild, moderate, severe) = (
        count(SymptomWeight::Mild),
        count(SymptomWeight::Moderate),
        count(SymptomWeight::Severe),
    );

    let urgency = if severe > 0 {
        Urgency::Emergency
    } else if moderate > 1 || (moderate > 0 && mild > 2) {
        Urgency::Urgent
    } else {
        Urgency::Routine
    };

    let emergency_numbers = match urgency {
        Urgency::Emergency => EMERGENCY_NUMBERS
            .iter()
            .map(|(label, number)| (label.to_string(), number.to_string()))
            .collect(),
        _ => Vec::new(),
    };

    Ok(SymptomAssessment {
        symptoms: checked
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        urgency,
        recommendation: urgency.recommendation().to_string(),
        emergency_numbers,
        suggest_booking: urgency != Urgency::Routine,
    })
}
