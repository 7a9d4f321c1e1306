//! Personal health tracker: vitals, symptom log, weight and mood/sleep.
//!
//! All four logs persist together under `healthData`, camelCase, in the
//! shape the site already wrote. Each category is append-only and trimmed
//! to the retention policy, oldest first.

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::ToolError;
use crate::config::RetentionPolicy;
use crate::storage::{keys, LocalStore};

pub const VITALS_CHART_POINTS: usize = 7;
pub const WEIGHT_CHART_POINTS: usize = 10;
pub const RECENT_SYMPTOMS: usize = 5;

// ═══════════════════════════════════════════
// Stored entries
// ═══════════════════════════════════════════

/// Readings are kept as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsEntry {
    /// YYYY-MM-DD
    pub date: String,
    pub systolic: String,
    pub diastolic: String,
    pub heart_rate: String,
    pub temperature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomLogEntry {
    /// RFC 3339 timestamp.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 1-10 slider value.
    pub severity: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: String,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSleepEntry {
    pub date: String,
    pub mood: String,
    pub sleep_hours: String,
    pub sleep_quality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    #[serde(default)]
    pub vitals: Vec<VitalsEntry>,
    #[serde(default)]
    pub symptoms: Vec<SymptomLogEntry>,
    #[serde(default)]
    pub weight: Vec<WeightEntry>,
    #[serde(default)]
    pub mood_sleep: Vec<MoodSleepEntry>,
}

impl HealthData {
    pub fn total_entries(&self) -> usize {
        self.vitals.len() + self.symptoms.len() + self.weight.len() + self.mood_sleep.len()
    }

    /// Whether vitals, a symptom or mood/sleep was logged on `day`.
    /// Weight entries do not count toward the streak.
    pub fn has_data_on(&self, day: NaiveDate) -> bool {
        let day = day.format("%Y-%m-%d").to_string();
        self.vitals.iter().any(|v| v.date == day)
            || self.symptoms.iter().any(|s| s.date.split('T').next() == Some(day.as_str()))
            || self.mood_sleep.iter().any(|m| m.date == day)
    }
}

// ═══════════════════════════════════════════
// View types
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub total_entries: usize,
    /// 1 when anything was logged today, else 0.
    pub streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsPoint {
    pub date: String,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub heart_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: String,
    pub weight: f64,
}

fn trim_to<T>(entries: &mut Vec<T>, policy: RetentionPolicy) {
    if entries.len() > policy.max_entries {
        let excess = entries.len() - policy.max_entries;
        entries.drain(..excess);
    }
}

fn parse_reading(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn today_string() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub struct HealthTracker {
    store: LocalStore,
    retention: RetentionPolicy,
    data: HealthData,
}

impl HealthTracker {
    /// Load `healthData`; missing or malformed data starts empty.
    pub fn load(store: LocalStore, retention: RetentionPolicy) -> Self {
        let mut data: HealthData = store.load_or_default(keys::HEALTH_DATA);
        trim_to(&mut data.vitals, retention);
        trim_to(&mut data.symptoms, retention);
        trim_to(&mut data.weight, retention);
        trim_to(&mut data.mood_sleep, retention);
        Self {
            store,
            retention,
            data,
        }
    }

    pub fn data(&self) -> &HealthData {
        &self.data
    }

    fn persist(&self) -> HealthSummary {
        self.store.save(keys::HEALTH_DATA, &self.data);
        self.summary()
    }

    pub fn save_vitals(
        &mut self,
        systolic: &str,
        diastolic: &str,
        heart_rate: &str,
        temperature: &str,
    ) -> HealthSummary {
        self.data.vitals.push(VitalsEntry {
            date: today_string(),
            systolic: systolic.to_string(),
            diastolic: diastolic.to_string(),
            heart_rate: heart_rate.to_string(),
            temperature: temperature.to_string(),
        });
        trim_to(&mut self.data.vitals, self.retention);
        tracing::info!("Vitals saved");
        self.persist()
    }

    pub fn log_symptom(&mut self, kind: &str, severity: &str, notes: &str) -> HealthSummary {
        self.data.symptoms.push(SymptomLogEntry {
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            kind: kind.to_string(),
            severity: severity.to_string(),
            notes: notes.to_string(),
        });
        trim_to(&mut self.data.symptoms, self.retention);
        tracing::info!(kind, "Symptom logged");
        self.persist()
    }

    /// Record weight and height; BMI is stored rounded to one decimal.
    pub fn save_weight(&mut self, weight_kg: f64, height_cm: f64) -> Result<HealthSummary, ToolError> {
        if !(weight_kg > 0.0 && height_cm > 0.0) {
            return Err(ToolError::InvalidInput(super::bmi::MSG_INVALID.to_string()));
        }
        let meters = height_cm / 100.0;
        let bmi = (weight_kg / (meters * meters) * 10.0).round() / 10.0;
        self.data.weight.push(WeightEntry {
            date: today_string(),
            weight: weight_kg,
            height: height_cm,
            bmi,
        });
        trim_to(&mut self.data.weight, self.retention);
        tracing::info!(bmi, "Weight saved");
        Ok(self.persist())
    }

    pub fn save_mood_sleep(&mut self, mood: &str, sleep_hours: &str, sleep_quality: &str) -> HealthSummary {
        self.data.mood_sleep.push(MoodSleepEntry {
            date: today_string(),
            mood: mood.to_string(),
            sleep_hours: sleep_hours.to_string(),
            sleep_quality: sleep_quality.to_string(),
        });
        trim_to(&mut self.data.mood_sleep, self.retention);
        tracing::info!(mood, "Mood and sleep saved");
        self.persist()
    }

    pub fn summary(&self) -> HealthSummary {
        self.summary_on(Utc::now().date_naive())
    }

    pub fn summary_on(&self, day: NaiveDate) -> HealthSummary {
        HealthSummary {
            total_entries: self.data.total_entries(),
            streak_days: u32::from(self.data.has_data_on(day)),
        }
    }

    /// Last seven vitals, oldest first.
    pub fn vitals_series(&self) -> Vec<VitalsPoint> {
        let start = self.data.vitals.len().saturating_sub(VITALS_CHART_POINTS);
        self.data.vitals[start..]
            .iter()
            .map(|v| VitalsPoint {
                date: v.date.clone(),
                systolic: parse_reading(&v.systolic),
                diastolic: parse_reading(&v.diastolic),
                heart_rate: parse_reading(&v.heart_rate),
            })
            .collect()
    }

    /// Last ten weights, oldest first.
    pub fn weight_series(&self) -> Vec<WeightPoint> {
        let start = self.data.weight.len().saturating_sub(WEIGHT_CHART_POINTS);
        self.data.weight[start..]
            .iter()
            .map(|w| WeightPoint {
                date: w.date.clone(),
                weight: w.weight,
            })
            .collect()
    }

    /// Last five symptom entries, newest first.
    pub fn recent_symptoms(&self) -> Vec<&SymptomLogEntry> {
        self.data.symptoms.iter().rev().take(RECENT_SYMPTOMS).collect()
    }
}
