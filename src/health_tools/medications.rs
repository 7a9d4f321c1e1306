//! Medication cabinet and dose reminders, persisted under `medications`.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ToolError;
use crate::storage::{keys, LocalStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    /// `HH:MM`, as picked in the time inputs.
    pub times: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Input for a new cabinet entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub times: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleItem {
    pub id: String,
    pub time: String,
    pub medication: String,
    pub dosage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reminder {
    pub medication_id: String,
    pub name: String,
    pub dosage: String,
    pub instructions: String,
    pub due: NaiveDateTime,
}

impl Reminder {
    pub fn notification_body(&self) -> String {
        format!("Time to take {} ({})", self.name, self.dosage)
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub struct MedicationCabinet {
    store: LocalStore,
    medications: Vec<Medication>,
}

impl MedicationCabinet {
    pub fn load(store: LocalStore) -> Self {
        let medications = store.load_or_default(keys::MEDICATIONS);
        Self { store, medications }
    }

    pub fn list(&self) -> &[Medication] {
        &self.medications
    }

    fn persist(&self) {
        self.store.save(keys::MEDICATIONS, &self.medications);
    }

    /// Add an entry; blank times are dropped, malformed ones rejected.
    pub fn add(&mut self, input: NewMedication) -> Result<Medication, ToolError> {
        if input.name.trim().is_empty() {
            return Err(ToolError::InvalidInput("Medication name is required".into()));
        }
        let mut times = Vec::new();
        for t in input.times.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            let Some(parsed) = parse_time(t) else {
                return Err(ToolError::InvalidInput(format!("Invalid reminder time: {t}")));
            };
            times.push(parsed.format("%H:%M").to_string());
        }

        let med = Medication {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            dosage: input.dosage,
            frequency: input.frequency,
            times,
            notes: input.notes,
            active: true,
        };
        self.medications.push(med.clone());
        self.persist();
        tracing::info!(id = %med.id, doses = med.times.len(), "Medication added");
        Ok(med)
    }

    pub fn delete(&mut self, id: &str) -> Result<Medication, ToolError> {
        let pos = self
            .medications
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| ToolError::NotFound(format!("medication {id}")))?;
        let removed = self.medications.remove(pos);
        self.persist();
        tracing::info!(id, "Medication deleted");
        Ok(removed)
    }

    /// Every dose of every active medication, by time of day.
    pub fn todays_schedule(&self) -> Vec<ScheduleItem> {
        let mut items: Vec<ScheduleItem> = self
            .medications
            .iter()
            .filter(|m| m.active)
            .flat_map(|m| {
                m.times.iter().map(move |t| ScheduleItem {
                    id: format!("{}-{}", m.id, t),
                    time: t.clone(),
                    medication: m.name.clone(),
                    dosage: m.dosage.clone(),
                })
            })
            .collect();
        items.sort_by_key(|item| parse_time(&item.time));
        items
    }

    /// Upcoming reminders from `now`, soonest first. A dose whose time has
    /// already passed today is due tomorrow.
    pub fn reminders(&self, now: NaiveDateTime) -> Vec<Reminder> {
        let mut out: Vec<Reminder> = self
            .medications
            .iter()
            .filter(|m| m.active)
            .flat_map(|m| {
                m.times.iter().filter_map(|t| parse_time(t)).map(move |t| {
                    let today = now.date().and_time(t);
                    let due = if today <= now { today + Duration::days(1) } else { today };
                    Reminder {
                        medication_id: m.id.clone(),
                        name: m.name.clone(),
                        dosage: m.dosage.clone(),
                        instructions: if m.notes.trim().is_empty() {
                            "No special instructions".to_string()
                        } else {
                            m.notes.clone()
                        },
                        due,
                    }
                })
            })
            .collect();
        out.sort_by_key(|r| r.due);
        out
    }

    pub fn next_reminder(&self, now: NaiveDateTime) -> Option<Reminder> {
        self.reminders(now).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn amoxicillin() -> NewMedication {
        NewMedication {
            name: "Amoxicillin".into(),
            dosage: "500mg".into(),
            frequency: "three-times".into(),
            times: vec!["14:00".into(), "08:00".into(), "".into(), "20:00".into()],
            notes: "Take with food".into(),
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 10).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn add_persists_and_drops_blank_times() {
        let store = LocalStore::in_memory();
        let mut cab = MedicationCabinet::load(store.clone());
        let med = cab.add(amoxicillin()).unwrap();
        assert_eq!(med.times, vec!["14:00", "08:00", "20:00"]);
        assert!(Uuid::parse_str(&med.id).is_ok());

        let reloaded = MedicationCabinet::load(store);
        assert_eq!(reloaded.list(), cab.list());
    }

    #[test]
    fn add_validates() {
        let mut cab = MedicationCabinet::load(LocalStore::in_memory());
        let blank = NewMedication { name: " ".into(), ..amoxicillin() };
        assert!(cab.add(blank).is_err());
        let bad_time = NewMedication { times: vec!["8am".into()], ..amoxicillin() };
        assert!(cab.add(bad_time).is_err());
        assert!(cab.list().is_empty());
    }

    #[test]
    fn delete_by_id() {
        let mut cab = MedicationCabinet::load(LocalStore::in_memory());
        let med = cab.add(amoxicillin()).unwrap();
        assert_eq!(cab.delete(&med.id).unwrap().name, "Amoxicillin");
        assert!(matches!(cab.delete(&med.id), Err(ToolError::NotFound(_))));
    }

    #[test]
    fn schedule_sorted_by_time() {
        let mut cab = MedicationCabinet::load(LocalStore::in_memory());
        cab.add(amoxicillin()).unwrap();
        cab.add(NewMedication {
            name: "Metformin".into(),
            dosage: "850mg".into(),
            times: vec!["12:30".into()],
            ..Default::default()
        })
        .unwrap();
        let times: Vec<_> = cab.todays_schedule().into_iter().map(|i| i.time).collect();
        assert_eq!(times, vec!["08:00", "12:30", "14:00", "20:00"]);
    }

    #[test]
    fn unpadded_times_normalised_and_ordered() {
        let store = LocalStore::in_memory();
        let mut cab = MedicationCabinet::load(store.clone());
        let med = cab
            .add(NewMedication {
                name: "Lisinopril".into(),
                times: vec!["10:00".into(), "9:00".into()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(med.times, vec!["10:00", "09:00"]);

        // Entries written by older pages may still hold unpadded times.
        store.save(
            keys::MEDICATIONS,
            &serde_json::json!([{
                "id": "legacy", "name": "Aspirin", "dosage": "75mg", "frequency": "twice",
                "times": ["10:00", "9:00"], "notes": "", "active": true
            }]),
        );
        let legacy = MedicationCabinet::load(store);
        let times: Vec<_> = legacy.todays_schedule().into_iter().map(|i| i.time).collect();
        assert_eq!(times, vec!["9:00", "10:00"]);
    }

    #[test]
    fn next_reminder_today_or_tomorrow() {
        let mut cab = MedicationCabinet::load(LocalStore::in_memory());
        cab.add(amoxicillin()).unwrap();

        let next = cab.next_reminder(at(9, 0)).unwrap();
        assert_eq!(next.due, at(14, 0));
        assert_eq!(next.notification_body(), "Time to take Amoxicillin (500mg)");
        assert_eq!(next.instructions, "Take with food");

        let late = cab.next_reminder(at(21, 0)).unwrap();
        assert_eq!(late.due, at(8, 0) + Duration::days(1));

        // exactly on time counts as passed
        let on_time = cab.next_reminder(at(20, 0)).unwrap();
        assert_eq!(on_time.due, at(8, 0) + Duration::days(1));
    }

    #[test]
    fn empty_cabinet_has_no_reminder() {
        let cab = MedicationCabinet::load(LocalStore::in_memory());
        assert!(cab.next_reminder(at(9, 0)).is_none());
        assert!(cab.todays_schedule().is_empty());
    }
}
