//! Partner hospital directory: static hospital table, card search and
//! specialty filter, side-by-side comparison and emergency booking
//! hand-off.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{keys, LocalStore};

pub const MSG_COMPARE_MIN: &str = "Please select at least 2 hospitals to compare";
/// Departments listed under "Key Specialties" in a comparison.
pub const KEY_SPECIALTY_COUNT: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Unknown hospital: {0}")]
    UnknownHospital(String),
    #[error("{}", MSG_COMPARE_MIN)]
    TooFewToCompare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HospitalContact {
    pub phone: &'static str,
    pub emergency: &'static str,
    pub email: &'static str,
    /// Without scheme, as printed on the card.
    pub website: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hospital {
    pub id: &'static str,
    pub name: &'static str,
    pub location: &'static str,
    /// Tags on the directory card; the specialty filter matches these.
    pub specialties: &'static [&'static str],
    pub established: &'static str,
    pub beds: &'static str,
    pub departments: &'static [&'static str],
    pub achievements: &'static [&'static str],
    /// (service, description)
    pub services: &'static [(&'static str, &'static str)],
    pub contact: HospitalContact,
}

// ═══════════════════════════════════════════
// Hospital table
// ═══════════════════════════════════════════

pub const HOSPITALS: &[Hospital] = &[
    Hospital {
        id: "tikur-anbessa",
        name: "Black Lion Hospital (Tikur Anbessa)",
        location: "Addis Ababa, Ethiopia",
        specialties: &["Emergency", "Surgery", "Cardiology", "Oncology"],
        established: "1972",
        beds: "700+",
        departments: &[
            "Emergency Department",
            "Internal Medicine",
            "General Surgery",
            "Pediatrics",
            "Obstetrics & Gynecology",
            "Orthopedics",
            "Ophthalmology",
            "Radiology",
            "Laboratory Services",
            "Pharmacy",
            "Intensive Care Unit",
            "Cardiac Care Unit",
        ],
        achievements: &[
            "Largest hospital in Ethiopia",
            "Primary teaching hospital for Addis Ababa University",
            "Leading trauma and emergency care center",
            "Advanced surgical procedures",
            "International medical collaborations",
        ],
        services: &[
            ("Emergency Services", "24/7 emergency care with trauma center"),
            ("Surgical Services", "General, cardiac, neuro, and specialized surgeries"),
            ("Diagnostic Services", "CT scan, MRI, X-ray, ultrasound, laboratory tests"),
            ("Specialized Clinics", "Cardiology, oncology, nephrology, endocrinology"),
            ("Teaching Programs", "Medical education and residency training"),
        ],
        contact: HospitalContact {
            phone: "+251 11 276 1000",
            emergency: "+251 11 276 1111",
            email: "info@tikuranbessa.edu.et",
            website: "www.aau.edu.et/chs/school-of-medicine/",
        },
    },
    Hospital {
        id: "st-pauls",
        name: "St. Paul's Hospital Millennium Medical College",
        location: "Addis Ababa, Ethiopia",
        specialties: &["Cardiac Surgery", "Neurosurgery", "Emergency"],
        established: "2007",
        beds: "400+",
        departments: &[
            "Cardiac Surgery",
            "Neurosurgery",
            "Orthopedic Surgery",
            "Emergency Medicine",
            "Internal Medicine",
            "Pediatrics",
            "Gynecology & Obstetrics",
            "Ophthalmology",
            "Anesthesiology",
            "Radiology",
            "Pathology",
        ],
        achievements: &[
            "First dedicated cardiac surgery center in Ethiopia",
            "Leading medical education institution",
            "Advanced neurosurgical procedures",
            "International standard cardiac care",
            "Research and development center",
        ],
        services: &[
            ("Cardiac Center", "Open heart surgery, catheterization, cardiac rehabilitation"),
            ("Neurosurgery", "Brain and spine surgery with advanced imaging"),
            ("Emergency Care", "24/7 emergency services with trauma center"),
            ("Specialized Clinics", "Cardiology, neurology, orthopedics"),
            ("Medical Education", "Undergraduate and postgraduate medical training"),
        ],
        contact: HospitalContact {
            phone: "+251 11 551 6000",
            emergency: "+251 11 551 6001",
            email: "info@sphmmc.edu.et",
            website: "www.sphmmc.edu.et",
        },
    },
    Hospital {
        id: "yekatit-12",
        name: "Yekatit 12 Hospital Medical College",
        location: "Addis Ababa, Ethiopia",
        specialties: &["Maternal Health", "Pediatrics", "Psychiatry"],
        established: "1963",
        beds: "350+",
        departments: &[
            "Internal Medicine",
            "General Surgery",
            "Obstetrics & Gynecology",
            "Pediatrics",
            "Emergency Medicine",
            "Dermatology",
            "Psychiatry",
            "Radiology",
            "Laboratory",
            "Pharmacy",
        ],
        achievements: &[
            "Historic government teaching hospital",
            "Leading maternal and child health services",
            "Community health education programs",
            "Medical student training center",
            "Public health initiatives",
        ],
        services: &[
            ("Maternal Health", "Prenatal care, delivery services, postnatal care"),
            ("General Medicine", "Outpatient and inpatient medical services"),
            ("Emergency Care", "24/7 emergency medical services"),
            ("Surgical Services", "General surgery and specialized procedures"),
            ("Medical Education", "Clinical training for medical students"),
        ],
        contact: HospitalContact {
            phone: "+251 11 553 2000",
            emergency: "+251 11 553 2001",
            email: "info@yekatit12.gov.et",
            website: "www.yekatit12hospital.gov.et",
        },
    },
    Hospital {
        id: "menelik-ii",
        name: "Menelik II Referral Hospital",
        location: "Addis Ababa, Ethiopia",
        specialties: &["Emergency", "Trauma", "Intensive Care"],
        established: "1910",
        beds: "200+",
        departments: &[
            "Emergency Department",
            "General Surgery",
            "Internal Medicine",
            "Trauma Surgery",
            "Intensive Care",
            "Radiology",
            "Laboratory Services",
            "Pharmacy",
            "Physical Therapy",
        ],
        achievements: &[
            "Historic referral hospital",
            "Leading emergency and trauma care",
            "Advanced ICU facilities",
            "Specialized surgical procedures",
            "Community health outreach",
        ],
        services: &[
            ("Emergency Care", "24/7 emergency and trauma services"),
            ("Surgical Services", "General and trauma surgery"),
            ("Critical Care", "Intensive care unit with advanced monitoring"),
            ("Diagnostic Services", "Radiology, laboratory, and imaging services"),
            ("Referral Services", "Specialized care coordination"),
        ],
        contact: HospitalContact {
            phone: "+251 11 557 7000",
            emergency: "+251 11 557 7001",
            email: "info@menelik2hospital.gov.et",
            website: "www.menelik2hospital.gov.et",
        },
    },
    Hospital {
        id: "jimma-university",
        name: "Jimma University Medical Center",
        location: "Jimma, Oromia, Ethiopia",
        specialties: &["Rural Health", "Public Health", "Family Medicine"],
        established: "1983",
        beds: "450+",
        departments: &[
            "Community Health",
            "Rural Medicine",
            "General Surgery",
            "Internal Medicine",
            "Pediatrics",
            "Obstetrics & Gynecology",
            "Public Health",
            "Family Medicine",
            "Emergency Medicine",
            "Radiology",
        ],
        achievements: &[
            "Leading rural health research center",
            "Community-based medical education",
            "Public health initiatives",
            "Rural health extension programs",
            "International health partnerships",
        ],
        services: &[
            ("Rural Health", "Community-based healthcare delivery"),
            ("Medical Education", "Training healthcare workers for rural areas"),
            ("General Medicine", "Comprehensive medical services"),
            ("Emergency Care", "24/7 emergency medical services"),
            ("Public Health", "Community health education and prevention"),
        ],
        contact: HospitalContact {
            phone: "+251 47 111 2000",
            emergency: "+251 47 111 2001",
            email: "info@ju.edu.et",
            website: "www.ju.edu.et",
        },
    },
    Hospital {
        id: "hawassa-university",
        name: "Hawassa University Referral Hospital",
        location: "Hawassa, Sidama, Ethiopia",
        specialties: &["Maternal Health", "Surgery", "Dental"],
        established: "1986",
        beds: "300+",
        departments: &[
            "General Surgery",
            "Internal Medicine",
            "Pediatrics",
            "Obstetrics & Gynecology",
            "Emergency Medicine",
            "Radiology",
            "Laboratory",
            "Pharmacy",
            "Dental Services",
        ],
        achievements: &[
            "Regional referral center for SNNPR",
            "University teaching hospital",
            "Maternal and child health excellence",
            "Community health programs",
            "Medical research initiatives",
        ],
        services: &[
            ("Regional Care", "Referral services for southern Ethiopia"),
            ("Maternal Health", "Comprehensive maternal and child care"),
            ("Medical Education", "Training medical professionals"),
            ("Emergency Services", "24/7 emergency medical care"),
            ("Specialized Care", "Surgery and internal medicine specialties"),
        ],
        contact: HospitalContact {
            phone: "+251 46 220 4000",
            emergency: "+251 46 220 4001",
            email: "info@hu.edu.et",
            website: "www.hu.edu.et",
        },
    },
    Hospital {
        id: "gondar-university",
        name: "Gondar University Hospital",
        location: "Gondar, Amhara, Ethiopia",
        specialties: &["General Medicine", "Surgery", "Dental"],
        established: "1954",
        beds: "400+",
        departments: &[
            "General Medicine",
            "General Surgery",
            "Pediatrics",
            "Obstetrics & Gynecology",
            "Dentistry",
            "Emergency Medicine",
            "Radiology",
            "Laboratory",
            "Pharmacy",
            "Physical Therapy",
        ],
        achievements: &[
            "Historic university hospital in northern Ethiopia",
            "Leading medical education center",
            "Regional healthcare leader",
            "Community health outreach programs",
            "Medical research and training",
        ],
        services: &[
            ("General Medicine", "Comprehensive medical services"),
            ("Surgical Services", "General and specialized surgery"),
            ("Dental Care", "Complete dental and oral health services"),
            ("Emergency Care", "24/7 emergency medical services"),
            ("Medical Education", "Training future healthcare professionals"),
        ],
        contact: HospitalContact {
            phone: "+251 58 114 1000",
            emergency: "+251 58 114 1001",
            email: "info@uog.edu.et",
            website: "www.uog.edu.et",
        },
    },
];

pub fn find_hospital(id: &str) -> Option<&'static Hospital> {
    HOSPITALS.iter().find(|h| h.id == id)
}

pub fn emergency_contact(id: &str) -> Option<&'static str> {
    find_hospital(id).map(|h| h.contact.emergency)
}

/// `tel:` link with whitespace stripped.
pub fn tel_link(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{digits}")
}

pub fn booking_link(id: &str) -> String {
    format!("appointment-booking.html?hospital={id}")
}

// ═══════════════════════════════════════════
// Card search and filter
// ═══════════════════════════════════════════

/// Cards whose name, location or specialty tags contain `term`,
/// case-insensitively. An empty term keeps every card.
pub fn search_hospitals(term: &str) -> Vec<&'static Hospital> {
    let needle = term.to_lowercase();
    HOSPITALS
        .iter()
        .filter(|h| {
            let haystack = format!("{} {} {}", h.name, h.location, h.specialties.join(" ")).to_lowercase();
            haystack.contains(&needle)
        })
        .collect()
}

/// Cards tagged with `specialty` (exact tag, any case). `"all"` keeps
/// every card.
pub fn filter_by_specialty(specialty: &str) -> Vec<&'static Hospital> {
    if specialty == "all" {
        return HOSPITALS.iter().collect();
    }
    let wanted = specialty.to_lowercase();
    HOSPITALS
        .iter()
        .filter(|h| h.specialties.iter().any(|s| s.to_lowercase() == wanted))
        .collect()
}

// ═══════════════════════════════════════════
// Detail view and comparison
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct HospitalDetail {
    pub hospital: &'static Hospital,
    pub phone_link: String,
    pub emergency_link: String,
    pub email_link: String,
    pub website_url: String,
    pub booking_link: String,
    pub referral_link: &'static str,
}

pub fn hospital_detail(id: &str) -> Option<HospitalDetail> {
    let hospital = find_hospital(id)?;
    Some(HospitalDetail {
        hospital,
        phone_link: tel_link(hospital.contact.phone),
        emergency_link: tel_link(hospital.contact.emergency),
        email_link: format!("mailto:{}", hospital.contact.email),
        website_url: format!("https://{}", hospital.contact.website),
        booking_link: booking_link(hospital.id),
        referral_link: "contact.html",
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonColumn {
    pub name: String,
    pub established: String,
    pub beds: String,
    pub emergency_contact: String,
    /// First few departments, with `...` when more exist.
    pub key_specialties: String,
}

impl From<&Hospital> for ComparisonColumn {
    fn from(h: &Hospital) -> Self {
        let mut key_specialties = h
            .departments
            .iter()
            .take(KEY_SPECIALTY_COUNT)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if h.departments.len() > KEY_SPECIALTY_COUNT {
            key_specialties.push_str("...");
        }
        Self {
            name: h.name.to_string(),
            established: h.established.to_string(),
            beds: h.beds.to_string(),
            emergency_contact: h.contact.emergency.to_string(),
            key_specialties,
        }
    }
}

/// Side-by-side columns for the selected hospitals. Unknown ids are
/// skipped; fewer than two known hospitals is an error.
pub fn compare_hospitals(ids: &[&str]) -> Result<Vec<ComparisonColumn>, DirectoryError> {
    let columns: Vec<ComparisonColumn> = ids
        .iter()
        .filter_map(|id| find_hospital(id))
        .map(ComparisonColumn::from)
        .collect();
    if columns.len() < 2 {
        return Err(DirectoryError::TooFewToCompare);
    }
    Ok(columns)
}

// ═══════════════════════════════════════════
// Emergency hand-off
// ═══════════════════════════════════════════

/// Context left for the booking page under `emergencyAppointment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAppointment {
    pub hospital: String,
    pub hospital_id: String,
    pub is_emergency: bool,
    pub timestamp: String,
    pub emergency_contact: String,
}

/// Save the emergency context and return the booking page link to
/// navigate to.
pub fn book_emergency_appointment(
    store: &LocalStore,
    id: &str,
    now: DateTime<Utc>,
) -> Result<String, DirectoryError> {
    let hospital = find_hospital(id).ok_or_else(|| DirectoryError::UnknownHospital(id.to_string()))?;
    let context = EmergencyAppointment {
        hospital: hospital.name.to_string(),
        hospital_id: hospital.id.to_string(),
        is_emergency: true,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        emergency_contact: hospital.contact.emergency.to_string(),
    };
    store.save(keys::EMERGENCY_APPOINTMENT, &context);
    tracing::info!(hospital = id, "Emergency appointment context saved");
    Ok(format!("{}&emergency=true", booking_link(hospital.id)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::booking::BookingPrefill;

    fn ids(hospitals: Vec<&Hospital>) -> Vec<&'static str> {
        hospitals.into_iter().map(|h| h.id).collect()
    }

    #[test]
    fn ids_are_unique() {
        for (i, h) in HOSPITALS.iter().enumerate() {
            assert!(HOSPITALS[i + 1..].iter().all(|o| o.id != h.id), "{} repeated", h.id);
        }
    }

    #[test]
    fn search_covers_name_location_and_tags() {
        assert_eq!(ids(search_hospitals("black lion")), vec!["tikur-anbessa"]);
        assert_eq!(ids(search_hospitals("JIMMA")), vec!["jimma-university"]);
        assert_eq!(ids(search_hospitals("neurosurgery")), vec!["st-pauls"]);
        assert_eq!(search_hospitals("addis ababa").len(), 4);
        assert_eq!(search_hospitals("").len(), HOSPITALS.len());
        assert!(search_hospitals("nairobi").is_empty());
    }

    #[test]
    fn specialty_filter_matches_whole_tags() {
        assert_eq!(filter_by_specialty("all").len(), HOSPITALS.len());
        assert_eq!(ids(filter_by_specialty("emergency")), vec!["tikur-anbessa", "st-pauls", "menelik-ii"]);
        assert_eq!(ids(filter_by_specialty("Dental")), vec!["hawassa-university", "gondar-university"]);
        // "Surgery" does not match "Cardiac Surgery".
        assert!(!ids(filter_by_specialty("surgery")).contains(&"st-pauls"));
        assert!(filter_by_specialty("podiatry").is_empty());
    }

    #[test]
    fn emergency_contact_lookup() {
        assert_eq!(emergency_contact("menelik-ii"), Some("+251 11 557 7001"));
        assert_eq!(emergency_contact("unknown"), None);
    }

    #[test]
    fn detail_links() {
        let detail = hospital_detail("st-pauls").unwrap();
        assert_eq!(detail.phone_link, "tel:+251115516000");
        assert_eq!(detail.emergency_link, "tel:+251115516001");
        assert_eq!(detail.email_link, "mailto:info@sphmmc.edu.et");
        assert_eq!(detail.website_url, "https://www.sphmmc.edu.et");
        assert_eq!(detail.booking_link, "appointment-booking.html?hospital=st-pauls");
        assert!(hospital_detail("nowhere").is_none());
    }

    #[test]
    fn compare_needs_two_known_hospitals() {
        assert_eq!(compare_hospitals(&["st-pauls"]), Err(DirectoryError::TooFewToCompare));
        assert_eq!(
            compare_hospitals(&["st-pauls", "unknown"]).unwrap_err().to_string(),
            MSG_COMPARE_MIN
        );

        let columns = compare_hospitals(&["menelik-ii", "bogus", "yekatit-12"]).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "Menelik II Referral Hospital");
        assert_eq!(columns[0].beds, "200+");
        assert_eq!(
            columns[0].key_specialties,
            "Emergency Department, General Surgery, Internal Medicine..."
        );
        assert_eq!(columns[1].emergency_contact, "+251 11 553 2001");
    }

    #[test]
    fn emergency_booking_saves_context_and_links_to_booking() {
        let store = LocalStore::in_memory();
        let now = Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap();
        let link = book_emergency_appointment(&store, "tikur-anbessa", now).unwrap();
        assert_eq!(link, "appointment-booking.html?hospital=tikur-anbessa&emergency=true");

        let saved: EmergencyAppointment = store.load(keys::EMERGENCY_APPOINTMENT).unwrap();
        assert_eq!(saved.hospital, "Black Lion Hospital (Tikur Anbessa)");
        assert_eq!(saved.hospital_id, "tikur-anbessa");
        assert!(saved.is_emergency);
        assert_eq!(saved.timestamp, "2025-09-14T08:30:00.000Z");
        assert_eq!(saved.emergency_contact, "+251 11 276 1111");

        let raw: serde_json::Value = store.load(keys::EMERGENCY_APPOINTMENT).unwrap();
        assert_eq!(raw["hospitalId"], "tikur-anbessa");

        let query = link.split_once('?').map(|(_, q)| q).unwrap();
        let prefill = BookingPrefill::from_query(query);
        assert_eq!(prefill.hospital.as_deref(), Some("tikur-anbessa"));
        assert!(prefill.emergency);
    }

    #[test]
    fn emergency_booking_unknown_hospital_saves_nothing() {
        let store = LocalStore::in_memory();
        let err = book_emergency_appointment(&store, "nowhere", Utc::now()).unwrap_err();
        assert_eq!(err, DirectoryError::UnknownHospital("nowhere".into()));
        assert!(!store.contains(keys::EMERGENCY_APPOINTMENT));
    }
}
