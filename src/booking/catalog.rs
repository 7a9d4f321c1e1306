//! Static booking catalog: services, mobile-clinic visits, time slots and
//! the per-clinic unavailable-slot table.
//!
//! Availability is hardcoded. Nothing here is sourced from a live system.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    /// Keyword matched against a clinic's service list.
    pub clinic_keyword: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Active,
    Upcoming,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Clinic {
    pub id: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lng: f64,
    /// Visit date, YYYY-MM-DD.
    pub date: &'static str,
    pub hours: &'static str,
    pub status: VisitStatus,
    pub services: &'static [&'static str],
    /// Display labels for the service tags.
    pub service_names: &'static [&'static str],
}

impl Clinic {
    pub fn offers(&self, service: &Service) -> bool {
        self.services.contains(&service.clinic_keyword)
    }
}

pub const SERVICES: &[Service] = &[
    Service { id: "general-checkup", title: "General Checkup", clinic_keyword: "general" },
    Service { id: "vaccinations", title: "Vaccinations", clinic_keyword: "vaccinations" },
    Service { id: "maternal-care", title: "Maternal Care", clinic_keyword: "maternal" },
    Service { id: "child-health", title: "Child Health", clinic_keyword: "child" },
    Service { id: "emergency-care", title: "Emergency Care", clinic_keyword: "emergency" },
    Service { id: "mental-health", title: "Mental Health", clinic_keyword: "mental" },
];

pub const CLINICS: &[Clinic] = &[
    Clinic {
        id: "kibera",
        name: "Kibera Community Center",
        address: "Kibera, Nairobi County, Kenya",
        country: "Kenya",
        lat: -1.3129,
        lng: 36.7809,
        date: "2025-09-15",
        hours: "9:00 AM - 4:00 PM",
        status: VisitStatus::Active,
        services: &["general", "vaccinations", "maternal"],
        service_names: &["General Checkup", "Vaccinations", "Maternal Care", "Health Screening"],
    },
    Clinic {
        id: "masai-mara",
        name: "Masai Mara Village Hall",
        address: "Masai Mara, Narok County, Kenya",
        country: "Kenya",
        lat: -1.4167,
        lng: 35.0,
        date: "2025-09-18",
        hours: "8:00 AM - 3:00 PM",
        status: VisitStatus::Upcoming,
        services: &["child", "general", "nutrition"],
        service_names: &["Child Health", "General Checkup", "Nutrition Counseling", "First Aid"],
    },
    Clinic {
        id: "turkana",
        name: "Turkana Health Post",
        address: "Lodwar, Turkana County, Kenya",
        country: "Kenya",
        lat: 3.1190,
        lng: 35.5977,
        date: "2025-09-22",
        hours: "10:00 AM - 5:00 PM",
        status: VisitStatus::Scheduled,
        services: &["emergency", "mental", "nutrition"],
        service_names: &["Emergency Care", "Mental Health", "Nutrition Support", "General Consultation"],
    },
    Clinic {
        id: "kisumu",
        name: "Kisumu Rural Health Center",
        address: "Kisumu County, Kenya",
        country: "Kenya",
        lat: -0.0917,
        lng: 34.7680,
        date: "2025-09-25",
        hours: "9:00 AM - 4:00 PM",
        status: VisitStatus::Scheduled,
        services: &["maternal", "vaccinations", "general"],
        service_names: &["Maternal Care", "Vaccinations", "General Checkup", "Family Planning"],
    },
    Clinic {
        id: "addis-ababa",
        name: "Addis Ababa Community Health Center",
        address: "Bole, Addis Ababa, Ethiopia",
        country: "Ethiopia",
        lat: 9.0054,
        lng: 38.7636,
        date: "2025-09-16",
        hours: "8:00 AM - 4:00 PM",
        status: VisitStatus::Active,
        services: &["general", "maternal", "child"],
        service_names: &["General Health Screening", "Maternal Care", "Child Health", "Immunizations"],
    },
    Clinic {
        id: "kampala",
        name: "Kampala Community Outreach",
        address: "Kawempe, Kampala, Uganda",
        country: "Uganda",
        lat: 0.3476,
        lng: 32.5825,
        date: "2025-09-17",
        hours: "9:00 AM - 5:00 PM",
        status: VisitStatus::Upcoming,
        services: &["general", "maternal", "child"],
        service_names: &["General Checkup", "Maternal Health", "Child Immunization", "Family Planning"],
    },
    Clinic {
        id: "kigali",
        name: "Kigali Community Health Hub",
        address: "Nyarugenge, Kigali, Rwanda",
        country: "Rwanda",
        lat: -1.9441,
        lng: 30.0619,
        date: "2025-09-26",
        hours: "8:00 AM - 4:00 PM",
        status: VisitStatus::Scheduled,
        services: &["general", "maternal", "mental"],
        service_names: &["General Healthcare", "Maternal Services", "Mental Health", "Preventive Care"],
    },
    Clinic {
        id: "juba",
        name: "Juba Health Outreach",
        address: "Juba, Central Equatoria, South Sudan",
        country: "South Sudan",
        lat: 4.8594,
        lng: 31.5713,
        date: "2025-09-28",
        hours: "9:00 AM - 3:00 PM",
        status: VisitStatus::Scheduled,
        services: &["emergency", "general", "child"],
        service_names: &["Emergency Care", "General Health", "Child Health", "Basic Treatment"],
    },
];

/// Bookable slots, in the `data-time` form the booking page uses.
pub const TIME_SLOTS: &[&str] = &[
    "9:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00",
];

pub const PRIORITIES: &[&str] = &["routine", "urgent", "emergency"];

pub fn find_service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.id == id)
}

pub fn find_clinic(id: &str) -> Option<&'static Clinic> {
    CLINICS.iter().find(|c| c.id == id)
}

/// Slots a clinic has already filled.
pub fn unavailable_slots(clinic_id: &str) -> &'static [&'static str] {
    match clinic_id {
        "kibera" => &["16:00"],
        "masai-mara" => &["13:00", "14:00"],
        "turkana" => &["9:00", "15:00"],
        "kisumu" => &["12:00"],
        _ => &[],
    }
}

pub fn is_slot_available(clinic_id: &str, time: &str) -> bool {
    TIME_SLOTS.contains(&time) && !unavailable_slots(clinic_id).contains(&time)
}

/// `"16:00"` → `"4:00 PM"`. `None` for anything that is not `H:MM`.
pub fn convert_to_12_hour(time24: &str) -> Option<String> {
    let (hours, minutes) = time24.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    if hours > 23 || minutes.is_empty() {
        return None;
    }
    let hour12 = if hours % 12 == 0 { 12 } else { hours % 12 };
    let ampm = if hours >= 12 { "PM" } else { "AM" };
    Some(format!("{hour12}:{minutes} {ampm}"))
}

/// Clinic card as shown for the currently selected service.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicView {
    pub id: String,
    pub name: String,
    pub date: String,
    pub hours: String,
    pub visible: bool,
}

pub fn clinic_views(service: Option<&Service>) -> Vec<ClinicView> {
    CLINICS
        .iter()
        .map(|c| ClinicView {
            id: c.id.into(),
            name: c.name.into(),
            date: c.date.into(),
            hours: c.hours.into(),
            visible: service.map_or(true, |s| c.offers(s)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlotView {
    pub time: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

/// Slot buttons for a clinic; filled slots are disabled and labelled
/// `(Full)`.
pub fn time_slot_views(clinic_id: &str, selected: Option<&str>) -> Vec<TimeSlotView> {
    let blocked = unavailable_slots(clinic_id);
    TIME_SLOTS
        .iter()
        .map(|&time| {
            let disabled = blocked.contains(&time);
            let base = convert_to_12_hour(time).unwrap_or_else(|| time.to_string());
            TimeSlotView {
                time: time.into(),
                label: if disabled { format!("{base} (Full)") } else { base },
                disabled,
                selected: !disabled && selected == Some(time),
            }
        })
        .collect()
}
