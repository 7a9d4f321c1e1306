//! Review summary, confirmation code and the downloadable confirmation.
//!
//! Everything here is derived from the `BookingDraft` alone.

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{self, convert_to_12_hour};
use super::draft::BookingDraft;

pub const CANCELLATION_PHONE: &str = "+254 700 000 000";
pub const EMERGENCY_PHONE: &str = "+254 719 000 000";
pub const SUPPORT_EMAIL: &str = "support@healthconnect.co.ke";

/// Read-only summary shown on the review screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub clinic: String,
    pub datetime: String,
    pub priority: String,
}

/// Snapshot produced by a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    pub confirmation_number: String,
    pub summary: ReviewSummary,
    pub draft: BookingDraft,
    pub generated_at: NaiveDateTime,
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `2025-09-15` → `September 15, 2025`; anything unparsable passes through.
fn long_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

pub fn build_review_summary(draft: &BookingDraft) -> ReviewSummary {
    let field = |name: &str| draft.value(name).unwrap_or_default().trim().to_string();

    let name = format!("{} {}", field("firstName"), field("lastName"))
        .trim()
        .to_string();

    let service = draft
        .value("service")
        .map(|id| catalog::find_service(id).map_or(id.to_string(), |s| s.title.to_string()))
        .unwrap_or_default();

    let clinic = draft.value("clinic").and_then(catalog::find_clinic);
    let time = draft.value("selectedTime");
    let datetime = match (clinic, time) {
        (Some(c), Some(t)) => format!(
            "{} at {}",
            long_date(c.date),
            convert_to_12_hour(t).unwrap_or_else(|| t.to_string())
        ),
        (Some(c), None) => long_date(c.date),
        _ => String::new(),
    };

    ReviewSummary {
        name,
        email: field("email"),
        phone: field("phone"),
        service,
        clinic: clinic.map(|c| c.name.to_string()).unwrap_or_default(),
        datetime,
        priority: capitalize(&field("priority")),
    }
}

/// `HC` + `YYMMDD` + random three digits. No collision check.
pub fn generate_confirmation_code<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(0..1000);
    format!("HC{}{suffix:03}", date.format("%y%m%d"))
}

pub fn confirmation_file_name(record: &ConfirmationRecord) -> String {
    format!("HealthConnect_Confirmation_{}.txt", record.confirmation_number)
}

/// Plain-text confirmation offered for download.
pub fn render_confirmation_text(record: &ConfirmationRecord) -> String {
    let s = &record.summary;
    let mut out = String::new();
    out.push_str("HEALTHCONNECT APPOINTMENT CONFIRMATION\n\n");
    out.push_str(&format!("Confirmation Number: {}\n", record.confirmation_number));
    out.push_str(&format!(
        "Date Generated: {}\n\n",
        record.generated_at.date().format("%-m/%-d/%Y")
    ));

    out.push_str("PATIENT INFORMATION:\n");
    out.push_str(&format!("Name: {}\n", s.name));
    out.push_str(&format!("Email: {}\n", s.email));
    out.push_str(&format!("Phone: {}\n\n", s.phone));

    out.push_str("APPOINTMENT DETAILS:\n");
    out.push_str(&format!("Service: {}\n", s.service));
    out.push_str(&format!("Clinic: {}\n", s.clinic));
    out.push_str(&format!("Date & Time: {}\n", s.datetime));
    out.push_str(&format!("Priority: {}\n\n", s.priority));

    out.push_str("WHAT TO BRING:\n");
    for item in [
        "Valid identification document",
        "Previous medical records (if available)",
        "List of current medications",
        "Insurance information (if applicable)",
    ] {
        out.push_str(&format!("- {item}\n"));
    }

    out.push_str("\nIMPORTANT NOTES:\n");
    out.push_str("- Arrive 15 minutes before your appointment time\n");
    out.push_str("- Bring this confirmation with you\n");
    out.push_str(&format!("- For cancellations, call {CANCELLATION_PHONE}\n"));
    out.push_str(&format!("- Emergency contact: {EMERGENCY_PHONE}\n\n"));

    out.push_str("Thank you for using HealthConnect!\n");
    out.push_str(&format!("For support: {SUPPORT_EMAIL}\n"));
    out
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    use super::*;

    fn full_draft() -> BookingDraft {
        let mut d = BookingDraft::new();
        d.set("firstName", "Wanjiru");
        d.set("lastName", "Kamau");
        d.set("email", "wanjiru@example.com");
        d.set("phone", "+254 712 345 678");
        d.set("service", "vaccinations");
        d.set("clinic", "kibera");
        d.set("selectedTime", "10:00");
        d.set("priority", "urgent");
        d
    }

    #[test]
    fn summary_comes_from_draft() {
        let s = build_review_summary(&full_draft());
        assert_eq!(s.name, "Wanjiru Kamau");
        assert_eq!(s.service, "Vaccinations");
        assert_eq!(s.clinic, "Kibera Community Center");
        assert_eq!(s.datetime, "September 15, 2025 at 10:00 AM");
        assert_eq!(s.priority, "Urgent");
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let s = build_review_summary(&BookingDraft::new());
        assert_eq!(s.name, "");
        assert_eq!(s.datetime, "");
        assert_eq!(s.priority, "");
    }

    #[test]
    fn code_shape() {
        let re = Regex::new(r"^HC\d{6}\d{3}$").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let code = generate_confirmation_code(date, &mut rng);
            assert!(re.is_match(&code), "{code}");
            assert!(code.starts_with("HC250905"));
        }
    }

    #[test]
    fn confirmation_text_contains_details() {
        let draft = full_draft();
        let record = ConfirmationRecord {
            confirmation_number: "HC250915042".into(),
            summary: build_review_summary(&draft),
            draft,
            generated_at: NaiveDate::from_ymd_opt(2025, 9, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        };
        let text = render_confirmation_text(&record);
        assert!(text.contains("Confirmation Number: HC250915042"));
        assert!(text.contains("Date Generated: 9/1/2025"));
        assert!(text.contains("Clinic: Kibera Community Center"));
        assert!(text.contains("Priority: Urgent"));
        assert_eq!(
            confirmation_file_name(&record),
            "HealthConnect_Confirmation_HC250915042.txt"
        );
    }
}
