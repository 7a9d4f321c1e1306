//! Contact page: inquiry form, support tickets, FAQ search and the support
//! chat responder.
//!
//! Inquiries never leave the device. Each accepted submission is appended
//! to `contactInquiries` and mirrored as an open ticket in `supportTickets`.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{keys, LocalStore};
use crate::validation::{self, FieldKind, FormField, ValidationReport};

pub const MESSAGE_MIN_LENGTH: usize = 10;
pub const SUPPORT_LINE: &str = "+254 700 000 000";

pub const PARTNERSHIP_TEMPLATE: &str = "I am interested in exploring partnership opportunities with HealthConnect. Please provide more information about how we can collaborate to bring mobile health services to underserved communities.\n\nOrganization: \nType of Partnership: \nContact Person: \nAdditional Details: ";

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Validation failed for {} field(s)", .0.errors.len())]
    Validation(ValidationReport),
}

// ═══════════════════════════════════════════
// Inquiry form
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub inquiry_type: String,
    pub message: String,
    /// "Send me updates" checkbox.
    #[serde(default)]
    pub updates: bool,
}

impl ContactForm {
    /// Form pre-filled from the partnership modal.
    pub fn partnership_template() -> Self {
        Self {
            inquiry_type: "partnership".into(),
            message: PARTNERSHIP_TEMPLATE.into(),
            ..Self::default()
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::required("name", FieldKind::Text, &self.name),
            FormField::required("email", FieldKind::Email, &self.email),
            FormField::new("phone", FieldKind::Phone, &self.phone),
            FormField::required("inquiryType", FieldKind::Choice, &self.inquiry_type),
            FormField::required("message", FieldKind::TextArea, &self.message)
                .with_min_length(MESSAGE_MIN_LENGTH),
        ]
    }

    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.fields())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub inquiry_type: String,
    pub message: String,
    pub updates: bool,
    pub timestamp: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    High,
    Medium,
    Low,
}

/// Ticket priority for an inquiry type; unknown types are low.
pub fn determine_priority(inquiry_type: &str) -> TicketPriority {
    match inquiry_type {
        "emergency" | "clinic-request" => TicketPriority::High,
        "booking" | "technical" | "partnership" => TicketPriority::Medium,
        _ => TicketPriority::Low,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    pub inquiry_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub inquiry_type: String,
    pub message: String,
    pub updates: bool,
    pub timestamp: String,
    pub status: String,
    pub priority: TicketPriority,
    pub created_at: String,
}

impl SupportTicket {
    pub fn open(inquiry: &ContactInquiry, id: String) -> Self {
        Self {
            id,
            inquiry_id: inquiry.id.clone(),
            name: inquiry.name.clone(),
            email: inquiry.email.clone(),
            phone: inquiry.phone.clone(),
            inquiry_type: inquiry.inquiry_type.clone(),
            message: inquiry.message.clone(),
            updates: inquiry.updates,
            timestamp: inquiry.timestamp.clone(),
            status: "open".into(),
            priority: determine_priority(&inquiry.inquiry_type),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// `INQ` + epoch millis + a random number below 1000.
pub fn generate_inquiry_id<R: Rng + ?Sized>(epoch_millis: i64, rng: &mut R) -> String {
    format!("INQ{epoch_millis}{}", rng.gen_range(0..1000))
}

/// `HC` + last six digits of epoch millis + two random digits.
pub fn generate_ticket_id<R: Rng + ?Sized>(epoch_millis: i64, rng: &mut R) -> String {
    let millis = epoch_millis.to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    format!("HC{tail}{:02}", rng.gen_range(0..100))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactReceipt {
    pub inquiry: ContactInquiry,
    pub ticket: SupportTicket,
}

pub struct ContactDesk {
    store: LocalStore,
    delay: Duration,
}

impl ContactDesk {
    pub fn new(store: LocalStore, delay: Duration) -> Self {
        Self { store, delay }
    }

    /// Validate, wait out the simulated send, then record inquiry and ticket.
    pub async fn submit(&self, form: &ContactForm) -> Result<ContactReceipt, ContactError> {
        let report = form.validate();
        if !report.is_valid() {
            return Err(ContactError::Validation(report));
        }
        tokio::time::sleep(self.delay).await;

        let now = Utc::now();
        let (inquiry_id, ticket_id) = {
            let mut rng = rand::thread_rng();
            (
                generate_inquiry_id(now.timestamp_millis(), &mut rng),
                generate_ticket_id(now.timestamp_millis(), &mut rng),
            )
        };

        let inquiry = ContactInquiry {
            id: inquiry_id,
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            inquiry_type: form.inquiry_type.clone(),
            message: form.message.clone(),
            updates: form.updates,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            status: "pending".into(),
        };
        let ticket = SupportTicket::open(&inquiry, ticket_id);

        let mut inquiries: Vec<ContactInquiry> = self.store.load_or_default(keys::CONTACT_INQUIRIES);
        inquiries.push(inquiry.clone());
        self.store.save(keys::CONTACT_INQUIRIES, &inquiries);

        let mut tickets: Vec<SupportTicket> = self.store.load_or_default(keys::SUPPORT_TICKETS);
        tickets.push(ticket.clone());
        self.store.save(keys::SUPPORT_TICKETS, &tickets);

        tracing::info!(inquiry = %inquiry.id, ticket = %ticket.id, priority = ?ticket.priority, "Contact inquiry recorded");
        Ok(ContactReceipt { inquiry, ticket })
    }

    pub fn inquiries(&self) -> Vec<ContactInquiry> {
        self.store.load_or_default(keys::CONTACT_INQUIRIES)
    }

    pub fn tickets(&self) -> Vec<SupportTicket> {
        self.store.load_or_default(keys::SUPPORT_TICKETS)
    }
}

// ═══════════════════════════════════════════
// FAQ and chat
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Indices of FAQ items whose question or answer mentions `term`.
pub fn search_faq(items: &[FaqItem], term: &str) -> Vec<usize> {
    let term = term.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.question.to_lowercase().contains(&term) || item.answer.to_lowercase().contains(&term)
        })
        .map(|(i, _)| i)
        .collect()
}

struct KnowledgeEntry {
    keywords: &'static [&'static str],
    response: &'static str,
}

const KNOWLEDGE_BASE: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        keywords: &["book", "appointment", "schedule", "reserve"],
        response: "To book an appointment, visit our booking page where you can select your preferred service, clinic location, and time slot. The process takes just a few minutes!",
    },
    KnowledgeEntry {
        keywords: &["location", "clinic", "where", "find", "near"],
        response: "We have mobile clinics serving communities across Kenya. Check our Clinic Locations page to see schedules and find the nearest clinic to you.",
    },
    KnowledgeEntry {
        keywords: &["service", "treatment", "care", "what", "do"],
        response: "We offer general checkups, vaccinations, maternal care, child health, emergency care, mental health support, and nutrition counseling.",
    },
    KnowledgeEntry {
        keywords: &["emergency", "urgent", "help", "crisis"],
        response: "For emergencies, call 911 or 999. For health emergencies, call +254 719 000 000. Our emergency contacts are also listed on the contact page.",
    },
];

/// First knowledge-base entry with a keyword contained in `message`.
pub fn search_knowledge_base(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    KNOWLEDGE_BASE
        .iter()
        .find(|e| e.keywords.iter().any(|k| lower.contains(k)))
        .map(|e| e.response)
}

/// Support chat reply, matched on keywords in order.
pub fn chat_reply(user_message: &str) -> String {
    let m = user_message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| m.contains(w));

    let reply = if has(&["appointment", "book"]) {
        "I can help you book an appointment! You can use our online booking system or I can transfer you to a booking specialist. Would you like me to guide you through the booking process?"
    } else if has(&["clinic", "location"]) {
        "You can find all our mobile clinic locations and schedules on our 'Clinic Locations' page. We serve communities across Kenya including Nairobi, Turkana, Narok, and Kisumu counties. Which area are you interested in?"
    } else if has(&["emergency", "urgent"]) {
        "For medical emergencies, please call 911 or 999 immediately. For urgent but non-life-threatening issues, you can call our health emergency line at +254 719 000 000. How can I help you further?"
    } else if has(&["service", "what"]) {
        "Our mobile clinics provide general checkups, vaccinations, maternal care, child health services, emergency care, mental health support, and nutrition counseling. Services vary by location. What specific service are you looking for?"
    } else if has(&["cost", "price", "fee"]) {
        "Many of our basic health services are provided free of charge or at subsidized rates. Some specialized services may have minimal fees. We accept cash, mobile money, and health insurance. Would you like more information about specific services?"
    } else if has(&["hello", "hi", "help"]) {
        "Hello! I'm here to help you with information about our mobile health clinic services. I can assist with booking appointments, finding clinic locations, or answering questions about our services. What would you like to know?"
    } else if has(&["thanks", "thank you"]) {
        "You're welcome! Is there anything else I can help you with today? I'm here to assist with any questions about our mobile health clinic services."
    } else {
        return format!(
            "I understand you're asking about: '{user_message}'. Let me connect you with a human agent who can provide more detailed assistance. In the meantime, you can also check our FAQ section or call our support line at {SUPPORT_LINE}."
        );
    };
    reply.to_string()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Fatuma Hassan".into(),
            email: "fatuma@example.com".into(),
            phone: "".into(),
            inquiry_type: "clinic-request".into(),
            message: "Please bring a clinic to Garissa.".into(),
            updates: true,
        }
    }

    #[test]
    fn message_needs_ten_characters() {
        let form = ContactForm {
            message: "Hi there".into(),
            ..valid_form()
        };
        let report = form.validate();
        assert_eq!(
            report.message_for("message"),
            Some("Please provide more details (at least 10 characters)")
        );
    }

    #[test]
    fn optional_phone_checked_when_present() {
        assert!(valid_form().validate().is_valid());
        let form = ContactForm {
            phone: "12".into(),
            ..valid_form()
        };
        assert_eq!(form.validate().message_for("phone"), Some(validation::MSG_PHONE));
    }

    #[test]
    fn priority_map() {
        assert_eq!(determine_priority("emergency"), TicketPriority::High);
        assert_eq!(determine_priority("clinic-request"), TicketPriority::High);
        assert_eq!(determine_priority("booking"), TicketPriority::Medium);
        assert_eq!(determine_priority("technical"), TicketPriority::Medium);
        assert_eq!(determine_priority("partnership"), TicketPriority::Medium);
        assert_eq!(determine_priority("feedback"), TicketPriority::Low);
        assert_eq!(determine_priority("anything-else"), TicketPriority::Low);
    }

    #[test]
    fn id_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let ticket = generate_ticket_id(1_757_412_345_678, &mut rng);
        assert!(Regex::new(r"^HC345678\d{2}$").unwrap().is_match(&ticket), "{ticket}");
        let inquiry = generate_inquiry_id(1_757_412_345_678, &mut rng);
        assert!(Regex::new(r"^INQ1757412345678\d{1,3}$").unwrap().is_match(&inquiry), "{inquiry}");
    }

    #[tokio::test]
    async fn submit_records_inquiry_and_ticket() {
        let store = LocalStore::in_memory();
        let desk = ContactDesk::new(store, Duration::ZERO);
        let receipt = desk.submit(&valid_form()).await.unwrap();

        assert_eq!(receipt.inquiry.status, "pending");
        assert_eq!(receipt.ticket.status, "open");
        assert_eq!(receipt.ticket.priority, TicketPriority::High);
        assert_eq!(receipt.ticket.inquiry_id, receipt.inquiry.id);
        assert_eq!(desk.inquiries(), vec![receipt.inquiry.clone()]);
        assert_eq!(desk.tickets().len(), 1);
    }

    #[tokio::test]
    async fn invalid_submission_saves_nothing() {
        let desk = ContactDesk::new(LocalStore::in_memory(), Duration::ZERO);
        let form = ContactForm {
            email: "nope".into(),
            ..valid_form()
        };
        assert!(matches!(desk.submit(&form).await, Err(ContactError::Validation(_))));
        assert!(desk.inquiries().is_empty());
    }

    #[test]
    fn stored_inquiry_is_camel_case() {
        let inquiry = ContactInquiry {
            id: "INQ1".into(),
            name: "A".into(),
            email: "a@b.co".into(),
            phone: String::new(),
            inquiry_type: "general".into(),
            message: "m".into(),
            updates: false,
            timestamp: "2025-09-01T00:00:00.000Z".into(),
            status: "pending".into(),
        };
        let json = serde_json::to_value(&inquiry).unwrap();
        assert_eq!(json["inquiryType"], "general");
    }

    #[test]
    fn faq_search_matches_question_or_answer() {
        let items = vec![
            FaqItem {
                question: "Are services free?".into(),
                answer: "Most basic care is free.".into(),
            },
            FaqItem {
                question: "How do I book?".into(),
                answer: "Use the booking page.".into(),
            },
        ];
        assert_eq!(search_faq(&items, "FREE"), vec![0]);
        assert_eq!(search_faq(&items, "booking"), vec![1]);
        assert!(search_faq(&items, "insurance").is_empty());
    }

    #[test]
    fn knowledge_base_first_match_wins() {
        assert!(search_knowledge_base("Can I reserve a slot?").unwrap().contains("booking page"));
        assert!(search_knowledge_base("crisis").unwrap().contains("911"));
        assert!(search_knowledge_base("xyz").is_none());
    }

    #[test]
    fn chat_reply_keywords() {
        assert!(chat_reply("I want to BOOK").starts_with("I can help you book"));
        assert!(chat_reply("How much is the fee?").contains("free of charge"));
        assert!(chat_reply("thank you").starts_with("You're welcome"));
        let fallback = chat_reply("zzz");
        assert!(fallback.contains("'zzz'"));
        assert!(fallback.contains(SUPPORT_LINE));
    }
}
