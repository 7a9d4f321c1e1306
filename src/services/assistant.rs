//! Health assistant chat: canned replies keyed on the exact (lowercased)
//! message, delivered after a short simulated typing delay.

use std::time::Duration;

use serde::Serialize;

pub const GREETING: &str = "Hi! I'm your health assistant. How can I help you today?";

const DEFAULT_REPLY: &str = "I understand you need help with that. You can explore our services or <a href=\"/contact.html\">contact our support team</a> for personalized assistance.";

const CANNED_REPLIES: &[(&str, &str)] = &[
    (
        "find nearby clinics",
        "I can help you find nearby clinics! <a href=\"/clinic-locations.html\">Click here</a> to see all available locations.",
    ),
    (
        "book appointment",
        "Ready to book an appointment? <a href=\"/appointment-booking.html\">Let's get started!</a>",
    ),
    (
        "emergency help",
        "🚨 For emergencies, call 911 immediately. For non-emergency health concerns, <a href=\"/contact.html\">contact us here</a>.",
    ),
];

/// Buttons under the greeting: label and the message they send.
pub const QUICK_ACTIONS: &[(&str, &str)] = &[
    ("Find Clinics", "Find nearby clinics"),
    ("Book Appointment", "Book appointment"),
    ("Emergency", "Emergency help"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// Reply for `message`; anything not in the table gets the default.
pub fn reply_for(message: &str) -> &'static str {
    let key = message.trim().to_lowercase();
    CANNED_REPLIES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_REPLY)
}

pub struct Assistant {
    delay: Duration,
    transcript: Vec<ChatMessage>,
}

impl Assistant {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            transcript: vec![ChatMessage {
                sender: Sender::Bot,
                text: GREETING.to_string(),
            }],
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Post a user message and wait for the bot. Blank input is ignored.
    pub async fn send(&mut self, message: &str) -> Option<ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage {
            sender: Sender::User,
            text: message.to_string(),
        });

        tokio::time::sleep(self.delay).await;

        let reply = ChatMessage {
            sender: Sender::Bot,
            text: reply_for(message).to_string(),
        };
        self.transcript.push(reply.clone());
        Some(reply)
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}
