//! Storage keys shared with the site's existing `localStorage` data.

pub const THEME: &str = "theme";
pub const HIGH_CONTRAST: &str = "highContrast";
pub const BOOKING_DATA: &str = "bookingData";
pub const AUTO_SAVE_BOOKING: &str = "autoSaveBooking";
pub const MEDICATIONS: &str = "medications";
pub const EMERGENCY_CONTACTS: &str = "emergencyContacts";
pub const HEALTH_DATA: &str = "healthData";
pub const COMMUNITY_STORIES: &str = "communityStories";
pub const CONTACT_INQUIRIES: &str = "contactInquiries";
pub const SUPPORT_TICKETS: &str = "supportTickets";
pub const HEALTH_BOOKMARKS: &str = "healthBookmarks";
pub const NAV_STATE: &str = "nav_state";
/// Queued offline bookings, drained by the worker's appointment sync.
pub const OFFLINE_APPOINTMENTS: &str = "offlineAppointments";
/// Hospital emergency hand-off context read by the booking page.
pub const EMERGENCY_APPOINTMENT: &str = "emergencyAppointment";

pub const ALL: &[&str] = &[
    THEME,
    HIGH_CONTRAST,
    BOOKING_DATA,
    AUTO_SAVE_BOOKING,
    MEDICATIONS,
    EMERGENCY_CONTACTS,
    HEALTH_DATA,
    COMMUNITY_STORIES,
    CONTACT_INQUIRIES,
    SUPPORT_TICKETS,
    HEALTH_BOOKMARKS,
    NAV_STATE,
    OFFLINE_APPOINTMENTS,
    EMERGENCY_APPOINTMENT,
];
