//! Site-wide search over a static page index.

use serde::Serialize;

pub const MIN_QUERY_LEN: usize = 2;
pub const NO_RESULTS: &str = "No results found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Service,
    Tool,
    Content,
    Contact,
}

impl EntryType {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Service => "🏥",
            Self::Tool => "🛠️",
            Self::Content => "📖",
            Self::Contact => "📞",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Tool => "tool",
            Self::Content => "content",
            Self::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub title: &'static str,
    pub url: &'static str,
    pub kind: EntryType,
}

pub const SEARCH_INDEX: &[SearchEntry] = &[
    SearchEntry { title: "Find Nearby Clinics", url: "/clinic-locations.html", kind: EntryType::Service },
    SearchEntry { title: "Book Appointment", url: "/appointment-booking.html", kind: EntryType::Service },
    SearchEntry { title: "Health Tools", url: "/health-tools.html", kind: EntryType::Tool },
    SearchEntry { title: "Community Stories", url: "/community-stories.html", kind: EntryType::Content },
    SearchEntry { title: "Emergency Contact", url: "/contact.html", kind: EntryType::Contact },
    SearchEntry { title: "Health Blog", url: "/health-blog.html", kind: EntryType::Content },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Query too short; the results panel stays hidden.
    Hidden,
    Empty { message: &'static str },
    Results { entries: Vec<SearchEntry> },
}

/// Case-insensitive title match over the index.
pub fn search(query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return SearchOutcome::Hidden;
    }
    let needle = query.to_lowercase();
    let entries: Vec<SearchEntry> = SEARCH_INDEX
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&needle))
        .copied()
        .collect();
    if entries.is_empty() {
        SearchOutcome::Empty { message: NO_RESULTS }
    } else {
        SearchOutcome::Results { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(outcome: SearchOutcome) -> Vec<&'static str> {
        match outcome {
            SearchOutcome::Results { entries } => entries.iter().map(|e| e.title).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn short_query_hidden() {
        assert_eq!(search("h"), SearchOutcome::Hidden);
        assert_eq!(search("  b  "), SearchOutcome::Hidden);
    }

    #[test]
    fn case_insensitive_title_match() {
        assert_eq!(titles(search("HEALTH")), vec!["Health Tools", "Health Blog"]);
        assert_eq!(titles(search("book")), vec!["Book Appointment"]);
    }

    #[test]
    fn no_match_reports_empty() {
        assert_eq!(search("dentist"), SearchOutcome::Empty { message: NO_RESULTS });
    }

    #[test]
    fn icons_per_type() {
        assert_eq!(EntryType::Service.icon(), "🏥");
        assert_eq!(EntryType::Contact.as_str(), "contact");
    }
}
