//! Clinic map: service, location and visit-date filters, free-text
//! search and nearest-clinic lookup over the mobile clinic catalog.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::booking::catalog::{Clinic, CLINICS};
use crate::services::notify::Notice;

/// Filter value that disables a filter.
pub const ANY: &str = "all";
pub const MSG_FILTERS_CLEARED: &str = "Filters cleared successfully";
pub const MSG_LOCATION_UNAVAILABLE: &str =
    "Could not get your location. Please allow location access to find nearby clinics.";

const EARTH_RADIUS_KM: f64 = 6371.0;
const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateWindow {
    /// Select value from the date dropdown; anything unknown means all.
    pub fn parse(value: &str) -> Self {
        match value {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::All,
        }
    }

    /// Whether a visit on `visit` falls in the window starting `today`.
    /// Both ends are inclusive.
    pub fn contains(&self, visit: NaiveDate, today: NaiveDate) -> bool {
        let horizon = match self {
            Self::All => return true,
            Self::Today => return visit == today,
            Self::Week => today + Duration::days(WEEK_DAYS),
            Self::Month => today + Duration::days(MONTH_DAYS),
        };
        visit >= today && visit <= horizon
    }
}

/// Location filter code for a clinic. Clinics outside the mapped
/// counties have none and never match a location filter.
pub fn location_from_clinic_id(id: &str) -> &'static str {
    match id {
        "kibera" => "nairobi",
        "masai-mara" => "narok",
        "turkana" => "turkana",
        "kisumu" => "kisumu",
        _ => "",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicFilters {
    /// Service keyword, e.g. `vaccinations`.
    pub service: String,
    pub date: DateWindow,
    pub location: String,
}

impl Default for ClinicFilters {
    fn default() -> Self {
        Self {
            service: ANY.to_string(),
            date: DateWindow::All,
            location: ANY.to_string(),
        }
    }
}

impl ClinicFilters {
    pub fn matches(&self, clinic: &Clinic, today: NaiveDate) -> bool {
        if self.service != ANY && !clinic.services.contains(&self.service.as_str()) {
            return false;
        }
        if self.location != ANY && location_from_clinic_id(clinic.id) != self.location {
            return false;
        }
        if self.date == DateWindow::All {
            return true;
        }
        NaiveDate::parse_from_str(clinic.date, "%Y-%m-%d")
            .is_ok_and(|visit| self.date.contains(visit, today))
    }
}

/// Visible clinic cards and map markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicListing {
    pub visible: Vec<&'static str>,
    pub no_results: bool,
}

impl ClinicListing {
    fn of(clinics: impl Iterator<Item = &'static Clinic>) -> Self {
        let visible: Vec<&'static str> = clinics.map(|c| c.id).collect();
        Self { no_results: visible.is_empty(), visible }
    }
}

pub fn apply_filters(filters: &ClinicFilters, today: NaiveDate) -> ClinicListing {
    ClinicListing::of(CLINICS.iter().filter(|c| filters.matches(c, today)))
}

/// Text match over name, address and service labels. Search replaces
/// the filters while a term is entered; an empty term re-applies them.
pub fn search_clinics(term: &str, filters: &ClinicFilters, today: NaiveDate) -> ClinicListing {
    if term.is_empty() {
        return apply_filters(filters, today);
    }
    let needle = term.to_lowercase();
    ClinicListing::of(CLINICS.iter().filter(|c| {
        format!("{} {} {}", c.name, c.address, c.service_names.join(" "))
            .to_lowercase()
            .contains(&needle)
    }))
}

/// Filter state behind the clinic map page.
#[derive(Debug, Default)]
pub struct ClinicLocator {
    filters: ClinicFilters,
}

impl ClinicLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &ClinicFilters {
        &self.filters
    }

    pub fn set_service(&mut self, service: &str, today: NaiveDate) -> ClinicListing {
        self.filters.service = service.to_string();
        apply_filters(&self.filters, today)
    }

    pub fn set_date(&mut self, window: &str, today: NaiveDate) -> ClinicListing {
        self.filters.date = DateWindow::parse(window);
        apply_filters(&self.filters, today)
    }

    pub fn set_location(&mut self, location: &str, today: NaiveDate) -> ClinicListing {
        self.filters.location = location.to_string();
        apply_filters(&self.filters, today)
    }

    pub fn search(&self, term: &str, today: NaiveDate) -> ClinicListing {
        search_clinics(term, &self.filters, today)
    }

    /// Reset every filter to `all`.
    pub fn clear(&mut self, today: NaiveDate) -> (ClinicListing, Notice) {
        self.filters = ClinicFilters::default();
        tracing::debug!("Clinic filters cleared");
        (apply_filters(&self.filters, today), Notice::success(MSG_FILTERS_CLEARED))
    }
}

// ═══════════════════════════════════════════
// Distance
// ═══════════════════════════════════════════

/// Great-circle distance in kilometres (haversine).
pub fn calculate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestClinic {
    pub clinic: &'static Clinic,
    pub distance_km: f64,
}

impl NearestClinic {
    pub fn notice(&self) -> Notice {
        Notice::success(format!(
            "Nearest clinic: {} ({} km away)",
            self.clinic.name,
            self.distance_km.round()
        ))
    }
}

pub fn nearest_clinic(lat: f64, lng: f64) -> Option<NearestClinic> {
    CLINICS
        .iter()
        .map(|clinic| NearestClinic {
            clinic,
            distance_km: calculate_distance(lat, lng, clinic.lat, clinic.lng),
        })
        .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
}

/// Nearest-clinic toast for a geolocation result.
pub fn location_notice(position: Option<(f64, f64)>) -> Notice {
    match position.and_then(|(lat, lng)| nearest_clinic(lat, lng)) {
        Some(nearest) => nearest.notice(),
        None => {
            tracing::warn!("Geolocation unavailable");
            Notice::error(MSG_LOCATION_UNAVAILABLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NoticeKind;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn filters(service: &str, date: &str, location: &str) -> ClinicFilters {
        ClinicFilters {
            service: service.into(),
            date: DateWindow::parse(date),
            location: location.into(),
        }
    }

    #[test]
    fn default_filters_show_everything() {
        let listing = apply_filters(&ClinicFilters::default(), day(14));
        assert_eq!(listing.visible.len(), CLINICS.len());
        assert!(!listing.no_results);
    }

    #[test]
    fn service_filter_uses_keywords() {
        let listing = apply_filters(&filters("emergency", "all", "all"), day(14));
        assert_eq!(listing.visible, vec!["turkana", "juba"]);
    }

    #[test]
    fn location_filter_maps_clinic_ids() {
        assert_eq!(apply_filters(&filters("all", "all", "narok"), day(14)).visible, vec!["masai-mara"]);
        assert_eq!(location_from_clinic_id("kampala"), "");
        assert_eq!(location_from_clinic_id("kisumu"), "kisumu");
    }

    #[test]
    fn date_windows() {
        assert_eq!(apply_filters(&filters("all", "today", "all"), day(15)).visible, vec!["kibera"]);
        assert_eq!(
            apply_filters(&filters("all", "week", "all"), day(14)).visible,
            vec!["kibera", "masai-mara", "addis-ababa", "kampala"]
        );
        assert_eq!(apply_filters(&filters("all", "month", "all"), day(14)).visible.len(), CLINICS.len());
        // Past visits drop out.
        let late = apply_filters(&filters("all", "month", "all"), day(27));
        assert_eq!(late.visible, vec!["juba"]);
    }

    #[test]
    fn week_window_edges_inclusive() {
        let w = DateWindow::Week;
        assert!(w.contains(day(15), day(15)));
        assert!(w.contains(day(22), day(15)));
        assert!(!w.contains(day(23), day(15)));
        assert!(!w.contains(day(14), day(15)));
        assert!(DateWindow::parse("someday").contains(day(1), day(30)));
    }

    #[test]
    fn combined_filters_can_empty_the_list() {
        let listing = apply_filters(&filters("mental", "all", "nairobi"), day(14));
        assert!(listing.visible.is_empty());
        assert!(listing.no_results);
    }

    #[test]
    fn clear_resets_and_notifies() {
        let mut locator = ClinicLocator::new();
        locator.set_service("vaccinations", day(14));
        let narrowed = locator.set_location("kisumu", day(14));
        assert_eq!(narrowed.visible, vec!["kisumu"]);

        let (listing, notice) = locator.clear(day(14));
        assert_eq!(locator.filters(), &ClinicFilters::default());
        assert_eq!(listing.visible.len(), CLINICS.len());
        assert_eq!(notice.message, MSG_FILTERS_CLEARED);
    }

    #[test]
    fn search_matches_name_address_and_labels() {
        let f = ClinicFilters::default();
        assert_eq!(search_clinics("lodwar", &f, day(14)).visible, vec!["turkana"]);
        assert_eq!(search_clinics("FAMILY PLANNING", &f, day(14)).visible, vec!["kisumu", "kampala"]);
        assert!(search_clinics("dentistry", &f, day(14)).no_results);
    }

    #[test]
    fn empty_search_falls_back_to_filters() {
        let mut locator = ClinicLocator::new();
        locator.set_service("child", day(14));
        let listing = locator.search("", day(14));
        assert_eq!(listing.visible, vec!["masai-mara", "addis-ababa", "kampala", "juba"]);
        // A term ignores the active filters.
        assert_eq!(locator.search("kibera", day(14)).visible, vec!["kibera"]);
    }

    #[test]
    fn haversine_distances() {
        assert_eq!(calculate_distance(-1.3, 36.8, -1.3, 36.8), 0.0);
        let degree = calculate_distance(0.0, 0.0, 0.0, 1.0);
        assert!((degree - 111.19).abs() < 0.01, "{degree}");
        let kibera_kampala = calculate_distance(-1.3129, 36.7809, 0.3476, 32.5825);
        assert!((kibera_kampala - 502.0).abs() < 1.0, "{kibera_kampala}");
    }

    #[test]
    fn nearest_clinic_from_nairobi() {
        let nearest = nearest_clinic(-1.2921, 36.8219).unwrap();
        assert_eq!(nearest.clinic.id, "kibera");
        assert!((nearest.distance_km - 5.1).abs() < 0.1);
        assert_eq!(nearest.notice().message, "Nearest clinic: Kibera Community Center (5 km away)");
    }

    #[test]
    fn location_notice_without_position() {
        let notice = location_notice(None);
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, MSG_LOCATION_UNAVAILABLE);
        assert_eq!(location_notice(Some((9.0, 38.7))).kind, NoticeKind::Success);
    }
}
