//! Navigation & animation layer.
//!
//! Everything here is derived from plain viewport numbers so the renderer
//! only applies classes. Header, progress bar, floating action button,
//! reveal-on-scroll and the active nav link all come from this module.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::storage::{keys, LocalStore};

// ═══════════════════════════════════════════
// Scroll effects
// ═══════════════════════════════════════════

/// Header gets the `scrolled` shadow past this offset.
pub const SCROLLED_OFFSET: f64 = 50.0;
/// Scrolling down past this offset slides the header away.
pub const HIDE_HEADER_OFFSET: f64 = 100.0;
/// Floating action button appears past this offset.
pub const FAB_OFFSET: f64 = 300.0;

/// Class state for the header and floating action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollView {
    pub header_scrolled: bool,
    pub header_hidden: bool,
    pub fab_visible: bool,
}

/// Tracks the last scroll offset so direction can be derived.
#[derive(Debug, Clone, Default)]
pub struct ScrollEffects {
    last_y: f64,
    header_hidden: bool,
}

impl ScrollEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_position(&self) -> f64 {
        self.last_y
    }

    /// Apply a new scroll offset. A non-moving update keeps the header
    /// where it was.
    pub fn update(&mut self, scroll_y: f64) -> ScrollView {
        let scroll_y = sanitize(scroll_y);
        let delta = scroll_y - self.last_y;
        self.last_y = scroll_y;

        if delta > 0.0 && scroll_y > HIDE_HEADER_OFFSET {
            self.header_hidden = true;
        } else if delta < 0.0 {
            self.header_hidden = false;
        }

        ScrollView {
            header_scrolled: scroll_y > SCROLLED_OFFSET,
            header_hidden: self.header_hidden,
            fab_visible: scroll_y > FAB_OFFSET,
        }
    }
}

/// Reading progress in percent, clamped to [0, 100]. A page that does not
/// scroll reports 0.
pub fn progress_percent(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let total = sanitize(scroll_height) - sanitize(viewport_height);
    if total <= 0.0 {
        return 0.0;
    }
    (sanitize(scroll_y) / total * 100.0).clamp(0.0, 100.0)
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

// ═══════════════════════════════════════════
// Reveal on scroll
// ═══════════════════════════════════════════

/// Fraction of an element that must be visible.
pub const REVEAL_THRESHOLD: f64 = 0.1;
/// Bottom margin shrinking the viewport before intersection is tested.
pub const REVEAL_BOTTOM_MARGIN: f64 = 50.0;

/// Whether an element at `element_top` with `element_height` (both in
/// viewport coordinates) should receive its reveal class.
pub fn should_reveal(element_top: f64, element_height: f64, viewport_height: f64) -> bool {
    if !(element_top.is_finite() && element_height.is_finite() && viewport_height.is_finite()) {
        return false;
    }
    let visible_bottom = viewport_height - REVEAL_BOTTOM_MARGIN;
    let overlap = (element_top + element_height).min(visible_bottom) - element_top.max(0.0);
    if element_height <= 0.0 {
        return element_top >= 0.0 && element_top < visible_bottom;
    }
    overlap / element_height >= REVEAL_THRESHOLD
}

// ═══════════════════════════════════════════
// Pages, active links and breadcrumbs
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub name: &'static str,
    pub url: &'static str,
    pub icon: &'static str,
}

const HOME: PageInfo = PageInfo { name: "Home", url: "index.html", icon: "fas fa-home" };

const PAGES: &[(&str, PageInfo)] = &[
    ("index", HOME),
    ("services", PageInfo { name: "Services", url: "services.html", icon: "fas fa-stethoscope" }),
    ("health-tools", PageInfo { name: "Health Tools", url: "health-tools.html", icon: "fas fa-tools" }),
    ("health-blog", PageInfo { name: "Health Blog", url: "health-blog.html", icon: "fas fa-newspaper" }),
    ("about", PageInfo { name: "About", url: "about.html", icon: "fas fa-info-circle" }),
    ("contact", PageInfo { name: "Contact", url: "contact.html", icon: "fas fa-envelope" }),
    ("clinic-locations", PageInfo { name: "Map", url: "clinic-locations.html", icon: "fas fa-map-marker-alt" }),
    ("settings", PageInfo { name: "Settings", url: "settings.html", icon: "fas fa-cog" }),
];

/// Page id from a URL path: last segment without `.html`, `index` for `/`.
pub fn page_from_path(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or_default();
    let file = if file.is_empty() { "index.html" } else { file };
    file.strip_suffix(".html").unwrap_or(file).to_string()
}

/// Nav href that marks `page` as current.
pub fn active_href(page: &str) -> String {
    if page == "index" {
        "index.html".to_string()
    } else {
        format!("{page}.html")
    }
}

/// Whether a nav link with `href` is active on `path`.
pub fn is_active_link(href: &str, path: &str) -> bool {
    let active = active_href(&page_from_path(path));
    href == active
        || (active == "index.html" && (href == "/" || href == "index.html"))
        || (!href.is_empty() && href != "#" && path.contains(href))
}

/// Known page metadata; unknown pages resolve to Home.
pub fn page_info(page: &str) -> PageInfo {
    PAGES
        .iter()
        .find(|(id, _)| *id == page)
        .map(|(_, info)| *info)
        .unwrap_or(HOME)
}

/// Home, then the current page unless it is Home.
pub fn breadcrumbs(path: &str) -> Vec<PageInfo> {
    let current = page_info(&page_from_path(path));
    let mut crumbs = vec![HOME];
    if current.name != HOME.name {
        crumbs.push(current);
    }
    crumbs
}

// ═══════════════════════════════════════════
// Persisted navigation state
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavState {
    pub current_page: String,
    pub scroll_position: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl NavState {
    pub fn capture(path: &str, scroll_y: f64) -> Self {
        Self {
            current_page: page_from_path(path),
            scroll_position: sanitize(scroll_y),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn save(&self, store: &LocalStore) {
        store.save(keys::NAV_STATE, self);
    }

    pub fn load(store: &LocalStore) -> Option<Self> {
        store.load(keys::NAV_STATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_scrolled_past_fifty() {
        let mut fx = ScrollEffects::new();
        assert!(!fx.update(50.0).header_scrolled);
        assert!(fx.update(51.0).header_scrolled);
    }

    #[test]
    fn header_hides_on_scroll_down_and_returns_on_scroll_up() {
        let mut fx = ScrollEffects::new();
        assert!(!fx.update(80.0).header_hidden);
        assert!(fx.update(150.0).header_hidden);
        // Holding still keeps it hidden.
        assert!(fx.update(150.0).header_hidden);
        assert!(!fx.update(140.0).header_hidden);
    }

    #[test]
    fn fab_after_three_hundred() {
        let mut fx = ScrollEffects::new();
        assert!(!fx.update(300.0).fab_visible);
        assert!(fx.update(301.0).fab_visible);
        assert!(!fx.update(10.0).fab_visible);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(progress_percent(5000.0, 2000.0, 1000.0), 100.0);
        assert_eq!(progress_percent(-20.0, 2000.0, 1000.0), 0.0);
    }

    #[test]
    fn progress_guards_zero_scroll_range() {
        assert_eq!(progress_percent(0.0, 800.0, 800.0), 0.0);
        assert_eq!(progress_percent(100.0, 600.0, 800.0), 0.0);
        assert_eq!(progress_percent(f64::NAN, 2000.0, 1000.0), 0.0);
    }

    #[test]
    fn reveal_needs_a_tenth_visible() {
        // Viewport 800 shrinks to 750 for the test.
        assert!(should_reveal(700.0, 100.0, 800.0));
        assert!(!should_reveal(745.0, 100.0, 800.0));
        assert!(!should_reveal(900.0, 100.0, 800.0));
        assert!(should_reveal(-50.0, 100.0, 800.0));
    }

    #[test]
    fn page_ids_from_paths() {
        assert_eq!(page_from_path("/"), "index");
        assert_eq!(page_from_path(""), "index");
        assert_eq!(page_from_path("/health-tools.html"), "health-tools");
        assert_eq!(page_from_path("/site/about.html"), "about");
    }

    #[test]
    fn active_link_matching() {
        assert!(is_active_link("index.html", "/"));
        assert!(is_active_link("/", "/index.html"));
        assert!(is_active_link("contact.html", "/contact.html"));
        assert!(!is_active_link("about.html", "/contact.html"));
        assert!(!is_active_link("#", "/services.html#top"));
    }

    #[test]
    fn breadcrumbs_skip_duplicate_home() {
        assert_eq!(breadcrumbs("/"), vec![HOME]);
        let crumbs = breadcrumbs("/clinic-locations.html");
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[1].name, "Map");
        assert_eq!(breadcrumbs("/unknown.html"), vec![HOME]);
    }

    #[test]
    fn nav_state_round_trips_through_store() {
        let store = LocalStore::in_memory();
        assert!(NavState::load(&store).is_none());
        let state = NavState::capture("/services.html", 420.0);
        state.save(&store);
        let loaded = NavState::load(&store).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.current_page, "services");

        let raw: serde_json::Value = store.load(keys::NAV_STATE).unwrap();
        assert!(raw.get("scrollPosition").is_some());
    }
}
