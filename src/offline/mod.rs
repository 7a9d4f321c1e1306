//! Offline cache.
//!
//! A service-worker equivalent: named response caches, a pluggable network
//! fetcher, the three caching strategies and the worker lifecycle
//! (install, activate, fetch, sync, push, notification click, message).

pub mod cache;
pub mod fetcher;
pub mod request;
pub mod strategy;
pub mod worker;

pub use cache::{Cache, CacheStorage};
pub use fetcher::{FetchError, Fetcher, HttpFetcher, MockFetcher};
pub use request::{CacheRequest, CachedResponse, RequestMode};
pub use strategy::Strategy;
pub use worker::{OfflineWorker, WorkerState};

/// Install-time assets and pages.
pub const STATIC_CACHE: &str = "healthconnect-static-v1.0.0";
/// Responses cached as they are fetched.
pub const DYNAMIC_CACHE: &str = "healthconnect-dynamic-v1.0.0";

/// Everything cached on install.
pub const STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/about.html",
    "/clinic-locations.html",
    "/health-resources.html",
    "/appointment-booking.html",
    "/community-stories.html",
    "/health-tools.html",
    "/contact.html",
    "/css/styles.css",
    "/css/community-stories.css",
    "/css/about-enhanced.css",
    "/css/health-tools.css",
    "/js/main.js",
    "/js/community-stories.js",
    "/js/about-enhanced.js",
    "/js/health-tools.js",
    "/manifest.json",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
    "https://unpkg.com/aos@2.3.1/dist/aos.css",
    "https://unpkg.com/aos@2.3.1/dist/aos.js",
    "https://cdn.jsdelivr.net/npm/chart.js",
];

/// Cached instead when the full manifest cannot be fetched.
pub const ESSENTIAL_ASSETS: &[&str] = &["/", "/index.html", "/css/styles.css", "/js/main.js"];

/// Page served for failed navigations with nothing cached.
pub const OFFLINE_FALLBACK_PAGE: &str = "/index.html";

pub const MSG_OFFLINE_ASSET: &str = "Offline content not available";
pub const MSG_OFFLINE_CONTENT: &str = "Content not available offline";

#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error("Failed to cache {url}: {reason}")]
    Precache { url: String, reason: String },

    #[error("Unexpected status {status} for {url}")]
    BadStatus { url: String, status: u16 },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essentials_are_part_of_manifest() {
        for asset in ESSENTIAL_ASSETS {
            assert!(STATIC_ASSETS.contains(asset), "{asset}");
        }
    }

    #[test]
    fn cache_names_are_versioned() {
        assert!(STATIC_CACHE.ends_with("v1.0.0"));
        assert_ne!(STATIC_CACHE, DYNAMIC_CACHE);
    }
}
