//! Request/response values passed between the worker, caches and fetcher.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use serde::Serialize;

/// URLs answered network-first and cached dynamically.
static API_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^https://api\.").unwrap(),
        Regex::new(r"/api/").unwrap(),
        Regex::new(r"/data/").unwrap(),
    ]
});

const STATIC_MARKERS: &[&str] = &[
    "/css/",
    "/js/",
    "/images/",
    "fonts.googleapis.com",
    "cdnjs.cloudflare.com",
    "unpkg.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Navigate,
    #[default]
    Cors,
    NoCors,
    SameOrigin,
}

#[derive(Debug, Clone)]
pub struct CacheRequest {
    pub method: Method,
    pub url: String,
    pub mode: RequestMode,
    pub accept: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl CacheRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            mode: RequestMode::default(),
            accept: None,
            body: None,
        }
    }

    /// Top-level page navigation.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            mode: RequestMode::Navigate,
            accept: Some("text/html".into()),
            ..Self::get(url)
        }
    }

    /// JSON POST, as the sync handlers send.
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            accept: Some("application/json".into()),
            body: Some(body),
            ..Self::get(url)
        }
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    pub fn is_static_asset(&self) -> bool {
        STATIC_MARKERS.iter().any(|m| self.url.contains(m))
    }

    pub fn is_api(&self) -> bool {
        API_PATTERNS.iter().any(|re| re.is_match(&self.url))
    }

    /// A navigation, or a GET that accepts HTML.
    pub fn is_page(&self) -> bool {
        self.mode == RequestMode::Navigate
            || (self.is_get()
                && self
                    .accept
                    .as_deref()
                    .is_some_and(|a| a.contains("text/html")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            content_type: Some("text/plain".into()),
            ..Self::new(status, body)
        }
    }

    pub fn json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content_type: Some("application/json".into()),
            ..Self::new(200, serde_json::to_vec(value)?)
        })
    }

    /// 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_assets_by_path_or_cdn() {
        assert!(CacheRequest::get("/css/styles.css").is_static_asset());
        assert!(CacheRequest::get("/images/logo.png").is_static_asset());
        assert!(CacheRequest::get("https://unpkg.com/aos@2.3.1/dist/aos.js").is_static_asset());
        assert!(!CacheRequest::get("/contact.html").is_static_asset());
    }

    #[test]
    fn api_patterns() {
        assert!(CacheRequest::get("https://api.example.org/clinics").is_api());
        assert!(CacheRequest::get("/api/clinics/updates").is_api());
        assert!(CacheRequest::get("/data/clinics.json").is_api());
        assert!(!CacheRequest::get("http://api.example.org/x").is_api());
    }

    #[test]
    fn page_detection() {
        assert!(CacheRequest::navigate("/about.html").is_page());
        assert!(CacheRequest::get("/about.html")
            .with_accept("text/html,application/xhtml+xml")
            .is_page());
        assert!(!CacheRequest::get("/about.html").is_page());
        assert!(!CacheRequest::post_json("/form", Vec::new())
            .with_accept("text/html")
            .is_page());
    }

    #[test]
    fn ok_range() {
        assert!(CachedResponse::new(204, "").ok());
        assert!(!CachedResponse::text(503, "down").ok());
        assert_eq!(CachedResponse::text(503, "down").body_text(), "down");
    }
}
