//! Network access for the offline worker.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;

use super::request::{CacheRequest, CachedResponse};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network unreachable: {0}")]
    Offline(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Network fetcher abstraction (allows mocking).
pub trait Fetcher: Send + Sync + 'static {
    /// Any HTTP status is a response; only transport failures are errors.
    fn fetch(
        &self,
        request: &CacheRequest,
    ) -> impl Future<Output = Result<CachedResponse, FetchError>> + Send;
}

/// reqwest-backed fetcher. Relative URLs resolve against the site origin.
pub struct HttpFetcher {
    origin: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, FetchError> {
        let origin = Url::parse(origin).map_err(|e| FetchError::InvalidUrl(format!("{origin}: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { origin, client })
    }

    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        self.origin
            .join(url)
            .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        request: &CacheRequest,
    ) -> impl Future<Output = Result<CachedResponse, FetchError>> + Send {
        let target = self.resolve(&request.url);
        let client = self.client.clone();
        let method = request.method.clone();
        let accept = request.accept.clone();
        let body = request.body.clone();
        async move {
            let mut builder = client.request(method, target?);
            if let Some(accept) = accept {
                builder = builder.header(ACCEPT, accept);
            }
            if let Some(body) = body {
                builder = builder.header(CONTENT_TYPE, "application/json").body(body);
            }
            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = resp.bytes().await?.to_vec();
            Ok(CachedResponse {
                status,
                content_type,
                body,
            })
        }
    }
}

/// In-memory fetcher for tests: fixed responses per URL, 404 otherwise,
/// and a switch to simulate losing the network.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, CachedResponse>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(self, url: &str, response: CachedResponse) -> Self {
        self.set_route(url, response);
        self
    }

    /// Serve 200 with `url` as body for every URL given.
    pub fn serving(urls: &[&str]) -> Self {
        let fetcher = Self::new();
        for url in urls {
            fetcher.set_route(url, CachedResponse::text(200, url));
        }
        fetcher
    }

    pub fn set_route(&self, url: &str, response: CachedResponse) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(url.to_string(), response);
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(
        &self,
        request: &CacheRequest,
    ) -> impl Future<Output = Result<CachedResponse, FetchError>> + Send {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.url.clone());
        }
        let result = if self.offline.load(Ordering::SeqCst) {
            Err(FetchError::Offline(request.url.clone()))
        } else {
            let hit = self
                .routes
                .lock()
                .ok()
                .and_then(|routes| routes.get(&request.url).cloned());
            Ok(hit.unwrap_or_else(|| CachedResponse::text(404, "Not Found")))
        };
        std::future::ready(result)
    }
}
