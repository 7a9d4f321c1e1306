//! Caching strategies and the request router that picks one.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::cache::CacheStorage;
use super::fetcher::Fetcher;
use super::request::{CacheRequest, CachedResponse};
use super::{DYNAMIC_CACHE, MSG_OFFLINE_ASSET, MSG_OFFLINE_CONTENT, OFFLINE_FALLBACK_PAGE, STATIC_CACHE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Not intercepted; goes straight to the network.
    Passthrough,
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
}

impl Strategy {
    /// Static assets, then API calls, then pages; anything else is
    /// network-first.
    pub fn for_request(request: &CacheRequest) -> Self {
        if !request.is_get() {
            Self::Passthrough
        } else if request.is_static_asset() {
            Self::CacheFirst
        } else if request.is_api() {
            Self::NetworkFirst
        } else if request.is_page() {
            Self::StaleWhileRevalidate
        } else {
            Self::NetworkFirst
        }
    }
}

pub async fn cache_first<F: Fetcher>(
    caches: &CacheStorage,
    fetcher: &F,
    request: &CacheRequest,
) -> CachedResponse {
    if let Some(hit) = caches.match_any(&request.url).await {
        return hit;
    }
    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.ok() {
                caches.open(STATIC_CACHE).await.put(&request.url, response.clone()).await;
            }
            response
        }
        Err(e) => {
            tracing::error!(url = %request.url, error = %e, "Cache-first fetch failed");
            CachedResponse::text(503, MSG_OFFLINE_ASSET)
        }
    }
}

pub async fn network_first<F: Fetcher>(
    caches: &CacheStorage,
    fetcher: &F,
    request: &CacheRequest,
) -> CachedResponse {
    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.ok() {
                caches.open(DYNAMIC_CACHE).await.put(&request.url, response.clone()).await;
            }
            response
        }
        Err(e) => {
            tracing::debug!(url = %request.url, error = %e, "Network failed, trying cache");
            if let Some(hit) = caches.match_any(&request.url).await {
                return hit;
            }
            if request.is_page() {
                if let Some(page) = caches.match_any(OFFLINE_FALLBACK_PAGE).await {
                    return page;
                }
            }
            CachedResponse::text(503, MSG_OFFLINE_CONTENT)
        }
    }
}

/// Cached copy now, refreshed in the background. The returned handle, if
/// any, completes when the refresh has been written back.
pub async fn stale_while_revalidate<F: Fetcher>(
    caches: Arc<CacheStorage>,
    fetcher: Arc<F>,
    request: &CacheRequest,
) -> (CachedResponse, Option<JoinHandle<()>>) {
    let cache = caches.open(DYNAMIC_CACHE).await;

    let Some(cached) = cache.match_url(&request.url).await else {
        let response = match fetcher.fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    cache.put(&request.url, response.clone()).await;
                }
                response
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "Page unavailable offline");
                CachedResponse::text(503, MSG_OFFLINE_CONTENT)
            }
        };
        return (response, None);
    };

    let request = request.clone();
    let refresh = tokio::spawn(async move {
        match fetcher.fetch(&request).await {
            Ok(response) if response.ok() => cache.put(&request.url, response).await,
            Ok(response) => {
                tracing::debug!(url = %request.url, status = response.status, "Revalidation skipped")
            }
            Err(e) => tracing::debug!(url = %request.url, error = %e, "Revalidation failed"),
        }
    });
    (cached, Some(refresh))
}
