//! Named response caches keyed by URL.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::request::CachedResponse;

/// One named cache. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, CachedResponse>>>,
}

impl Cache {
    pub async fn match_url(&self, url: &str) -> Option<CachedResponse> {
        self.entries.read().await.get(url).cloned()
    }

    /// Last write wins.
    pub async fn put(&self, url: &str, response: CachedResponse) {
        self.entries.write().await.insert(url.to_string(), response);
    }

    /// Store every response, or none if any of them is not ok.
    pub async fn put_all(&self, responses: Vec<(String, CachedResponse)>) -> Result<(), String> {
        if let Some((url, _)) = responses.iter().find(|(_, r)| !r.ok()) {
            return Err(url.clone());
        }
        let mut entries = self.entries.write().await;
        entries.extend(responses);
        Ok(())
    }

    pub async fn delete(&self, url: &str) -> bool {
        self.entries.write().await.remove(url).is_some()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// All caches of the origin, in creation order.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: RwLock<Vec<(String, Cache)>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `name`, creating it if missing.
    pub async fn open(&self, name: &str) -> Cache {
        if let Some(cache) = find(&self.caches.read().await, name) {
            return cache;
        }
        let mut caches = self.caches.write().await;
        if let Some(cache) = find(&caches, name) {
            return cache;
        }
        let cache = Cache::default();
        caches.push((name.to_string(), cache.clone()));
        cache
    }

    pub async fn has(&self, name: &str) -> bool {
        find(&self.caches.read().await, name).is_some()
    }

    /// First hit across caches, oldest cache first.
    pub async fn match_any(&self, url: &str) -> Option<CachedResponse> {
        let caches: Vec<Cache> = self.caches.read().await.iter().map(|(_, c)| c.clone()).collect();
        for cache in caches {
            if let Some(hit) = cache.match_url(url).await {
                return Some(hit);
            }
        }
        None
    }

    pub async fn delete(&self, name: &str) -> bool {
        let mut caches = self.caches.write().await;
        let before = caches.len();
        caches.retain(|(n, _)| n != name);
        caches.len() != before
    }

    /// Cache names in creation order.
    pub async fn keys(&self) -> Vec<String> {
        self.caches.read().await.iter().map(|(n, _)| n.clone()).collect()
    }
}

fn find(caches: &[(String, Cache)], name: &str) -> Option<Cache> {
    caches.iter().find(|(n, _)| n == name).map(|(_, c)| c.clone())
}
