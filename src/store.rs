//! Result storage: a cache keyed by URL and AI mode with expiry, and a
//! bounded id history.

use crate::config::AnalyzerConfig;
use crate::results::ScrapeResult;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Where finished results are kept
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Records a fresh result for `url`, produced with or without AI analysis
    async fn put(&self, url: &str, with_ai: bool, result: &ScrapeResult);

    /// Looks a result up by its id
    async fn get(&self, id: &str) -> Option<ScrapeResult>;

    /// Unexpired cached result for `url` in the same AI mode
    async fn cached(&self, url: &str, with_ai: bool) -> Option<ScrapeResult>;
}

/// Cache occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
}

type CacheKey = (String, bool);

struct CacheEntry {
    result: ScrapeResult,
    expires_at: Instant,
}

#[derive(Default)]
struct Inner {
    cache: HashMap<CacheKey, CacheEntry>,
    /// Oldest first
    history: VecDeque<ScrapeResult>,
}

/// In-process [`ResultStore`]
pub struct MemoryStore {
    ttl: Duration,
    history_limit: usize,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(ttl: Duration, history_limit: usize) -> Self {
        Self {
            ttl,
            history_limit,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.history_limit,
        )
    }

    /// Stored results, newest first
    pub async fn history(&self) -> Vec<ScrapeResult> {
        let inner = self.inner.lock().await;
        inner.history.iter().rev().cloned().collect()
    }

    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let now = Instant::now();
        let expired = inner
            .cache
            .values()
            .filter(|entry| entry.expires_at <= now)
            .count();
        CacheStats {
            total: inner.cache.len(),
            valid: inner.cache.len() - expired,
            expired,
        }
    }

    /// Drops expired cache entries, returning how many were removed
    pub async fn cleanup(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        let before = inner.cache.len();
        inner.cache.retain(|_, entry| entry.expires_at > now);
        let removed = before - inner.cache.len();
        if removed > 0 {
            ::log::debug!("Removed {} expired cache entries", removed);
        }
        removed
    }

    /// Forgets the cached results for `url` in both AI modes
    pub async fn remove(&self, url: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let before = inner.cache.len();
        inner.cache.retain(|(cached_url, _), _| cached_url != url);
        inner.cache.len() < before
    }

    /// Empties both the cache and the history
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.cache.clear();
        inner.history.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn put(&self, url: &str, with_ai: bool, result: &ScrapeResult) {
        let mut inner = self.inner.lock().await;
        inner.cache.insert(
            (url.to_string(), with_ai),
            CacheEntry {
                result: result.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );

        inner.history.push_back(result.clone());
        while inner.history.len() > self.history_limit {
            inner.history.pop_front();
        }
        ::log::trace!("Stored result {} for {}", result.id, url);
    }

    async fn get(&self, id: &str) -> Option<ScrapeResult> {
        let inner = self.inner.lock().await;
        inner.history.iter().find(|r| r.id == id).cloned()
    }

    async fn cached(&self, url: &str, with_ai: bool) -> Option<ScrapeResult> {
        let key = (url.to_string(), with_ai);
        let mut inner = self.inner.lock().await;
        let expired = match inner.cache.get(&key) {
            None => return None,
            Some(entry) => entry.expires_at <= Instant::now(),
        };
        if expired {
            inner.cache.remove(&key);
            ::log::debug!("Cache entry for {} expired", url);
            return None;
        }
        inner.cache.get(&key).map(|entry| entry.result.clone())
    }
}
