//! In-memory LRU cache for raw content.
//!
//! Entries are keyed by `"<type>:<normalized path>"` and may carry an
//! expiry instant. Expired entries are dropped on access.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use docsite_config::{CacheConfig, ContentMode};
use lru::LruCache;
use regex::Regex;
use serde::Serialize;

use crate::content_type::ContentType;

const DEFAULT_MAX_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Cache tuning.
#[derive(Clone, Debug)]
pub struct CacheOptions {
    pub max_size: usize,
    /// Lifetime applied when `set` is called without one. `None` never expires.
    pub default_expiration: Option<Duration>,
    pub enabled: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE.get(),
            default_expiration: None,
            enabled: true,
        }
    }
}

impl CacheOptions {
    #[must_use]
    pub fn from_config(config: &CacheConfig, mode: ContentMode) -> Self {
        Self {
            max_size: config.max_size,
            default_expiration: config.expiration(mode),
            enabled: config.enabled,
        }
    }
}

/// Cache performance counters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Debug)]
struct Entry {
    content: String,
    expires: Option<Instant>,
}

/// Thread-safe LRU cache of raw content strings.
#[derive(Debug)]
pub struct ContentCache {
    entries: Mutex<LruCache<String, Entry>>,
    default_expiration: Option<Duration>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl ContentCache {
    #[must_use]
    pub fn new(options: CacheOptions) -> Self {
        let capacity = NonZeroUsize::new(options.max_size).unwrap_or(DEFAULT_MAX_SIZE);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            default_expiration: options.default_expiration,
            enabled: options.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key(content_type: ContentType, path: &str) -> String {
        format!("{content_type}:{path}")
    }

    /// Look up cached content, marking it most recently used.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get(&self, content_type: ContentType, path: &str) -> Option<String> {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let key = Self::key(content_type, path);
        let mut entries = self.entries.lock().unwrap();

        let expired = match entries.get(&key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => entry.expires.is_some_and(|at| Instant::now() > at),
        };
        if expired {
            entries.pop(&key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        entries.peek(&key).map(|entry| entry.content.clone())
    }

    /// Store content, evicting the least recently used entry when full.
    ///
    /// `expiration` overrides the default lifetime for this entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set(
        &self,
        content_type: ContentType,
        path: &str,
        content: impl Into<String>,
        expiration: Option<Duration>,
    ) {
        if !self.enabled {
            return;
        }

        let expires = expiration
            .or(self.default_expiration)
            .map(|ttl| Instant::now() + ttl);
        let entry = Entry {
            content: content.into(),
            expires,
        };

        let key = Self::key(content_type, path);
        let evicted = self.entries.lock().unwrap().push(key.clone(), entry);
        if let Some((evicted, _)) = evicted
            && evicted != key
        {
            tracing::debug!(key = %evicted, "Evicted cache entry");
        }
    }

    /// Drop entries whose key matches `pattern`, or everything when `None`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn invalidate(&self, pattern: Option<&Regex>) {
        let mut entries = self.entries.lock().unwrap();
        let Some(pattern) = pattern else {
            entries.clear();
            return;
        };

        let matching: Vec<String> = entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| pattern.is_match(key))
            .cloned()
            .collect();
        for key in &matching {
            entries.pop(key);
        }
        tracing::debug!(pattern = %pattern, removed = matching.len(), "Invalidated cache entries");
    }

    /// Current size and hit/miss counters.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            size: self.entries.lock().unwrap().len(),
            hits,
            misses,
            hit_rate,
        }
    }
}
