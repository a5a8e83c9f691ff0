//! GET response cache implementation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: JsonValue,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.stored_at.elapsed())
    }
}

/// Cache key derived deterministically from `(method, url, params)`.
///
/// The serialized query-and-options string is hashed rather than stored;
/// `method` and `url` stay verbatim so pattern invalidation can match on
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    method: String,
    url: String,
    params_hash: u64,
}

impl CacheKey {
    fn new(method: &str, url: &str, params: &str) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        params.hash(&mut hasher);
        Self {
            method: method.to_uppercase(),
            url: url.to_string(),
            params_hash: hasher.finish(),
        }
    }

    /// Printable form used for substring invalidation.
    fn render(&self) -> String {
        format!("{}:{}", self.method, self.url)
    }
}

/// Configuration for the response cache.
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct ResponseCacheConfig {
    /// TTL for cached entries (seconds)
    #[serde(default = "default_ttl")]
    default_ttl: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    300 // 5 minutes
}

fn default_max_size() -> usize {
    1000
}

fn default_enabled() -> bool {
    true
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

/// TTL keyed store for GET responses.
///
/// Keys are derived from `(method, full URL, serialized query-and-options)`.
/// Expired entries are evicted lazily on lookup; when the store reaches its
/// capacity bound the least recently used entry is evicted first.
///
/// # Example
///
/// ```
/// use tootline_cache::{ResponseCache, ResponseCacheConfig};
/// use serde_json::json;
///
/// let mut cache = ResponseCache::new(ResponseCacheConfig::default());
///
/// cache.insert(
///     "GET",
///     "https://mastodon.example/api/v1/timelines/home",
///     "{}",
///     json!([{"id": "1"}]),
///     None,
/// );
///
/// let hit = cache.get("GET", "https://mastodon.example/api/v1/timelines/home", "{}");
/// assert!(hit.is_some());
/// ```
pub struct ResponseCache {
    config: ResponseCacheConfig,
    entries: HashMap<CacheKey, CacheEntry>,
    access_order: Vec<CacheKey>,
}

impl ResponseCache {
    /// Create a new response cache with configuration.
    pub fn new(config: ResponseCacheConfig) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new ResponseCache"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Insert a response body into the cache.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method (only GET responses are worth caching)
    /// * `url` - Full request URL
    /// * `params` - Serialized query-and-options string
    /// * `value` - Response body to cache
    /// * `ttl_seconds` - TTL in seconds (uses the configured default if None)
    #[tracing::instrument(skip(self, params, value), fields(cache_size = self.entries.len()))]
    pub fn insert(
        &mut self,
        method: &str,
        url: &str,
        params: &str,
        value: JsonValue,
        ttl_seconds: Option<u64>,
    ) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let key = CacheKey::new(method, url, params);
        let ttl = Duration::from_secs(ttl_seconds.unwrap_or(self.config.default_ttl));

        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
            ttl,
        };

        // Evict if at capacity
        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(&key) {
            self.evict_lru();
        }

        // Track access order for LRU
        if let Some(pos) = self.access_order.iter().position(|k| k == &key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key.clone());

        tracing::debug!(ttl = ?ttl, "Stored response in cache");
        self.entries.insert(key, entry);
    }

    /// Get a cached response body.
    ///
    /// Returns None if the entry doesn't exist, has expired (the expired
    /// entry is evicted on the spot), or the cache is disabled.
    #[tracing::instrument(skip(self, params), fields(cache_size = self.entries.len()))]
    pub fn get(&mut self, method: &str, url: &str, params: &str) -> Option<JsonValue> {
        if !self.config.enabled {
            return None;
        }

        let key = CacheKey::new(method, url, params);

        let entry = self.entries.get(&key)?;
        if entry.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            self.entries.remove(&key);
            if let Some(pos) = self.access_order.iter().position(|k| k == &key) {
                self.access_order.remove(pos);
            }
            return None;
        }

        // Update access order for LRU
        if let Some(pos) = self.access_order.iter().position(|k| k == &key) {
            let key_clone = self.access_order.remove(pos);
            self.access_order.push(key_clone);
        }

        let entry = self.entries.get(&key)?;
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry.value.clone())
    }

    /// Remove the entry for an exact `(method, url, params)` key.
    pub fn invalidate(&mut self, method: &str, url: &str, params: &str) {
        let key = CacheKey::new(method, url, params);
        self.entries.remove(&key);
        if let Some(pos) = self.access_order.iter().position(|k| k == &key) {
            self.access_order.remove(pos);
        }
    }

    /// Remove every entry whose `method:url` rendering contains `pattern`.
    ///
    /// Used after mutating calls to drop stale reads, e.g. invalidating all
    /// cached views of `/api/v1/statuses/123` after deleting that status.
    pub fn invalidate_pattern(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();

        self.entries.retain(|key, _| {
            let keep = !key.render().contains(pattern);
            if !keep
                && let Some(pos) = self.access_order.iter().position(|k| k == key)
            {
                self.access_order.remove(pos);
            }
            keep
        });

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, pattern, "Invalidated cached responses");
        }
        removed
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired();
            if !keep
                && let Some(pos) = self.access_order.iter().position(|k| k == key)
            {
                self.access_order.remove(pos);
            }
            keep
        });

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.entries.len(),
                "Cleaned up expired cache entries"
            );
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared response cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.first().cloned() {
            tracing::debug!(url = %key.url, "Evicting LRU cache entry");
            self.entries.remove(&key);
            self.access_order.remove(0);
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(ResponseCacheConfig::default())
    }
}
