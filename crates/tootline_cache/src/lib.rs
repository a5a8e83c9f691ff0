//! Response caching for GET requests against the Mastodon API.
//!
//! Identical GET requests made within a short window are served from memory
//! instead of hitting the network again. Entries expire after a fixed TTL and
//! the store is bounded by an LRU capacity cap.

mod cache;

pub use cache::{CacheEntry, ResponseCache, ResponseCacheConfig, ResponseCacheConfigBuilder};
