use serde_json::json;
use std::thread::sleep;
use std::time::Duration;
use tootline_cache::{ResponseCache, ResponseCacheConfig};

const URL: &str = "https://mastodon.example/api/v1/timelines/home";

fn small_cache(max_size: usize) -> ResponseCache {
    let config = ResponseCacheConfig::default().with_max_size(max_size);
    ResponseCache::new(config)
}

#[test]
fn test_insert_and_get() {
    let mut cache = ResponseCache::default();
    let body = json!([{"id": "1", "content": "hello"}]);

    cache.insert("GET", URL, "{}", body.clone(), None);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("GET", URL, "{}"), Some(body));
}

#[test]
fn test_miss_on_different_key_parts() {
    let mut cache = ResponseCache::default();
    cache.insert("GET", URL, "{\"limit\":5}", json!([]), None);

    assert!(cache.get("GET", URL, "{\"limit\":10}").is_none());
    assert!(
        cache
            .get("GET", "https://mastodon.example/api/v1/timelines/public", "{\"limit\":5}")
            .is_none()
    );
    // Method comparison is case-insensitive.
    assert!(cache.get("get", URL, "{\"limit\":5}").is_some());
}

#[test]
fn test_expired_entry_is_evicted_on_lookup() {
    let mut cache = ResponseCache::default();
    cache.insert("GET", URL, "{}", json!({"id": "1"}), Some(0));

    sleep(Duration::from_millis(20));
    assert!(cache.get("GET", URL, "{}").is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_custom_ttl_overrides_default() {
    let config = ResponseCacheConfig::default().with_default_ttl(0);
    let mut cache = ResponseCache::new(config);
    cache.insert("GET", URL, "{}", json!({"id": "1"}), Some(300));

    sleep(Duration::from_millis(20));
    assert!(cache.get("GET", URL, "{}").is_some());
}

#[test]
fn test_lru_eviction_at_capacity() {
    let mut cache = small_cache(2);
    cache.insert("GET", "https://s/a", "{}", json!("a"), None);
    cache.insert("GET", "https://s/b", "{}", json!("b"), None);

    // Touch `a` so `b` becomes the least recently used entry.
    assert!(cache.get("GET", "https://s/a", "{}").is_some());

    cache.insert("GET", "https://s/c", "{}", json!("c"), None);
    assert_eq!(cache.len(), 2);
    assert!(cache.get("GET", "https://s/a", "{}").is_some());
    assert!(cache.get("GET", "https://s/b", "{}").is_none());
    assert!(cache.get("GET", "https://s/c", "{}").is_some());
}

#[test]
fn test_reinsert_does_not_evict() {
    let mut cache = small_cache(2);
    cache.insert("GET", "https://s/a", "{}", json!("a"), None);
    cache.insert("GET", "https://s/b", "{}", json!("b"), None);
    cache.insert("GET", "https://s/a", "{}", json!("a2"), None);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("GET", "https://s/a", "{}"), Some(json!("a2")));
    assert!(cache.get("GET", "https://s/b", "{}").is_some());
}

#[test]
fn test_invalidate_exact_key() {
    let mut cache = ResponseCache::default();
    cache.insert("GET", URL, "{}", json!([]), None);
    cache.invalidate("GET", URL, "{}");
    assert!(cache.get("GET", URL, "{}").is_none());
}

#[test]
fn test_invalidate_pattern() {
    let mut cache = ResponseCache::default();
    cache.insert(
        "GET",
        "https://s/api/v1/statuses/123",
        "{}",
        json!({"id": "123"}),
        None,
    );
    cache.insert(
        "GET",
        "https://s/api/v1/statuses/123/context",
        "{}",
        json!({}),
        None,
    );
    cache.insert("GET", "https://s/api/v1/timelines/home", "{}", json!([]), None);

    let removed = cache.invalidate_pattern("/api/v1/statuses/123");
    assert_eq!(removed, 2);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("GET", "https://s/api/v1/timelines/home", "{}").is_some());

    assert_eq!(cache.invalidate_pattern("/api/v1/statuses/123"), 0);
}

#[test]
fn test_cleanup_expired() {
    let mut cache = ResponseCache::default();
    cache.insert("GET", "https://s/stale", "{}", json!("x"), Some(0));
    cache.insert("GET", "https://s/fresh", "{}", json!("y"), Some(300));

    sleep(Duration::from_millis(20));
    assert_eq!(cache.cleanup_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("GET", "https://s/fresh", "{}").is_some());
}

#[test]
fn test_disabled_cache_stores_nothing() {
    let config = ResponseCacheConfig::default().with_enabled(false);
    let mut cache = ResponseCache::new(config);

    cache.insert("GET", URL, "{}", json!([]), None);
    assert!(cache.is_empty());
    assert!(cache.get("GET", URL, "{}").is_none());
}

#[test]
fn test_clear() {
    let mut cache = ResponseCache::default();
    cache.insert("GET", "https://s/a", "{}", json!("a"), None);
    cache.insert("GET", "https://s/b", "{}", json!("b"), None);

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get("GET", "https://s/a", "{}").is_none());
}
