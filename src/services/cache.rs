// src/services/cache.rs
// DOCUMENTATION: Simple in-memory cache with per-entry expiry
// PURPOSE: Keep redirect lookups off the database for hot paths

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::RedirectTarget;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe cache with a default TTL
pub struct TtlCache<V> {
    store: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    default_ttl: Duration,
}

/// Redirect lookups keyed by normalised path; `None` caches a miss
pub type RedirectCache = TtlCache<Option<RedirectTarget>>;

impl<V: Clone> TtlCache<V> {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Get cached value
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Set cached value with default TTL
    pub async fn set(&self, key: String, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Set cached value with custom TTL
    pub async fn set_with_ttl(&self, key: String, value: V, ttl: Duration) {
        let mut store = self.store.write().await;
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
        store.insert(key, CacheEntry::new(value, ttl));
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }

    /// Clear all cache entries
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        let count = store.len();
        store.clear();
        log::info!("Cache cleared: {} entries removed", count);
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task<V>(cache: Arc<TtlCache<V>>, interval_seconds: u64)
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache: TtlCache<String> = TtlCache::new(60);

        cache.set("key".to_string(), "value".to_string()).await;

        assert_eq!(cache.get("key").await, Some("value".to_string()));
        assert_eq!(cache.get("other").await, None);
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache: TtlCache<u32> = TtlCache::new(60);

        cache
            .set_with_ttl("short".to_string(), 1, Duration::from_millis(20))
            .await;
        assert_eq!(cache.get("short").await, Some(1));

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("short").await, None);
    }

    #[tokio::test]
    async fn test_negative_redirect_entries_are_cached() {
        let cache = RedirectCache::new(60);
        let target = RedirectTarget {
            id: Uuid::new_v4(),
            to_path: "/new".to_string(),
            status_code: 301,
        };

        cache.set("/old".to_string(), Some(target.clone())).await;
        cache.set("/missing".to_string(), None).await;

        assert_eq!(cache.get("/old").await, Some(Some(target)));
        assert_eq!(cache.get("/missing").await, Some(None));
        assert_eq!(cache.get("/unknown").await, None);
    }

    #[test]
    fn test_cache_cleanup_and_clear() {
        tokio_test::block_on(async {
            let cache: TtlCache<u32> = TtlCache::new(60);

            cache
                .set_with_ttl("gone".to_string(), 1, Duration::from_millis(0))
                .await;
            cache.set("kept".to_string(), 2).await;
            std::thread::sleep(Duration::from_millis(5));

            cache.cleanup().await;
            let stats = cache.stats().await;
            assert_eq!(stats.total_entries, 1);
            assert_eq!(stats.active_entries, 1);

            cache.clear().await;
            assert_eq!(cache.stats().await.total_entries, 0);
        });
    }
}
