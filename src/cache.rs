//! Time-boxed cache in front of expensive shared upstream calls.

use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;

/// Default lifetime of an entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Process-lifetime get-or-compute cache with a fixed TTL.
///
/// Entries are never invalidated explicitly: once the TTL passes the next
/// caller pays the fetch and refills the slot. Errors are not cached, so a
/// failed fetch is retried by the next caller. Concurrent callers of a cold
/// key are coalesced by moka into a single computation.
#[derive(Clone)]
pub struct ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
}

impl<K, V> ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder().max_capacity(64).time_to_live(ttl).build();
        Self { inner }
    }

    /// Returns the cached value for `key`, or runs `compute` and stores its
    /// result when the slot is empty or expired.
    pub async fn get_or_compute<F>(&self, key: K, compute: F) -> Result<V>
    where
        F: Future<Output = Result<V>>,
    {
        self.inner
            .try_get_with(key, compute)
            .await
            .map_err(|e| anyhow::anyhow!("{:#}", e))
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache: ResultCache<&'static str, u64> = ResultCache::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let value = cache
                .get_or_compute("overview", async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResultCache<&'static str, u64> = ResultCache::new(DEFAULT_TTL);

        let first = cache
            .get_or_compute("overview", async { Err(anyhow::anyhow!("upstream 503")) })
            .await;
        assert!(first.is_err());
        assert!(cache.get(&"overview").await.is_none());

        let second = cache.get_or_compute("overview", async { Ok(7) }).await.unwrap();
        assert_eq!(second, 7);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache: ResultCache<&'static str, u64> = ResultCache::new(Duration::from_millis(50));

        cache.get_or_compute("overview", async { Ok(1) }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        let refreshed = cache.get_or_compute("overview", async { Ok(2) }).await.unwrap();
        assert_eq!(refreshed, 2);
    }
}
