//! Bounded async cache for small, immutable payloads

use moka::future::Cache;
use std::hash::Hash;
use std::time::Duration;

/// Moka-backed cache shared by request handlers.
///
/// Holds the validated `/resumo` summary blobs keyed by summary name. Values
/// are cheap to clone (`Bytes`), so a hit never copies the document.
#[derive(Clone)]
pub struct AppCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<K, V>,
}

impl<K, V> AppCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Entries without a TTL stay for the process lifetime unless evicted by
    /// capacity; summary files are not expected to change while serving
    pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self { cache: builder.build() }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: K, value: V) {
        self.cache.insert(key, value).await;
    }

    pub async fn invalidate(&self, key: &K) {
        self.cache.invalidate(key).await;
    }

    /// Approximate; moka applies pending writes lazily
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    #[tokio::test]
    async fn test_blobs_are_shared_not_copied() {
        let cache: AppCache<&'static str, Bytes> = AppCache::new(8, None);
        let blob = Bytes::from_static(br#"[{"ano": 2020, "quantidade": 3}]"#);

        cache.insert("inscricoes", blob.clone()).await;

        let hit = cache.get(&"inscricoes").await.unwrap();
        assert_eq!(hit, blob);
        assert_eq!(hit.as_ptr(), blob.as_ptr());
        assert!(cache.get(&"saldo_cdas").await.is_none());

        cache.invalidate(&"inscricoes").await;
        assert!(cache.get(&"inscricoes").await.is_none());
    }

    #[tokio::test]
    async fn test_optional_ttl_expires_entries() {
        let cache: AppCache<&'static str, Bytes> = AppCache::new(8, Some(Duration::from_millis(100)));

        cache.insert("saldo_cdas", Bytes::from_static(b"[]")).await;
        assert!(cache.get(&"saldo_cdas").await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get(&"saldo_cdas").await.is_none());
    }
}
