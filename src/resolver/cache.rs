use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};

/// Key/value store for resolution results
#[async_trait]
pub trait ResolutionCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration);

    async fn invalidate(&self, key: &str);
}

/// Entry carrying its own time-to-live
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache backed by moka
#[derive(Clone)]
pub struct MokaResolutionCache {
    entries: Cache<String, Entry>,
}

impl MokaResolutionCache {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }

    /// Number of live entries (approximate until pending tasks run)
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for MokaResolutionCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl ResolutionCache for MokaResolutionCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.entries
            .insert(key.to_string(), Entry { value, ttl })
            .await;
    }

    async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MokaResolutionCache::new(10);
        cache.set("1:pahe", "abc".to_string(), Duration::from_secs(60)).await;

        assert_eq!(cache.get("1:pahe").await.as_deref(), Some("abc"));
        assert_eq!(cache.get("2:pahe").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = MokaResolutionCache::new(10);
        cache.set("k", "v".to_string(), Duration::from_millis(20)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = MokaResolutionCache::default();
        cache.set("a", "1".to_string(), Duration::from_secs(60)).await;
        cache.set("b", "2".to_string(), Duration::from_secs(60)).await;

        cache.invalidate("a").await;
        assert_eq!(cache.get("a").await, None);

        cache.clear();
        assert_eq!(cache.get("b").await, None);
    }
}
