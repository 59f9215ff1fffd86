use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata, CacheWorker, HiveResult, HiveWorker, MetadataShape, Shape, WorkerBase,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    /// Default expiry for `set` without an explicit one. `<= 0` never expires.
    pub ttl_seconds: i64,
}

impl MetadataShape for CacheMetadata {
    fn shape() -> Shape {
        Shape::new().number("ttlSeconds", 0)
    }
}

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Returns the live value for `key`, evicting the entry when it has expired.
fn live_or_evict(
    entries: &mut HashMap<String, CacheEntry>,
    key: &str,
    now: Instant,
) -> Option<String> {
    match entries.get(key) {
        Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
        Some(_) => {
            entries.remove(key);
            None
        }
        None => None,
    }
}

/// In-process key/value cache with per-entry expiry.
pub struct MemoryCacheWorker {
    base: WorkerBase,
    default_ttl: i64,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            default_ttl: 0,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn expiry(&self, expire_seconds: Option<i64>) -> Option<Instant> {
        let seconds = expire_seconds.unwrap_or(self.default_ttl);
        if seconds <= 0 {
            return None;
        }
        // Too far out to represent is the same as never.
        Instant::now().checked_add(Duration::from_secs(seconds.unsigned_abs()))
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

impl Default for MemoryCacheWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for MemoryCacheWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        let checked: CacheMetadata = check_metadata(metadata, name)?;
        self.default_ttl = checked.ttl_seconds;
        self.base.set(name, metadata);
        debug!(worker = %name, ttl_seconds = checked.ttl_seconds, "Memory cache ready");
        Ok(())
    }

    async fn dispose(&self) -> HiveResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[async_trait]
impl CacheWorker for MemoryCacheWorker {
    async fn exists(&self, key: &str) -> HiveResult<bool> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now())))
    }

    async fn get(&self, key: &str) -> HiveResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        // A set may have landed between the two locks.
        let mut entries = self.entries.write().await;
        Ok(live_or_evict(&mut entries, key, Instant::now()))
    }

    async fn set(&self, key: &str, value: &str, expire_seconds: Option<i64>) -> HiveResult<bool> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: self.expiry(expire_seconds),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(true)
    }

    async fn remove(&self, key: &str) -> HiveResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn cache(ttl: i64) -> MemoryCacheWorker {
        let mut worker = MemoryCacheWorker::new();
        worker
            .init("cache1", &json!({ "ttlSeconds": ttl }))
            .await
            .unwrap();
        worker
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let cache = cache(0).await;
        assert!(cache.set("k", "v", None).await.unwrap());
        assert!(cache.exists("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
        assert!(cache.remove("k").await.unwrap());
        assert!(!cache.remove("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_negative_ttl_never_expires() {
        let cache = cache(-1).await;
        assert_eq!(cache.expiry(None), None);
        assert!(cache.expiry(Some(10)).is_some());
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible() {
        let cache = cache(0).await;
        cache.set("k", "v", None).await.unwrap();
        cache.entries.write().await.get_mut("k").unwrap().expires_at = Some(Instant::now());

        assert!(!cache.exists("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_huge_ttl_never_expires() {
        let cache = cache(i64::MAX).await;
        assert!(cache.set("a", "1", None).await.unwrap());
        assert!(cache.set("b", "2", Some(i64::MAX)).await.unwrap());

        assert_eq!(cache.get("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(cache.get("b").await.unwrap(), Some("2".to_string()));
        assert!(cache.exists("b").await.unwrap());
    }

    #[test]
    fn test_eviction_rechecks_entry_under_write_lock() {
        let now = Instant::now();
        let mut entries = HashMap::new();
        entries.insert(
            "fresh".to_string(),
            CacheEntry {
                value: "v2".to_string(),
                expires_at: None,
            },
        );
        entries.insert(
            "stale".to_string(),
            CacheEntry {
                value: "v1".to_string(),
                expires_at: Some(now),
            },
        );

        assert_eq!(live_or_evict(&mut entries, "fresh", now), Some("v2".to_string()));
        assert!(entries.contains_key("fresh"));
        assert_eq!(live_or_evict(&mut entries, "stale", now), None);
        assert!(!entries.contains_key("stale"));
        assert_eq!(live_or_evict(&mut entries, "missing", now), None);
    }

    #[tokio::test]
    async fn test_rejects_unknown_metadata_keys() {
        let mut worker = MemoryCacheWorker::new();
        let err = worker
            .init("cache1", &json!({ "ttlSeconds": 5, "host": "x" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cache1"));
    }
}
