//! In-process cache store
//!
//! Same semantics as the disk-backed `CacheManager` but kept in a map for the
//! lifetime of the process.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{expiry_after, CacheError, CacheStore, CachedData};

#[derive(Debug, Clone)]
struct MemoryEntry {
    data: Value,
    tags: Vec<String>,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Cache store backed by a mutex-guarded map
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CachedData<Value>>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

        Ok(entries.get(key).map(|entry| CachedData {
            data: entry.data.clone(),
            cached_at: entry.cached_at,
            is_expired: Utc::now() > entry.expires_at,
        }))
    }

    fn set(&self, key: &str, value: &Value, ttl_secs: u64, tags: &[&str]) -> Result<(), CacheError> {
        let now = Utc::now();
        let entry = MemoryEntry {
            data: value.clone(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            cached_at: now,
            expires_at: expiry_after(now, ttl_secs),
        };

        self.entries
            .lock()
            .map_err(|_| CacheError::Poisoned)?
            .insert(key.to_string(), entry);
        Ok(())
    }

    fn invalidate_tag(&self, tag: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_get_missing_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing").unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_get_is_fresh() {
        let cache = MemoryCache::new();
        cache.set("k", &json!({ "a": 1 }), 300, &["t"]).unwrap();

        let cached = cache.get("k").unwrap().expect("entry should exist");
        assert_eq!(cached.data, json!({ "a": 1 }));
        assert!(!cached.is_expired);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires() {
        let cache = MemoryCache::new();
        cache.set("k", &json!(1), 0, &[]).unwrap();
        thread::sleep(StdDuration::from_millis(10));

        assert!(cache.get("k").unwrap().unwrap().is_expired);
    }

    #[test]
    fn test_huge_ttl_does_not_panic() {
        let cache = MemoryCache::new();
        cache.set("k", &json!(1), u64::MAX, &[]).unwrap();

        assert!(!cache.get("k").unwrap().unwrap().is_expired);
    }

    #[test]
    fn test_invalidate_tag() {
        let cache = MemoryCache::new();
        cache.set("a", &json!(1), 300, &["solana", "cryptocurrency"]).unwrap();
        cache.set("b", &json!(2), 300, &["cryptocurrency"]).unwrap();
        cache.set("c", &json!(3), 300, &[]).unwrap();

        assert_eq!(cache.invalidate_tag("solana").unwrap(), 1);
        assert_eq!(cache.invalidate_tag("cryptocurrency").unwrap(), 1);
        assert_eq!(cache.invalidate_tag("unknown").unwrap(), 0);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("c").unwrap().is_some());
    }
}
