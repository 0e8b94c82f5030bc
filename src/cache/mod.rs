//! Cache module for memoizing price snapshots
//!
//! The price service talks to its cache through the [`CacheStore`] trait so the
//! backing store can be swapped: [`CacheManager`] persists entries to disk,
//! [`MemoryCache`] keeps them in-process. Entries carry an expiry timestamp and
//! a set of tags; expired entries are still returned (with `is_expired = true`)
//! and it is up to the caller to decide whether stale data is usable.

mod manager;
mod memory;

pub use manager::CacheManager;
pub use memory::MemoryCache;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use thiserror::Error;

/// Longest time-to-live honoured (100 years); longer values are clamped
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Expiry timestamp for an entry written at `now` with the given TTL
pub(crate) fn expiry_after(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    now + Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64)
}

/// Errors raised by a cache store
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the backing storage failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The value could not be encoded or decoded
    #[error("Cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A previous holder of the store lock panicked
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Keyed store with time-to-live expiry and tag-based invalidation
pub trait CacheStore: Send + Sync {
    /// Reads the entry stored under `key`.
    ///
    /// Returns `Ok(None)` when there is no usable entry. Expired entries are
    /// returned with `is_expired = true`.
    fn get(&self, key: &str) -> Result<Option<CachedData<Value>>, CacheError>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &Value, ttl_secs: u64, tags: &[&str]) -> Result<(), CacheError>;

    /// Removes every entry tagged with `tag`, returning how many were dropped.
    fn invalidate_tag(&self, tag: &str) -> Result<usize, CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_after_adds_ttl() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, 300), now + Duration::seconds(300));
        assert_eq!(expiry_after(now, 0), now);
    }

    #[test]
    fn test_expiry_after_clamps_huge_ttl() {
        let now = Utc::now();
        let clamped = now + Duration::seconds(MAX_TTL_SECS as i64);
        assert_eq!(expiry_after(now, u64::MAX), clamped);
        assert_eq!(expiry_after(now, i64::MAX as u64), clamped);
    }
}
