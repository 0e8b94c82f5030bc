//! Cached price snapshot service
//!
//! `PriceService` combines the CoinGecko client, the formatter and an optional
//! cache store. The public entry point, [`PriceService::get_snapshot`], never
//! fails: it tries the cached path first and drops to an uncached fetch when
//! that path does not produce a value, returning the placeholder snapshot if
//! no data can be obtained at all.

use std::sync::Arc;

use crate::cache::{CacheError, CacheStore};
use crate::data::{CoinGeckoClient, PriceSnapshot};

/// Key the snapshot is cached under
pub const CACHE_KEY: &str = "solana-price-data";

/// Tags attached to the cached snapshot
pub const CACHE_TAGS: [&str; 2] = ["solana", "cryptocurrency"];

/// Revalidation window for cached snapshots, in seconds
pub const REVALIDATE_SECS: u64 = 300;

/// Outcome of the cached path
#[derive(Debug)]
pub enum CacheOutcome {
    /// A live cached snapshot was found
    Hit(PriceSnapshot),
    /// A fresh snapshot was fetched and stored
    Stored(PriceSnapshot),
    /// No data could be fetched, so nothing was stored
    Skip,
    /// The cache store itself failed
    Failure(CacheError),
}

/// Serves the market snapshot, memoized through a cache store when one is set
pub struct PriceService {
    client: CoinGeckoClient,
    cache: Option<Arc<dyn CacheStore>>,
    revalidate_secs: u64,
}

impl PriceService {
    /// Creates a service without a cache; every call goes upstream
    pub fn new(client: CoinGeckoClient) -> Self {
        Self {
            client,
            cache: None,
            revalidate_secs: REVALIDATE_SECS,
        }
    }

    /// Creates a service memoizing through the given cache store
    pub fn with_cache(client: CoinGeckoClient, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            client,
            cache: Some(cache),
            revalidate_secs: REVALIDATE_SECS,
        }
    }

    /// Overrides the revalidation window
    pub fn with_revalidate_secs(mut self, secs: u64) -> Self {
        self.revalidate_secs = secs;
        self
    }

    /// Returns the current snapshot, fresh, cached or placeholder.
    pub async fn get_snapshot(&self) -> PriceSnapshot {
        let Some(cache) = self.cache.as_deref() else {
            return self.fallback_snapshot().await;
        };

        match self.cached_snapshot(cache).await {
            CacheOutcome::Hit(snapshot) | CacheOutcome::Stored(snapshot) => snapshot,
            CacheOutcome::Skip => {
                tracing::info!("cache skipped, fetching without cache");
                self.fallback_snapshot().await
            }
            CacheOutcome::Failure(e) => {
                tracing::warn!(error = %e, "cache unavailable, fetching without cache");
                self.fallback_snapshot().await
            }
        }
    }

    /// Cached path: serve a live entry, or fetch and store a fresh one.
    ///
    /// Absent data is never stored.
    pub async fn cached_snapshot(&self, cache: &dyn CacheStore) -> CacheOutcome {
        match cache.get(CACHE_KEY) {
            Ok(Some(cached)) if !cached.is_expired => {
                match serde_json::from_value::<PriceSnapshot>(cached.data) {
                    Ok(snapshot) => {
                        tracing::debug!(key = CACHE_KEY, cached_at = %cached.cached_at, "cache hit");
                        return CacheOutcome::Hit(snapshot);
                    }
                    Err(e) => {
                        tracing::warn!(key = CACHE_KEY, error = %e, "cached snapshot has unexpected shape");
                    }
                }
            }
            Ok(Some(_)) => tracing::debug!(key = CACHE_KEY, "cache entry expired"),
            Ok(None) => tracing::debug!(key = CACHE_KEY, "cache miss"),
            Err(e) => return CacheOutcome::Failure(e),
        }

        let Some(snapshot) = self.load_snapshot().await else {
            return CacheOutcome::Skip;
        };

        let stored = serde_json::to_value(&snapshot)
            .map_err(CacheError::from)
            .and_then(|value| cache.set(CACHE_KEY, &value, self.revalidate_secs, &CACHE_TAGS));

        match stored {
            Ok(()) => CacheOutcome::Stored(snapshot),
            Err(e) => CacheOutcome::Failure(e),
        }
    }

    /// Fallback path: fetch without caching, placeholder on failure
    pub async fn fallback_snapshot(&self) -> PriceSnapshot {
        match self.load_snapshot().await {
            Some(snapshot) => snapshot,
            None => {
                tracing::warn!("no market data available, returning placeholder snapshot");
                PriceSnapshot::placeholder()
            }
        }
    }

    /// Fetches and formats the snapshot, logging and discarding any error
    pub async fn load_snapshot(&self) -> Option<PriceSnapshot> {
        match self.client.fetch_quote().await {
            Ok(quote) => Some(PriceSnapshot::from(&quote)),
            Err(e) => {
                tracing::error!(error = %e, data_shape = e.is_data_shape(), "error fetching Solana data");
                None
            }
        }
    }

    /// Drops cached entries carrying `tag`, returning how many were removed.
    ///
    /// A service without a cache has nothing to drop.
    pub fn invalidate(&self, tag: &str) -> Result<usize, CacheError> {
        match self.cache.as_deref() {
            Some(cache) => cache.invalidate_tag(tag),
            None => Ok(0),
        }
    }
}
