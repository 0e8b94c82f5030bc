//! Cache manager for persisting cache entries to disk
//!
//! Provides a `CacheManager` that stores JSON values in files with expiry
//! timestamps and tags, one file per key.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{expiry_after, CacheError, CacheStore, CachedData};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// The cached data
    data: Value,
    /// Tags used for group invalidation
    #[serde(default)]
    tags: Vec<String>,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/solprice/` on Linux). Each cache entry includes an expiry timestamp,
/// and expired entries are still returned (with `is_expired = true`).
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "solprice")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Loads the raw entry for a cache file.
    ///
    /// A missing file is `Ok(None)`. A file that no longer parses is treated as
    /// a miss so the next write replaces it.
    fn load_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }
}

impl CacheStore for CacheManager {
    fn get(&self, key: &str) -> Result<Option<CachedData<Value>>, CacheError> {
        let Some(entry) = Self::load_entry(&self.cache_path(key))? else {
            return Ok(None);
        };

        let is_expired = Utc::now() > entry.expires_at;

        Ok(Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired,
        }))
    }

    fn set(&self, key: &str, value: &Value, ttl_secs: u64, tags: &[&str]) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let now = Utc::now();
        let entry = CacheEntry {
            data: value.clone(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            cached_at: now,
            expires_at: expiry_after(now, ttl_secs),
        };

        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.cache_path(key), json)?;
        Ok(())
    }

    fn invalidate_tag(&self, tag: &str) -> Result<usize, CacheError> {
        let dir = match fs::read_dir(&self.cache_dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for dir_entry in dir {
            let path = match dir_entry {
                Ok(dir_entry) => dir_entry.path(),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable cache directory entry");
                    continue;
                }
            };
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let entry = match Self::load_entry(&path) {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable cache entry");
                    continue;
                }
            };

            if entry.tags.iter().any(|t| t == tag) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
