// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Two-tier cache for coarse entity lists
//!
//! Site and person lists are expensive to assemble and change rarely, so
//! they are memoized in memory for the session and persisted as timestamped
//! JSON files across sessions. Entries older than the validity window count
//! as absent and are evicted on read. The durable tier is strictly
//! best-effort and downgrades to memory-only behavior, never to an error.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

const DEFAULT_TTL_HOURS: u64 = 24;

/// Configuration for the entity list cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Durable tier directory; resolved from the platform cache dir when
    /// absent, memory-only when that fails too
    pub dir: Option<PathBuf>,
    /// Validity window for cached entries
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl: Duration::from_secs(DEFAULT_TTL_HOURS * 60 * 60),
        }
    }
}

/// A timestamped cache entry; identical shape in memory and on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedEntry {
    /// Write time, epoch milliseconds
    timestamp: i64,
    /// The cached value
    data: Value,
}

impl CachedEntry {
    fn new(data: Value) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            data,
        }
    }

    fn is_valid(&self, ttl: Duration) -> bool {
        let age_ms = Utc::now().timestamp_millis().saturating_sub(self.timestamp);
        age_ms >= 0 && u128::try_from(age_ms).is_ok_and(|age| age < ttl.as_millis())
    }
}

/// Time-boxed key-value cache with an in-memory and a durable JSON tier.
#[derive(Debug)]
pub struct EntityCache {
    memory: DashMap<String, CachedEntry>,
    dir: Option<PathBuf>,
    ttl: Duration,
}

impl EntityCache {
    /// Create a cache, resolving and creating the durable directory.
    pub fn new(config: CacheConfig) -> Self {
        let dir = config.dir.or_else(default_cache_dir).and_then(|dir| {
            match fs::create_dir_all(&dir) {
                Ok(()) => Some(dir),
                Err(error) => {
                    warn!(%error, dir = %dir.display(), "cache dir unavailable, memory-only");
                    None
                }
            }
        });

        Self {
            memory: DashMap::new(),
            dir,
            ttl: config.ttl,
        }
    }

    /// Get a cached value; expired entries count as absent and are evicted.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(entry) = self.memory.get(key) {
            if entry.is_valid(self.ttl) {
                trace!(key, "cache hit (memory)");
                return serde_json::from_value(entry.data.clone()).ok();
            }
            drop(entry);
            self.memory.remove(key);
            debug!(key, "expired memory cache entry removed");
        }

        let entry = self.read_durable(key)?;
        if !entry.is_valid(self.ttl) {
            debug!(key, "expired durable cache entry evicted");
            self.evict_durable(key);
            return None;
        }

        trace!(key, "cache hit (durable)");
        let value = serde_json::from_value(entry.data.clone()).ok()?;
        self.memory.insert(key.to_string(), entry);
        Some(value)
    }

    /// Store a value in both tiers; durable failures are swallowed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(error) => {
                debug!(key, %error, "value not cacheable");
                return;
            }
        };

        let entry = CachedEntry::new(data);
        self.write_durable(key, &entry);
        self.memory.insert(key.to_string(), entry);
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{key}.json")))
    }

    fn read_durable(&self, key: &str) -> Option<CachedEntry> {
        let path = self.entry_path(key)?;
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(error) => {
                debug!(key, %error, "unreadable durable cache entry dropped");
                self.evict_durable(key);
                None
            }
        }
    }

    fn write_durable(&self, key: &str, entry: &CachedEntry) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        let payload = match serde_json::to_vec(entry) {
            Ok(payload) => payload,
            Err(_) => return,
        };
        if let Err(error) = fs::write(&path, payload) {
            debug!(key, %error, "durable cache write failed (best effort)");
        }
    }

    fn evict_durable(&self, key: &str) {
        if let Some(path) = self.entry_path(key) {
            let _ = fs::remove_file(path);
        }
    }
}

fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("ai", "semiotic", "heritage-atlas")
        .map(|dirs| dirs.cache_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn cache_in(dir: &TempDir, ttl: Duration) -> EntityCache {
        EntityCache::new(CacheConfig {
            dir: Some(dir.path().to_path_buf()),
            ttl,
        })
    }

    #[test]
    fn round_trips_through_both_tiers() {
        let dir = TempDir::new().expect("tempdir");
        let cache = cache_in(&dir, Duration::from_secs(60));

        assert_eq!(cache.get::<Vec<String>>("sites"), None);
        cache.set("sites", &vec!["Chợ Hàn".to_string()]);
        assert_eq!(
            cache.get::<Vec<String>>("sites"),
            Some(vec!["Chợ Hàn".to_string()])
        );

        // A fresh cache over the same directory reads the durable tier.
        let rehydrated = cache_in(&dir, Duration::from_secs(60));
        assert_eq!(
            rehydrated.get::<Vec<String>>("sites"),
            Some(vec!["Chợ Hàn".to_string()])
        );
    }

    #[test]
    fn durable_entries_use_the_documented_wire_shape() {
        let dir = TempDir::new().expect("tempdir");
        let cache = cache_in(&dir, Duration::from_secs(60));
        cache.set("persons", &vec![1, 2, 3]);

        let bytes = fs::read(dir.path().join("persons.json")).expect("entry file");
        let raw: Value = serde_json::from_slice(&bytes).expect("entry json");
        assert!(raw["timestamp"].is_i64());
        assert_eq!(raw["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn expired_entries_are_absent_and_evicted() {
        let dir = TempDir::new().expect("tempdir");
        let cache = cache_in(&dir, Duration::from_millis(0));
        cache.set("sites", &vec![1]);

        assert_eq!(cache.get::<Vec<i32>>("sites"), None);
        assert!(!dir.path().join("sites.json").exists());
    }

    #[test]
    fn corrupt_durable_entries_are_dropped() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("sites.json"), b"not json").expect("write");

        let cache = cache_in(&dir, Duration::from_secs(60));
        assert_eq!(cache.get::<Vec<i32>>("sites"), None);
        assert!(!dir.path().join("sites.json").exists());
    }

    #[test]
    fn memory_only_when_no_directory_resolves() {
        let cache = EntityCache {
            memory: DashMap::new(),
            dir: None,
            ttl: Duration::from_secs(60),
        };
        cache.set("sites", &vec![1]);
        assert_eq!(cache.get::<Vec<i32>>("sites"), Some(vec![1]));
    }
}
