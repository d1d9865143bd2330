//! Two-tier price cache: an in-memory map fronting a single on-disk
//! `metadata.json`. Keys are the SHA-256 of the canonical query params, so
//! callers never need to pre-sort filters.

use crate::debug_log;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const DEFAULT_TTL_HOURS: u64 = 24;

/// A single pricing lookup, identified by service, region, and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQueryParams {
    pub service_code: String,
    pub region: String,
    pub filters: Vec<(String, String)>,
}

impl PriceQueryParams {
    pub fn new(service_code: impl Into<String>, region: impl Into<String>, filters: Vec<(String, String)>) -> Self {
        Self {
            service_code: service_code.into(),
            region: region.into(),
            filters,
        }
    }

    /// Stable cache key: canonical JSON with filters sorted lexicographically
    /// by `(field, value)`, hashed with SHA-256.
    pub fn cache_key(&self) -> String {
        let mut filters = self.filters.clone();
        filters.sort();
        let canonical = serde_json::json!({
            "service_code": self.service_code,
            "region": self.region,
            "filters": filters,
        });
        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPriceEntry {
    price: f64,
    /// Epoch milliseconds.
    timestamp: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: HashMap<String, CachedPriceEntry>,
}

pub struct CacheManager {
    path: PathBuf,
    ttl_millis: u64,
    state: Mutex<CacheFile>,
}

impl CacheManager {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self::with_ttl_hours(cache_dir, DEFAULT_TTL_HOURS)
    }

    pub fn with_ttl_hours(cache_dir: impl AsRef<Path>, ttl_hours: u64) -> Self {
        let path = cache_dir.as_ref().join("metadata.json");
        let state = load(&path);
        Self {
            path,
            ttl_millis: ttl_hours * 3600 * 1000,
            state: Mutex::new(state),
        }
    }

    pub fn get_cached_price(&self, params: &PriceQueryParams) -> Option<f64> {
        let guard = self.state.lock().expect("cache lock poisoned");
        let entry = guard.entries.get(&params.cache_key())?;
        if now() - entry.timestamp < self.ttl_millis {
            Some(entry.price)
        } else {
            None
        }
    }

    /// Returns the cached price even if stale, for use as a last-resort
    /// fallback when the catalog is unreachable.
    pub fn get_stale_price(&self, params: &PriceQueryParams) -> Option<f64> {
        let guard = self.state.lock().expect("cache lock poisoned");
        guard.entries.get(&params.cache_key()).map(|e| e.price)
    }

    pub fn has_fresh_cache(&self, params: &PriceQueryParams) -> bool {
        self.get_cached_price(params).is_some()
    }

    pub fn set_cached_price(&self, params: &PriceQueryParams, price: f64) {
        let mut guard = self.state.lock().expect("cache lock poisoned");
        guard.entries.insert(
            params.cache_key(),
            CachedPriceEntry {
                price,
                timestamp: now(),
            },
        );
        if let Err(e) = save(&self.path, &guard) {
            debug_log!("failed to persist pricing cache to {:?}: {e}", self.path);
        }
    }

    pub fn prune_stale_entries(&self) {
        let mut guard = self.state.lock().expect("cache lock poisoned");
        let ttl = self.ttl_millis;
        let cutoff = now();
        guard.entries.retain(|_, e| cutoff - e.timestamp < ttl);
        let _ = save(&self.path, &guard);
    }
}

/// Current time as epoch milliseconds, matching the on-disk `timestamp` field.
fn now() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

fn load(path: &Path) -> CacheFile {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|_| {
            debug_log!("pricing cache at {:?} is corrupt, starting empty", path);
            CacheFile::default()
        }),
        Err(_) => CacheFile::default(),
    }
}

fn save(path: &Path, state: &CacheFile) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn params(filters: Vec<(&str, &str)>) -> PriceQueryParams {
        PriceQueryParams::new(
            "AmazonEC2",
            "us-east-1",
            filters.into_iter().map(|(f, v)| (f.to_string(), v.to_string())).collect(),
        )
    }

    #[test]
    fn cache_key_is_independent_of_filter_order() {
        let a = params(vec![("instanceType", "t3.micro"), ("tenancy", "shared")]);
        let b = params(vec![("tenancy", "shared"), ("instanceType", "t3.micro")]);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn different_filters_produce_different_keys() {
        let a = params(vec![("instanceType", "t3.micro")]);
        let b = params(vec![("instanceType", "t3.large")]);
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn round_trips_through_memory() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path());
        let p = params(vec![("instanceType", "t3.micro")]);
        assert!(cache.get_cached_price(&p).is_none());
        cache.set_cached_price(&p, 12.34);
        assert_eq!(cache.get_cached_price(&p), Some(12.34));
    }

    #[test]
    fn persists_to_disk_across_instances() {
        let dir = tempdir().unwrap();
        let p = params(vec![("instanceType", "m5.large")]);
        {
            let cache = CacheManager::new(dir.path());
            cache.set_cached_price(&p, 70.0);
        }
        let reloaded = CacheManager::new(dir.path());
        assert_eq!(reloaded.get_cached_price(&p), Some(70.0));
    }

    #[test]
    fn corrupt_cache_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.json"), "not json").unwrap();
        let cache = CacheManager::new(dir.path());
        let p = params(vec![("x", "y")]);
        assert!(cache.get_cached_price(&p).is_none());
    }

    #[test]
    fn stale_price_is_still_retrievable() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::with_ttl_hours(dir.path(), 0);
        let p = params(vec![("instanceType", "t3.micro")]);
        cache.set_cached_price(&p, 5.0);
        assert!(cache.get_cached_price(&p).is_none());
        assert_eq!(cache.get_stale_price(&p), Some(5.0));
    }
}
