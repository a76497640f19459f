//! In-memory result cache with a fixed time-to-live.
//!
//! Shared across all fetch operations to avoid redundant remote calls.
//! Keys are caller-built composite strings (series id + game number, etc.),
//! so correctness depends on keys being unique per distinct logical
//! request. Expired entries are not evicted eagerly: a stale entry is
//! simply ignored by `get` and overwritten by the next `set`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

struct CacheEntry {
    value: serde_json::Value,
    stored_at: Instant,
}

/// Mutex-guarded TTL map. Construct one per pipeline and pass it to the
/// fetchers; there is no global instance.
pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// Fetch a fresh entry, deserializing into the caller's type.
    /// Returns `None` on a miss, an expired entry, or a type mismatch.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            debug!(key, "cache entry expired");
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Store a value under the key, replacing any previous entry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                debug!(key, error = %e, "value not cacheable, skipping");
                return;
            }
        };
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, including stale ones.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
