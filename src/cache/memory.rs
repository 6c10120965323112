//! In-process cache implementation

use crate::cache::traits::{expiry_from, CacheError, CacheResult, PageCache};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A cached page along with when it stops being served
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Page cache held in process memory
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl PageCache for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let now = Utc::now();

        let live = entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone());

        if live.is_none() {
            entries.remove(key);
        }

        Ok(live)
    }

    fn put(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<bool> {
        let now = Utc::now();
        let expires_at = expiry_from(now, ttl)?;

        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;

        if let Some(existing) = entries.get(key) {
            if !existing.is_expired(now) {
                return Ok(false);
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(true)
    }
}
