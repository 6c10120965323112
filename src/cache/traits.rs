//! Cache traits and error types
//!
//! This module defines the trait interface for page cache backends and
//! associated error types.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache lock poisoned")]
    Poisoned,

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Short-lived byte store for raw upstream pages
///
/// Implementations are shared between concurrent requests, so every method
/// takes `&self` and backends synchronise internally.
pub trait PageCache: Send + Sync {
    /// Looks up a live entry
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - A non-expired entry exists
    /// * `Ok(None)` - No entry, or the entry has expired
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `value` under `key` unless a live entry is already present
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The value was stored
    /// * `Ok(false)` - Another writer got there first; the existing entry is kept
    fn put(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<bool>;
}

/// Converts a configured TTL in seconds into a `Duration`
///
/// Fails instead of wrapping or panicking when `secs` is beyond what
/// `chrono` can represent.
pub fn ttl_from_secs(secs: u64) -> CacheResult<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| CacheError::InvalidTtl(format!("ttl of {}s is out of range", secs)))
}

/// Computes when an entry stored at `now` stops being served
///
/// Rejects TTLs that would produce an already-expired entry or overflow the
/// timestamp.
pub(crate) fn expiry_from(now: DateTime<Utc>, ttl: Duration) -> CacheResult<DateTime<Utc>> {
    if ttl <= Duration::zero() {
        return Err(CacheError::InvalidTtl(format!(
            "ttl must be positive, got {}s",
            ttl.num_seconds()
        )));
    }
    now.checked_add_signed(ttl).ok_or_else(|| {
        CacheError::InvalidTtl(format!("ttl of {}s overflows the expiry time", ttl.num_seconds()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_from_secs() {
        assert_eq!(ttl_from_secs(3600).unwrap(), Duration::hours(1));
        assert!(matches!(ttl_from_secs(u64::MAX), Err(CacheError::InvalidTtl(_))));
        assert!(matches!(
            ttl_from_secs(i64::MAX as u64),
            Err(CacheError::InvalidTtl(_))
        ));
    }

    #[test]
    fn test_expiry_overflow_is_error() {
        let huge = Duration::try_seconds(i64::MAX / 1000).unwrap();
        assert!(matches!(
            expiry_from(Utc::now(), huge),
            Err(CacheError::InvalidTtl(_))
        ));
    }
}
