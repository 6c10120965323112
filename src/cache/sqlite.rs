//! SQLite cache implementation
//!
//! This module provides a SQLite-backed page cache. Several server processes
//! on the same host can point at one database file and share fetched pages.

use crate::cache::schema::initialize_schema;
use crate::cache::traits::{expiry_from, CacheError, CacheResult, PageCache};
use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite page cache backend
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Opens or creates a cache database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCache)` - Successfully opened/created database
    /// * `Err(CacheError)` - Failed to open database
    pub fn new(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl PageCache for SqliteCache {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        let now = Utc::now().timestamp_millis();

        let value = conn
            .query_row(
                "SELECT value FROM page_cache WHERE key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;

        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<bool> {
        let now = Utc::now();
        let expires_at = expiry_from(now, ttl)?.timestamp_millis();
        let now = now.timestamp_millis();

        let mut conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;

        let tx = conn.transaction()?;

        // An expired row must not block the insert below
        tx.execute(
            "DELETE FROM page_cache WHERE key = ?1 AND expires_at <= ?2",
            params![key, now],
        )?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO page_cache (key, value, stored_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, value, now, expires_at],
        )?;

        tx.commit()?;

        Ok(inserted == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn expire(cache: &SqliteCache, key: &str) {
        let past = (Utc::now() - Duration::seconds(5)).timestamp_millis();
        cache
            .conn
            .lock()
            .unwrap()
            .execute(
                "UPDATE page_cache SET expires_at = ?1 WHERE key = ?2",
                params![past, key],
            )
            .unwrap();
    }

    #[test]
    fn test_get_missing_key() {
        let cache = SqliteCache::new_in_memory().unwrap();
        assert_eq!(cache.get("api/dashboard").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let cache = SqliteCache::new_in_memory().unwrap();
        assert!(cache
            .put("api/dashboard", b"<html></html>", Duration::hours(1))
            .unwrap());
        assert_eq!(
            cache.get("api/dashboard").unwrap(),
            Some(b"<html></html>".to_vec())
        );
    }

    #[test]
    fn test_put_is_add_if_absent() {
        let cache = SqliteCache::new_in_memory().unwrap();
        assert!(cache.put("k", b"first", Duration::hours(1)).unwrap());
        assert!(!cache.put("k", b"second", Duration::hours(1)).unwrap());
        assert_eq!(cache.get("k").unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn test_expired_entry_is_replaced() {
        let cache = SqliteCache::new_in_memory().unwrap();
        cache.put("k", b"old", Duration::hours(1)).unwrap();
        expire(&cache, "k");

        assert_eq!(cache.get("k").unwrap(), None);
        assert!(cache.put("k", b"new", Duration::hours(1)).unwrap());
        assert_eq!(cache.get("k").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn test_overflowing_ttl_is_rejected() {
        let cache = SqliteCache::new_in_memory().unwrap();
        let huge = Duration::try_seconds(i64::MAX / 1000).unwrap();

        assert!(matches!(
            cache.put("k", b"v", huge),
            Err(CacheError::InvalidTtl(_))
        ));
        assert!(cache.put("k", b"v", Duration::hours(1)).unwrap());
    }

    #[test]
    fn test_shared_file_between_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.db");

        let first = SqliteCache::new(&path).unwrap();
        let second = SqliteCache::new(&path).unwrap();

        assert!(first.put("k", b"page", Duration::hours(1)).unwrap());
        assert!(!second.put("k", b"other", Duration::hours(1)).unwrap());
        assert_eq!(second.get("k").unwrap(), Some(b"page".to_vec()));
    }
}
