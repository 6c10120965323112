//! Page cache module
//!
//! This module holds short-lived copies of the raw upstream page so repeated
//! dashboard requests do not hit the city's server every time:
//! - `PageCache` trait with add-if-absent writes
//! - In-process `MemoryCache`
//! - `SqliteCache` for sharing between processes

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
pub use traits::{ttl_from_secs, CacheError, CacheResult, PageCache};

use crate::config::{CacheBackend, CacheConfig};
use std::path::Path;
use std::sync::Arc;

/// Builds the cache described by the configuration
///
/// # Returns
///
/// * `Ok(None)` - Caching is disabled
/// * `Ok(Some(cache))` - The configured backend
/// * `Err(CacheError)` - The backend could not be opened
pub fn open_cache(config: &CacheConfig) -> CacheResult<Option<Arc<dyn PageCache>>> {
    if !config.enabled {
        return Ok(None);
    }

    let cache: Arc<dyn PageCache> = match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Sqlite => Arc::new(SqliteCache::new(Path::new(&config.database_path))?),
    };

    Ok(Some(cache))
}
