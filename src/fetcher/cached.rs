//! Cache-aware fetching

use crate::cache::PageCache;
use crate::fetcher::http::{fetch, FetchError};
use chrono::Duration;
use reqwest::Client;
use std::sync::Arc;

/// Fetches the page, consulting `cache` first
///
/// On a hit the stored bytes are returned without touching the network. On a
/// miss the page is fetched and offered to the cache with an add-if-absent
/// write. Cache failures never fail the fetch: a read error is treated as a
/// miss and a write error (or a lost race with a concurrent writer) is only
/// logged.
///
/// Cache backends may block (SQLite waits on locks held by other processes),
/// so every cache call runs on tokio's blocking pool.
///
/// # Returns
///
/// * `Ok((bytes, true))` - Served from cache
/// * `Ok((bytes, false))` - Freshly fetched
/// * `Err(FetchError)` - Cache miss and the fetch failed
pub async fn fetch_cached(
    client: &Client,
    url: &str,
    cache: Arc<dyn PageCache>,
    key: &str,
    ttl: Duration,
) -> Result<(Vec<u8>, bool), FetchError> {
    let lookup = {
        let cache = Arc::clone(&cache);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || cache.get(&key)).await
    };

    match lookup {
        Ok(Ok(Some(bytes))) => {
            tracing::debug!("Cache hit for {}", key);
            return Ok((bytes, true));
        }
        Ok(Ok(None)) => tracing::debug!("Cache miss for {}", key),
        Ok(Err(e)) => tracing::warn!("Cache read failed for {}, fetching: {}", key, e),
        Err(e) => tracing::warn!("Cache read task failed for {}, fetching: {}", key, e),
    }

    let bytes = fetch(client, url).await?;

    let store = {
        let key = key.to_string();
        let value = bytes.clone();
        tokio::task::spawn_blocking(move || cache.put(&key, &value, ttl)).await
    };

    match store {
        Ok(Ok(true)) => tracing::debug!("Cached {} bytes under {}", bytes.len(), key),
        Ok(Ok(false)) => tracing::debug!("Entry for {} already populated", key),
        Ok(Err(e)) => tracing::warn!("Cache write failed for {}: {}", key, e),
        Err(e) => tracing::warn!("Cache write task failed for {}: {}", key, e),
    }

    Ok((bytes, false))
}
