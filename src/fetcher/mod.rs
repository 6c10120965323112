//! Fetcher module for retrieving the raw dashboard page
//!
//! This module contains the upstream I/O, including:
//! - HTTP client construction with a bounded timeout
//! - Plain GET fetches with status checking
//! - Cache-aware fetches backed by a `PageCache`

mod cached;
mod http;

pub use cached::fetch_cached;
pub use http::{build_http_client, fetch, FetchError};
