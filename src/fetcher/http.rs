//! HTTP fetcher implementation
//!
//! This module handles the single upstream request the service makes:
//! - Building an HTTP client with the configured user agent and timeouts
//! - GET requests for the dashboard page
//! - Error classification

use crate::config::UpstreamConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching the upstream page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("bad status: {status}")]
    Status { url: String, status: String },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The upstream configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use dayzero::config::UpstreamConfig;
/// use dayzero::fetcher::build_http_client;
///
/// let client = build_http_client(&UpstreamConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the page at `url` and returns its body
///
/// Any non-2xx status is a failure carrying the status line. No retries are
/// attempted; the caller sees one error per failed request.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The full response body
/// * `Err(FetchError)` - Transport failure, timeout or bad status
pub async fn fetch(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Upstream {} returned {}", url, status);
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| classify_error(url, e))?;

    tracing::debug!("Fetched {} bytes from {}", body.len(), url);

    Ok(body.to_vec())
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
