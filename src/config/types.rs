use serde::Deserialize;

/// Main configuration structure for DayZero
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Outer bound on handling a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            request_timeout_secs: 60,
        }
    }
}

/// Source page configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// URL of the water dashboard page
    pub url: String,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User agent sent with each fetch
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("dayzero/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// The City of Cape Town water dashboard
pub const DEFAULT_UPSTREAM_URL: &str = "http://coct.co/water-dashboard/";

/// Which store backs the page cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Sqlite,
}

/// Raw page cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    pub backend: CacheBackend,

    /// Path to the SQLite database file (sqlite backend only)
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// How long a fetched page stays fresh (seconds)
    #[serde(rename = "ttl-secs")]
    pub ttl_secs: u64,

    /// Key the raw page is stored under
    pub key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::Memory,
            database_path: "./dayzero-cache.db".to_string(),
            ttl_secs: 3600,
            key: "api/dashboard".to_string(),
        }
    }
}
