//! DayZero: a Cape Town water dashboard republisher
//!
//! This crate fetches the City of Cape Town water dashboard page, extracts the
//! water-supply statistics it shows, and serves them as a JSON snapshot.

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod server;

use thiserror::Error;

/// Main error type for DayZero operations
#[derive(Debug, Error)]
pub enum DayZeroError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] fetcher::FetchError),

    #[error(transparent)]
    Parse(#[from] extract::ParseError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for DayZero operations
pub type Result<T> = std::result::Result<T, DayZeroError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{MemoryCache, PageCache, SqliteCache};
pub use config::Config;
pub use extract::{parse, Snapshot};
pub use fetcher::{fetch, fetch_cached};
