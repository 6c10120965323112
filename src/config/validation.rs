use crate::config::types::{CacheBackend, CacheConfig, Config, ServerConfig, UpstreamConfig};
use crate::ConfigError;
use url::Url;

/// Longest a cached page may stay fresh (one year)
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 3600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_upstream_config(&config.upstream)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Validation("port must be >= 1".to_string()));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates upstream configuration
fn validate_upstream_config(config: &UpstreamConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid upstream url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Upstream url '{}' must use http or https",
            config.url
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    if config.ttl_secs == 0 || config.ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(ConfigError::Validation(format!(
            "ttl_secs must be between 1 and {}, got {}",
            MAX_CACHE_TTL_SECS, config.ttl_secs
        )));
    }

    if config.key.is_empty() {
        return Err(ConfigError::Validation(
            "cache key cannot be empty".to_string(),
        ));
    }

    if config.backend == CacheBackend::Sqlite && config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty for the sqlite backend".to_string(),
        ));
    }

    Ok(())
}
