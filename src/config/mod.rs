//! Configuration module for DayZero
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file is
//! the common case.
//!
//! # Example
//!
//! ```no_run
//! use dayzero::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("dayzero.toml")).unwrap();
//! println!("Serving on port {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheBackend, CacheConfig, Config, ServerConfig, UpstreamConfig, DEFAULT_UPSTREAM_URL,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
