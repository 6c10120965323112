//! DayZero main entry point
//!
//! This is the command-line interface for the DayZero dashboard service.

use clap::Parser;
use dayzero::config::{load_config, validate, Config};
use dayzero::fetcher::{build_http_client, fetch};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// DayZero: Cape Town water dashboard as JSON
///
/// Fetches the City of Cape Town water dashboard, extracts dam levels,
/// consumption figures, project progress and the projected day zero, and
/// serves them at /api/dashboard.
#[derive(Parser, Debug)]
#[command(name = "dayzero")]
#[command(version)]
#[command(about = "Cape Town water dashboard as JSON", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch the live page once, print the snapshot and exit
    #[arg(long, conflicts_with = "parse_file")]
    once: bool,

    /// Parse a saved copy of the page, print the snapshot and exit
    #[arg(long, value_name = "FILE", conflicts_with = "once")]
    parse_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?
        }
        None => Config::default(),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    validate(&config)?;

    if let Some(path) = &cli.parse_file {
        handle_parse_file(path)?;
    } else if cli.once {
        handle_once(&config).await?;
    } else {
        dayzero::server::serve(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dayzero=info,tower_http=info,warn"),
            1 => EnvFilter::new("dayzero=debug,tower_http=debug,info"),
            2 => EnvFilter::new("dayzero=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --parse-file: extracts a snapshot from a page on disk
fn handle_parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Parsing {}", path.display());
    let bytes = std::fs::read(path)?;
    let snapshot = dayzero::extract::parse(&bytes)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Handles --once: fetches the live page without the cache
async fn handle_once(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Fetching {}", config.upstream.url);
    let client = build_http_client(&config.upstream)?;
    let bytes = fetch(&client, &config.upstream.url).await?;
    let snapshot = dayzero::extract::parse(&bytes)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
