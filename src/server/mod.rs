//! HTTP server module
//!
//! This module exposes the snapshot over HTTP:
//! - `GET /health` liveness check
//! - `GET /api/dashboard` fresh or cached snapshot as JSON
//! - Request ids, request tracing, an outer request timeout (504) and panic
//!   recovery
//!
//! Dropping a request (client disconnect or timeout) drops the handler
//! future, which aborts any upstream fetch still in flight.

mod handlers;

use crate::cache::{open_cache, PageCache};
use crate::config::Config;
use crate::fetcher::build_http_client;
use crate::DayZeroError;
use axum::{error_handling::HandleErrorLayer, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Arc<Config>,
    pub cache: Option<Arc<dyn PageCache>>,
}

impl AppState {
    /// Creates state with an HTTP client built from the upstream config
    pub fn new(config: Config, cache: Option<Arc<dyn PageCache>>) -> Result<Self, DayZeroError> {
        let client = build_http_client(&config.upstream)?;
        Ok(Self {
            client,
            config: Arc::new(config),
            cache,
        })
    }
}

/// Builds the router with all routes and middleware attached
pub fn router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/dashboard", get(handlers::dashboard_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(HandleErrorLayer::new(handlers::handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}

/// Opens the configured cache and serves until Ctrl-C
///
/// # Arguments
///
/// * `config` - Validated configuration
///
/// # Returns
///
/// * `Ok(())` - Server shut down cleanly
/// * `Err(DayZeroError)` - Cache, client or listener setup failed
pub async fn serve(config: Config) -> Result<(), DayZeroError> {
    let cache = open_cache(&config.cache)?;
    match &cache {
        Some(_) => tracing::info!(
            "Page cache enabled ({:?}, ttl {}s)",
            config.cache.backend,
            config.cache.ttl_secs
        ),
        None => tracing::info!("Page cache disabled"),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let state = AppState::new(config, cache)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
