use crate::cache::ttl_from_secs;
use crate::extract;
use crate::fetcher::{fetch, fetch_cached};
use crate::server::AppState;
use crate::DayZeroError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    BoxError,
};

pub(crate) async fn health_handler() -> &'static str {
    "ok"
}

pub(crate) async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<Response, DashboardError> {
    let (bytes, cached) = load_page(&state).await?;

    let mut snapshot = extract::parse(&bytes)?;
    snapshot.cached = cached;

    Ok(Json(snapshot).into_response())
}

/// Fetches the raw page, through the cache when one is configured
async fn load_page(state: &AppState) -> Result<(Vec<u8>, bool), DayZeroError> {
    let url = state.config.upstream.url.as_str();

    let cache = match &state.cache {
        Some(cache) => cache,
        None => return Ok((fetch(&state.client, url).await?, false)),
    };

    match ttl_from_secs(state.config.cache.ttl_secs) {
        Ok(ttl) => Ok(fetch_cached(
            &state.client,
            url,
            cache.clone(),
            &state.config.cache.key,
            ttl,
        )
        .await?),
        Err(e) => {
            tracing::warn!("Bypassing cache: {}", e);
            Ok((fetch(&state.client, url).await?, false))
        }
    }
}

/// Maps middleware errors to responses; an elapsed request timeout is a 504
pub(crate) async fn handle_middleware_error(error: BoxError) -> (StatusCode, String) {
    if error.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        (StatusCode::GATEWAY_TIMEOUT, "request timed out".to_string())
    } else {
        tracing::error!("Unhandled middleware error: {}", error);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unhandled internal error: {}", error),
        )
    }
}

/// Error response wrapper: 500 with the error text as a plain body
pub(crate) struct DashboardError(DayZeroError);

impl From<DayZeroError> for DashboardError {
    fn from(error: DayZeroError) -> Self {
        DashboardError(error)
    }
}

impl From<extract::ParseError> for DashboardError {
    fn from(error: extract::ParseError) -> Self {
        DashboardError(error.into())
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        tracing::error!("Dashboard request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}
