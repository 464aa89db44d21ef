//! Rate limiting, execution deadline and invocation logging.

use crate::error::CheckError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Global rate limiter (not keyed by IP).
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    /// Global rate limiter for all requests; `None` when limiting is disabled
    pub global: Option<Arc<GlobalLimiter>>,
}

impl RateLimitState {
    /// Create a new rate limit state. A limit of zero disables limiting.
    pub fn new(requests_per_minute: u32) -> Self {
        let global = NonZeroU32::new(requests_per_minute)
            .map(|rpm| Arc::new(RateLimiter::direct(Quota::per_minute(rpm))));

        Self { global }
    }

    /// Create a rate limiter that never rejects, for testing.
    pub fn disabled() -> Self {
        Self { global: None }
    }
}

/// Rate limiting middleware.
///
/// Returns 429 with a `RESOURCE_EXHAUSTED` envelope when the global limit is hit.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, CheckError> {
    if let Some(limiter) = &rate_limit.global {
        if limiter.check().is_err() {
            warn!("Global rate limit exceeded");
            return Err(CheckError::RateLimitExceeded);
        }
        debug!("Rate limit check passed");
    }

    Ok(next.run(request).await)
}

/// Maximum execution time for a single invocation.
///
/// Returns 408 with a `DEADLINE_EXCEEDED` envelope when the limit is hit.
pub async fn timeout_middleware(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, CheckError> {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            warn!(limit = ?limit, "Invocation exceeded its execution time");
            Err(CheckError::DeadlineExceeded)
        }
    }
}

/// Records the outcome of each invocation against the function name.
pub async fn logging_middleware(
    State(function): State<String>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match status {
        200..=299 => info!(%function, %path, status, elapsed_ms, "Invocation finished"),
        400..=499 => debug!(%function, %path, status, elapsed_ms, "Invocation rejected"),
        _ => warn!(%function, %path, status, elapsed_ms, "Invocation failed"),
    }

    response
}
