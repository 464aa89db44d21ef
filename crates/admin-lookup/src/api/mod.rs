//! HTTP surface for the callable function.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, timeout_middleware, RateLimitState};
pub use types::*;

use crate::resolver::AdminResolver;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Default callable function name, also its route.
pub const DEFAULT_FUNCTION_NAME: &str = "checkAdminExists";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Admin existence resolver with its injected store
    pub resolver: AdminResolver,
    /// Name under which the function is exposed
    pub function_name: String,
}

impl AppState {
    /// Create new application state.
    pub fn new(resolver: AdminResolver) -> Self {
        Self::with_function_name(resolver, DEFAULT_FUNCTION_NAME)
    }

    /// Create application state exposing the function under a custom name.
    pub fn with_function_name(resolver: AdminResolver, function_name: impl Into<String>) -> Self {
        Self {
            resolver,
            function_name: function_name.into(),
        }
    }
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    let function_route = format!("/{}", state.function_name);
    let function_name = state.function_name.clone();

    Router::new()
        .route(&function_route, post(handlers::check_admin_exists))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        .layer(axum_middleware::from_fn_with_state(
            function_name,
            logging_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Apply the hosting ceilings: maximum execution time and browser CORS.
pub fn with_hosting_limits(router: Router, timeout: Duration, cors: bool) -> Router {
    let router = router.layer(axum_middleware::from_fn_with_state(
        timeout,
        timeout_middleware,
    ));

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
