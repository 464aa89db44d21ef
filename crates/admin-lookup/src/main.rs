//! Admin Lookup - Entry point.

use admin_lookup::{
    api::{create_router_with_rate_limit, with_hosting_limits, AppState, RateLimitState},
    config::{Config, LogFormat},
    resolver::AdminResolver,
    store,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!(
        function = %config.function.name,
        memory = %config.function.memory,
        timeout = ?config.function.timeout,
        "Starting admin lookup service"
    );

    // Initialize the admin store once for the process
    let store = match store::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize admin store: {:#}", e);
            std::process::exit(1);
        }
    };

    // Create application state
    let resolver = AdminResolver::new(store);
    let state = AppState::with_function_name(resolver, config.function.name.clone());

    // Create router with rate limiting and hosting limits
    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);
    let app = with_hosting_limits(
        create_router_with_rate_limit(state, rate_limit),
        config.function.timeout,
        config.server.cors,
    );

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server stopped");
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
