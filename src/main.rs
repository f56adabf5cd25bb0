//! CourseHub auth server.
//!
//! Wires configuration, session stores, the session manager and the HTTP
//! router together and runs until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use coursehub_api::{AppState, build_router};
use coursehub_auth::{SessionCleanup, SessionManager};
use coursehub_cache::SessionStores;
use coursehub_core::config::AppConfig;
use coursehub_core::error::AppError;
use coursehub_core::traits::SystemClock;

#[tokio::main]
async fn main() {
    let env = std::env::var("COURSEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CourseHub auth v{}", env!("CARGO_PKG_VERSION"));

    // ── Session stores ───────────────────────────────────────────
    let stores = SessionStores::from_config(&config.session).await?;

    // ── Session manager ──────────────────────────────────────────
    let session_manager = SessionManager::new(
        &config.auth,
        Arc::clone(&stores.registry),
        Arc::clone(&stores.blacklist),
        Arc::new(SystemClock),
    )?;
    let session_manager = Arc::new(session_manager);
    tracing::info!(
        algorithm = %config.auth.jwt_algorithm,
        access_ttl_minutes = config.auth.access_ttl_minutes,
        inactivity_timeout_minutes = config.auth.inactivity_timeout_minutes,
        "Session manager initialized"
    );

    // ── Cleanup task ─────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = SessionCleanup::from_config(
        &config.session,
        Arc::clone(&stores.registry),
        Arc::clone(&stores.blacklist),
    );
    let cleanup_interval = Duration::from_secs(config.session.cleanup_interval_seconds.max(1));
    let cleanup_handle = tokio::spawn(cleanup.run(cleanup_interval, shutdown_rx));

    // ── HTTP server ──────────────────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::new(config), session_manager);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("CourseHub auth server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Waiting for background tasks to complete...");
    let _ = tokio::time::timeout(grace, cleanup_handle).await;

    tracing::info!("CourseHub auth server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
