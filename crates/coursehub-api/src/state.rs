//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use coursehub_auth::SessionManager;
use coursehub_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token and session lifecycle
    pub session_manager: Arc<SessionManager>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state.
    pub fn new(config: Arc<AppConfig>, session_manager: Arc<SessionManager>) -> Self {
        Self {
            config,
            session_manager,
            started_at: Instant::now(),
        }
    }
}
