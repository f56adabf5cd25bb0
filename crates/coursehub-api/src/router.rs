//! Route definitions for the CourseHub auth API.
//!
//! All routes are mounted under `/api`.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints: refresh, logout, activity, me, session
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/activity", post(handlers::auth::activity))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/session", get(handlers::auth::session))
}

/// Admin endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/auth/token-info", post(handlers::admin::token_info))
        .route(
            "/admin/users/{id}/session-status",
            get(handlers::admin::session_status),
        )
        .route(
            "/admin/users/{id}/force-logout",
            post(handlers::admin::force_logout),
        )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
