//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::DateTime;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use coursehub_api::{AppState, build_router};
use coursehub_auth::{LoginGrant, SessionManager};
use coursehub_cache::SessionStores;
use coursehub_core::config::AppConfig;
use coursehub_core::traits::ManualClock;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Session manager shared with the router
    pub session_manager: Arc<SessionManager>,
    /// Clock driving every expiry decision
    pub clock: ManualClock,
}

/// Status and JSON body of a test response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application on in-memory stores
    pub async fn new() -> Self {
        let config = AppConfig::default();
        let stores = SessionStores::memory().expect("Failed to init stores");
        let clock = ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
        );

        let session_manager = Arc::new(
            SessionManager::new(
                &config.auth,
                stores.registry,
                stores.blacklist,
                Arc::new(clock.clone()),
            )
            .expect("Failed to init session manager"),
        );

        let state = AppState::new(Arc::new(config), Arc::clone(&session_manager));
        Self {
            router: build_router(state),
            session_manager,
            clock,
        }
    }

    /// Log a user in directly through the session manager
    pub async fn login(&self, user_id: i64, username: &str, role: Option<&str>) -> LoginGrant {
        self.session_manager
            .login(user_id, username, role)
            .await
            .expect("Failed to log in")
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

impl TestResponse {
    /// `details.reason` of an error body
    pub fn reason(&self) -> Option<&str> {
        self.body["details"]["reason"].as_str()
    }
}
