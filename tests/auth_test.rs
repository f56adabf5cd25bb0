//! Integration tests for the authentication flow.

mod helpers;

use chrono::Duration;
use http::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = helpers::TestApp::new().await;
    let grant = app.login(7, "alice", Some("student")).await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&grant.access_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["user_id"], 7);
    assert_eq!(response.body["data"]["username"], "alice");
    assert_eq!(response.body["data"]["role"], "student");
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert_eq!(response.reason(), Some("token_missing"));
}

#[tokio::test]
async fn test_second_login_supersedes_first() {
    let app = helpers::TestApp::new().await;
    let first = app.login(7, "alice", None).await;
    let second = app.login(7, "alice", None).await;

    let stale = app
        .request("GET", "/api/auth/me", None, Some(&first.access_token))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.reason(), Some("session_superseded"));

    let current = app
        .request("GET", "/api/auth/me", None, Some(&second.access_token))
        .await;
    assert_eq!(current.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_401() {
    let app = helpers::TestApp::new().await;
    let grant = app.login(7, "alice", None).await;
    app.clock.advance(Duration::hours(25));

    let response = app
        .request("GET", "/api/auth/session", None, Some(&grant.access_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("token_expired"));
}

#[tokio::test]
async fn test_inactivity_timeout_then_blacklisted() {
    let app = helpers::TestApp::new().await;
    let grant = app.login(7, "alice", None).await;
    app.clock.advance(Duration::minutes(61));

    let idle = app
        .request("GET", "/api/auth/me", None, Some(&grant.access_token))
        .await;
    assert_eq!(idle.reason(), Some("inactivity_timeout"));

    let again = app
        .request("GET", "/api/auth/me", None, Some(&grant.access_token))
        .await;
    assert_eq!(again.reason(), Some("blacklisted"));
}

#[tokio::test]
async fn test_refresh_flow() {
    let app = helpers::TestApp::new().await;
    let grant = app.login(7, "alice", Some("teacher")).await;
    app.clock.advance(Duration::minutes(5));

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": grant.refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["token_type"], "bearer");

    let new_access = response.body["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();
    let me = app
        .request("GET", "/api/auth/me", None, Some(&new_access))
        .await;
    assert_eq!(me.status, StatusCode::OK);

    // The original access token belongs to the same login.
    let sibling = app
        .request("GET", "/api/auth/me", None, Some(&grant.access_token))
        .await;
    assert_eq!(sibling.status, StatusCode::OK);

    let reused = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": grant.refresh_token })),
            None,
        )
        .await;
    assert_eq!(reused.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reused.reason(), Some("blacklisted"));
}

#[tokio::test]
async fn test_refresh_with_empty_body_is_400() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": "" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = helpers::TestApp::new().await;
    let grant = app.login(7, "alice", None).await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&grant.access_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], 7);

    for _ in 0..2 {
        let after = app
            .request("GET", "/api/auth/me", None, Some(&grant.access_token))
            .await;
        assert_eq!(after.status, StatusCode::UNAUTHORIZED);
        assert_eq!(after.reason(), Some("blacklisted"));
    }
}

#[tokio::test]
async fn test_logout_of_garbage_token_is_acknowledged() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request("POST", "/api/auth/logout", None, Some("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].get("user_id").is_none());
}

#[tokio::test]
async fn test_activity_reissues_access_token() {
    let app = helpers::TestApp::new().await;
    let grant = app.login(7, "alice", None).await;
    app.clock.advance(Duration::minutes(45));

    let response = app
        .request("POST", "/api/auth/activity", None, Some(&grant.access_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let extended = response.body["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();

    app.clock.advance(Duration::minutes(45));
    let session = app
        .request("GET", "/api/auth/session", None, Some(&extended))
        .await;
    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.body["data"]["user_id"], 7);
}
