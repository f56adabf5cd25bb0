//! Integration tests for the admin session endpoints.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_admin_routes_reject_non_admin() {
    let app = helpers::TestApp::new().await;
    let student = app.login(7, "alice", Some("student")).await;

    let response = app
        .request(
            "GET",
            "/api/admin/users/7/session-status",
            None,
            Some(&student.access_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), Some("insufficient_role"));
}

#[tokio::test]
async fn test_admin_routes_reject_missing_role() {
    let app = helpers::TestApp::new().await;
    let nobody = app.login(9, "nobody", None).await;

    let response = app
        .request(
            "POST",
            "/api/admin/users/7/force-logout",
            None,
            Some(&nobody.access_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), Some("no_role"));
}

#[tokio::test]
async fn test_force_logout_invalidates_user_tokens() {
    let app = helpers::TestApp::new().await;
    let admin = app.login(1, "root", Some("admin")).await;
    let student = app.login(7, "alice", Some("student")).await;

    let response = app
        .request(
            "POST",
            "/api/admin/users/7/force-logout",
            None,
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_id"], 7);

    let after = app
        .request("GET", "/api/auth/me", None, Some(&student.access_token))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.reason(), Some("session_superseded"));

    let admin_still_ok = app
        .request("GET", "/api/auth/me", None, Some(&admin.access_token))
        .await;
    assert_eq!(admin_still_ok.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_status_and_token_info() {
    let app = helpers::TestApp::new().await;
    let admin = app.login(1, "root", Some("Admin")).await;
    let old = app.login(7, "alice", None).await;
    app.login(7, "alice", None).await;

    let status = app
        .request(
            "GET",
            "/api/admin/users/7/session-status",
            None,
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["data"]["login_records"], 2);
    assert!(status.body["data"]["latest_login_timestamp"].is_i64());

    let info = app
        .request(
            "POST",
            "/api/admin/auth/token-info",
            Some(serde_json::json!({ "token": old.access_token })),
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(info.status, StatusCode::OK);
    assert_eq!(info.body["data"]["is_from_latest_login"], false);
    assert_eq!(info.body["data"]["signature_valid"], true);
    assert_eq!(info.body["data"]["claims"]["user_id"], 7);
}

#[tokio::test]
async fn test_unknown_user_status_is_empty() {
    let app = helpers::TestApp::new().await;
    let admin = app.login(1, "root", Some("admin")).await;

    let status = app
        .request(
            "GET",
            "/api/admin/users/42/session-status",
            None,
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(status.status, StatusCode::OK);
    assert!(status.body["data"]["latest_login_timestamp"].is_null());
}
