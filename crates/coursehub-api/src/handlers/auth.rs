//! Auth handlers: refresh, logout, activity, me, session.

use axum::Json;
use axum::extract::State;

use coursehub_auth::SessionInfo;

use crate::dto::request::{RefreshRequest, validate_body};
use crate::dto::response::{
    ActivityResponse, ApiResponse, CurrentUserResponse, LogoutResponse, TokenPairResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, BearerToken};
use crate::state::AppState;

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPairResponse>>, ApiError> {
    validate_body(&req)?;
    let pair = state.session_manager.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(pair.into())))
}

/// POST /api/auth/logout
///
/// Takes the raw bearer token: an expired or superseded token can still be
/// logged out.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<LogoutResponse>>, ApiError> {
    let ack = state.session_manager.logout(&token).await?;
    Ok(Json(ApiResponse::ok(LogoutResponse {
        message: ack.message,
        user_id: ack.user_id,
    })))
}

/// POST /api/auth/activity
pub async fn activity(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<ActivityResponse>>, ApiError> {
    let access_token = state.session_manager.extend_activity(&token).await?;
    Ok(Json(ApiResponse::ok(ActivityResponse { access_token })))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<CurrentUserResponse>> {
    Json(ApiResponse::ok(CurrentUserResponse::from(&auth.claims)))
}

/// GET /api/auth/session
pub async fn session(auth: AuthUser) -> Json<ApiResponse<SessionInfo>> {
    Json(ApiResponse::ok(SessionInfo::from(&auth.claims)))
}
