//! Admin handlers: token diagnostics and per-user session control.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use coursehub_auth::{TokenInfo, UserSessionStatus};

use crate::dto::request::{TokenInfoRequest, validate_body};
use crate::dto::response::{ApiResponse, ForceLogoutResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/auth/token-info
pub async fn token_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TokenInfoRequest>,
) -> Result<Json<ApiResponse<TokenInfo>>, ApiError> {
    require_admin(&auth)?;
    validate_body(&req)?;
    let info = state.session_manager.token_info(&req.token).await?;
    Ok(Json(ApiResponse::ok(info)))
}

/// GET /api/admin/users/{id}/session-status
pub async fn session_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserSessionStatus>>, ApiError> {
    require_admin(&auth)?;
    let status = state.session_manager.user_status(user_id).await?;
    Ok(Json(ApiResponse::ok(status)))
}

/// POST /api/admin/users/{id}/force-logout
pub async fn force_logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<ForceLogoutResponse>>, ApiError> {
    require_admin(&auth)?;
    let login_timestamp = state.session_manager.force_logout_all(user_id).await?;
    info!(admin_id = auth.user_id, user_id, "Admin forced logout");
    Ok(Json(ApiResponse::ok(ForceLogoutResponse {
        user_id,
        login_timestamp,
    })))
}
