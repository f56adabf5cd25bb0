//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursehub_auth::{Claims, TokenPair};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

/// Token pair response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
            access_expires_at: pair.access_expires_at,
            refresh_expires_at: pair.refresh_expires_at,
        }
    }
}

/// Re-issued access token after an activity ping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    /// The new access token; the presented one is revoked.
    pub access_token: String,
}

/// Logout acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Message text.
    pub message: String,
    /// Owner of the token, when it could be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// The authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    /// User ID.
    pub user_id: i64,
    /// Username.
    pub username: String,
    /// Role, if any.
    pub role: Option<String>,
    /// Session the token belongs to.
    pub session_id: Uuid,
}

impl From<&Claims> for CurrentUserResponse {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            role: claims.role().map(str::to_string),
            session_id: claims.session_id,
        }
    }
}

/// Result of an admin forced logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceLogoutResponse {
    /// Affected user.
    pub user_id: i64,
    /// The user's new login generation.
    pub login_timestamp: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}
