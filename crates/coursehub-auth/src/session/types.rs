//! Response shapes produced by the session manager.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jwt::Claims;

/// Identity summary returned with a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id.
    pub user_id: i64,
    /// Username.
    pub username: String,
    /// Role, if any.
    pub role: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginGrant {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Who logged in.
    pub user_info: UserInfo,
}

/// Acknowledgement of a logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutAck {
    /// Human-readable message.
    pub message: String,
    /// Owner of the token when it could be decoded.
    pub user_id: Option<i64>,
}

/// Session details of a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: i64,
    pub username: String,
    pub role: Option<String>,
    pub session_id: Uuid,
    /// Login wall time, seconds.
    pub login_time: i64,
    /// Last activity, seconds.
    pub last_activity: Option<i64>,
    /// Login generation, milliseconds.
    pub login_timestamp: i64,
}

impl From<&Claims> for SessionInfo {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            role: claims.role().map(str::to_string),
            session_id: claims.session_id,
            login_time: claims.login_time,
            last_activity: claims.last_activity,
            login_timestamp: claims.login_timestamp,
        }
    }
}

/// Diagnostic view of an arbitrary token. Produced without verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Decoded claims.
    pub claims: Claims,
    /// Whether the token string is on the blacklist.
    pub is_blacklisted: bool,
    /// Whether the token belongs to the user's latest login.
    pub is_from_latest_login: bool,
    /// The registry's generation for the user.
    pub latest_login_timestamp: Option<i64>,
    /// Whether `exp` has passed.
    pub is_expired: bool,
    /// Whether the keyed claim signature matches.
    pub signature_valid: bool,
}

/// Per-user session state for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSessionStatus {
    pub user_id: i64,
    /// Latest login generation, if the user ever logged in.
    pub latest_login_timestamp: Option<i64>,
    /// Number of revoked tokens currently tracked (all users).
    pub blacklist_size: usize,
    /// Number of users with a login record.
    pub login_records: usize,
}
