//! Claims carried by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload embedded in every token.
///
/// Times are whole seconds since the epoch except `login_timestamp`, which
/// is the login generation in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject.
    pub user_id: i64,
    /// Username at issuance.
    pub username: String,
    /// Role at issuance; empty when the user has none.
    #[serde(default)]
    pub role: String,
    /// Shared by the access/refresh pair of one login and kept across refreshes.
    pub session_id: Uuid,
    /// Unique per token, so rotated tokens never encode to the same string.
    pub jti: Uuid,
    /// Issued-at.
    pub iat: i64,
    /// Hard expiry.
    pub exp: i64,
    /// Last time the session was active. Access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
    /// Token type.
    pub token_type: TokenType,
    /// Wall time of the login that started this session.
    pub login_time: i64,
    /// Login generation marker.
    pub login_timestamp: i64,
    /// Keyed signature over the identity fields, see [`super::ClaimSigner`].
    pub signature: String,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token authorizing API calls.
    Access,
    /// Long-lived token used only to mint new pairs.
    Refresh,
}

impl TokenType {
    /// Wire name, also used inside the keyed signature.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the hard expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }

    /// Seconds of life left at `now` (0 if expired).
    pub fn remaining_ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.exp - now.timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }

    /// Role, or `None` when the token carries none.
    pub fn role(&self) -> Option<&str> {
        if self.role.is_empty() {
            None
        } else {
            Some(&self.role)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims {
            user_id: 7,
            username: "alice@example.com".to_string(),
            role: String::new(),
            session_id: Uuid::nil(),
            jti: Uuid::nil(),
            iat: 1_000,
            exp: 2_000,
            last_activity: Some(1_000),
            token_type: TokenType::Access,
            login_time: 1_000,
            login_timestamp: 1_000_000,
            signature: "0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn test_expiry_is_strict() {
        let claims = sample();
        let at = |s| DateTime::from_timestamp(s, 0).unwrap();
        assert!(!claims.is_expired_at(at(2_000)));
        assert!(claims.is_expired_at(at(2_001)));
        assert_eq!(claims.remaining_ttl_seconds(at(1_500)), 500);
        assert_eq!(claims.remaining_ttl_seconds(at(3_000)), 0);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["token_type"], "access");
        assert_eq!(json["login_timestamp"], 1_000_000);

        let mut refresh = sample();
        refresh.token_type = TokenType::Refresh;
        refresh.last_activity = None;
        let json = serde_json::to_value(refresh).unwrap();
        assert_eq!(json["token_type"], "refresh");
        assert!(json.get("last_activity").is_none());
    }

    #[test]
    fn test_empty_role_is_none() {
        let mut claims = sample();
        assert_eq!(claims.role(), None);
        claims.role = "teacher".to_string();
        assert_eq!(claims.role(), Some("teacher"));
    }
}
