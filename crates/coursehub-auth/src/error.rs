//! Authentication failure taxonomy.

use thiserror::Error;

use coursehub_core::error::{AppError, ErrorKind};

/// Every way a token or role check can fail.
///
/// All token variants surface to HTTP clients as 401, the role variants as
/// 403. None are retried.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was supplied.
    #[error("Authentication token is missing")]
    TokenMissing,
    /// The token could not be decoded or lacks required claims.
    #[error("Invalid token format: {0}")]
    TokenMalformed(String),
    /// The token's hard expiry has passed.
    #[error("Token has expired")]
    TokenExpired,
    /// The JWT signature or the keyed claim signature does not match.
    #[error("Token signature invalid")]
    SignatureMismatch,
    /// A newer login for the same user invalidated this token.
    #[error("Session invalidated by new login")]
    SessionSuperseded,
    /// The token was idle longer than the inactivity window.
    #[error("Session expired due to inactivity")]
    InactivityTimeout,
    /// The token was explicitly revoked.
    #[error("Token has been invalidated")]
    Blacklisted,
    /// The token carries no role.
    #[error("No role assigned")]
    NoRole,
    /// The token's role is not among the allowed ones.
    #[error("Insufficient permissions")]
    InsufficientRole,
    /// Encoding a token failed.
    #[error("Failed to sign token: {0}")]
    Signing(String),
    /// The session store could not be reached.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl AuthError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenMissing => "token_missing",
            Self::TokenMalformed(_) => "token_malformed",
            Self::TokenExpired => "token_expired",
            Self::SignatureMismatch => "signature_mismatch",
            Self::SessionSuperseded => "session_superseded",
            Self::InactivityTimeout => "inactivity_timeout",
            Self::Blacklisted => "blacklisted",
            Self::NoRole => "no_role",
            Self::InsufficientRole => "insufficient_role",
            Self::Signing(_) => "signing_failed",
            Self::Store(_) => "store_unavailable",
        }
    }

    /// Whether this failure means the caller is not authenticated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::TokenMissing
                | Self::TokenMalformed(_)
                | Self::TokenExpired
                | Self::SignatureMismatch
                | Self::SessionSuperseded
                | Self::InactivityTimeout
                | Self::Blacklisted
        )
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        let reason = serde_json::json!({ "reason": err.code() });
        match err {
            AuthError::Store(inner) => inner,
            AuthError::NoRole | AuthError::InsufficientRole => {
                AppError::new(ErrorKind::Forbidden, message).with_details(reason)
            }
            AuthError::Signing(_) => AppError::internal(message).with_details(reason),
            _ => AppError::new(ErrorKind::Unauthorized, message).with_details(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_map_to_unauthorized() {
        let app: AppError = AuthError::SessionSuperseded.into();
        assert_eq!(app.kind, ErrorKind::Unauthorized);
        assert_eq!(
            app.details,
            Some(serde_json::json!({ "reason": "session_superseded" }))
        );
    }

    #[test]
    fn test_role_failures_map_to_forbidden() {
        let app: AppError = AuthError::InsufficientRole.into();
        assert_eq!(app.kind, ErrorKind::Forbidden);
        assert!(!AuthError::InsufficientRole.is_unauthorized());
    }

    #[test]
    fn test_store_error_passes_through() {
        let app: AppError = AuthError::Store(AppError::cache("redis down")).into();
        assert_eq!(app.kind, ErrorKind::Cache);
        assert_eq!(app.message, "redis down");
    }
}
