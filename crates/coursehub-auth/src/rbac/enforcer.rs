//! Role enforcement for authenticated requests.

use tracing::debug;

use crate::error::AuthError;
use crate::jwt::Claims;

/// Administrator role.
pub const ADMIN: &str = "admin";
/// Teacher role.
pub const TEACHER: &str = "teacher";
/// Student role.
pub const STUDENT: &str = "student";

/// Checks that the claims carry one of the `allowed` roles.
///
/// Comparison ignores ASCII case. An empty role yields [`AuthError::NoRole`].
pub fn require_role(claims: &Claims, allowed: &[&str]) -> Result<(), AuthError> {
    let Some(role) = claims.role() else {
        debug!(user_id = claims.user_id, "Request denied: no role");
        return Err(AuthError::NoRole);
    };

    if allowed.iter().any(|a| a.eq_ignore_ascii_case(role)) {
        Ok(())
    } else {
        debug!(user_id = claims.user_id, role, "Request denied: insufficient role");
        Err(AuthError::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenType;
    use uuid::Uuid;

    fn claims(role: &str) -> Claims {
        Claims {
            user_id: 1,
            username: "u".to_string(),
            role: role.to_string(),
            session_id: Uuid::nil(),
            jti: Uuid::nil(),
            iat: 0,
            exp: 0,
            last_activity: Some(0),
            token_type: TokenType::Access,
            login_time: 0,
            login_timestamp: 0,
            signature: String::new(),
        }
    }

    #[test]
    fn test_allowed_role_case_insensitive() {
        assert!(require_role(&claims("Admin"), &[ADMIN]).is_ok());
        assert!(require_role(&claims("teacher"), &[ADMIN, TEACHER]).is_ok());
    }

    #[test]
    fn test_missing_and_insufficient_role() {
        assert!(matches!(
            require_role(&claims(""), &[ADMIN]),
            Err(AuthError::NoRole)
        ));
        assert!(matches!(
            require_role(&claims(STUDENT), &[ADMIN, TEACHER]),
            Err(AuthError::InsufficientRole)
        ));
    }
}
