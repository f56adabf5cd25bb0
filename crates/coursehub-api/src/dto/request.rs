//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Token diagnostics request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenInfoRequest {
    /// Token to inspect.
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

/// Runs `validator` rules on a request body.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), coursehub_core::error::AppError> {
    body.validate()
        .map_err(|e| coursehub_core::error::AppError::validation(e.to_string()))
}
