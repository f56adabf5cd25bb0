//! Role guards for handlers.

use coursehub_auth::rbac::{ADMIN, require_role};

use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Checks that the authenticated user has the admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    Ok(require_role(&auth.claims, &[ADMIN])?)
}
