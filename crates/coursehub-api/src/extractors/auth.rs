//! Bearer token extractors.
//!
//! [`BearerToken`] only pulls the raw string out of the `Authorization`
//! header; [`AuthUser`] additionally runs full verification.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use coursehub_auth::{AuthError, Claims};

use crate::error::ApiError;
use crate::state::AppState;

/// Raw bearer token, unverified.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Pulls the token out of the `Authorization` header.
    pub fn from_parts(parts: &Parts) -> Result<Self, AuthError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::TokenMissing)?;

        let (scheme, token) = header
            .split_once(' ')
            .ok_or_else(|| AuthError::TokenMalformed("expected `Bearer <token>`".to_string()))?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::TokenMalformed(
                "unsupported authorization scheme".to_string(),
            ));
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::TokenMissing);
        }
        Ok(Self(token.to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts)?)
    }
}

/// Claims of a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified claims.
    pub claims: Claims,
    /// The token the claims came from.
    pub token: String,
}

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.claims
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_parts(parts)?;
        let claims = state.session_manager.verify(&token).await?;
        Ok(AuthUser { claims, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_missing_header_is_token_missing() {
        assert!(matches!(
            BearerToken::from_parts(&parts(None)),
            Err(AuthError::TokenMissing)
        ));
        assert!(matches!(
            BearerToken::from_parts(&parts(Some("Bearer   "))),
            Err(AuthError::TokenMissing)
        ));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let token = BearerToken::from_parts(&parts(Some("bearer abc.def.ghi"))).unwrap();
        assert_eq!(token.0, "abc.def.ghi");
    }

    #[test]
    fn test_other_scheme_rejected() {
        assert!(matches!(
            BearerToken::from_parts(&parts(Some("Basic dXNlcjpwYXNz"))),
            Err(AuthError::TokenMalformed(_))
        ));
    }
}
