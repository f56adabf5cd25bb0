//! JWT token decoding.
//!
//! Expiry is not checked here: the session manager compares `exp` against
//! its injected clock so that expiry and inactivity share one time source.

use jsonwebtoken::dangerous::insecure_decode;
use jsonwebtoken::{DecodingKey, Validation, decode};

use coursehub_core::config::AuthConfig;
use coursehub_core::error::AppError;

use super::claims::Claims;
use crate::error::AuthError;

/// Decodes JWT strings into [`Claims`].
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature-checked validation.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = super::signing_algorithm(config)?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Decodes a token and checks its JWT signature.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// Decodes a token without checking any signature.
    ///
    /// Only for diagnostics; never use the result to authorize a request.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, AuthError> {
        insecure_decode::<Claims>(token)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::SignatureMismatch,
        _ => AuthError::TokenMalformed(err.to_string()),
    }
}
