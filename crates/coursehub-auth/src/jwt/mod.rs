//! JWT token encoding, decoding, claims and the keyed claim signature.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod signature;

use std::str::FromStr;

use jsonwebtoken::Algorithm;

use coursehub_core::config::AuthConfig;
use coursehub_core::error::AppError;

pub use claims::{Claims, TokenType};
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, SessionSeed, TokenPair};
pub use signature::ClaimSigner;

/// Resolves the configured signing algorithm. Only HMAC variants are accepted.
pub fn signing_algorithm(config: &AuthConfig) -> Result<Algorithm, AppError> {
    let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|e| {
        AppError::configuration(format!(
            "Unknown JWT algorithm '{}': {e}",
            config.jwt_algorithm
        ))
    })?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AppError::configuration(format!(
            "JWT algorithm {other:?} needs a key pair; only HS256/HS384/HS512 are supported"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_algorithms_accepted() {
        for name in ["HS256", "HS384", "HS512"] {
            let config = AuthConfig {
                jwt_algorithm: name.to_string(),
                ..AuthConfig::default()
            };
            assert!(signing_algorithm(&config).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_asymmetric_and_unknown_rejected() {
        for name in ["RS256", "ES256", "none", "hs256x"] {
            let config = AuthConfig {
                jwt_algorithm: name.to_string(),
                ..AuthConfig::default()
            };
            assert!(signing_algorithm(&config).is_err(), "{name}");
        }
    }
}
