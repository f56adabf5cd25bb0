//! Token signing and lifetime configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Algorithms accepted for token signing. Only shared-secret HMAC variants
/// make sense with a single server secret.
const SUPPORTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Authentication and token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Server secret used both for JWT signing and for the keyed claim signature.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT signing algorithm identifier.
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Maximum idle time of an access token before it is rejected, in minutes.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            inactivity_timeout_minutes: default_inactivity_timeout(),
        }
    }
}

impl AuthConfig {
    /// Rejects configurations the token layer cannot operate with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !SUPPORTED_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "auth.jwt_algorithm '{}' is not supported (expected one of {})",
                self.jwt_algorithm,
                SUPPORTED_ALGORITHMS.join(", ")
            )));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration("token lifetimes must be positive"));
        }
        Ok(())
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    24 * 60
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_inactivity_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_asymmetric_algorithm() {
        let config = AuthConfig {
            jwt_algorithm: "RS256".to_string(),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_secret() {
        let config = AuthConfig {
            jwt_secret: String::new(),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
