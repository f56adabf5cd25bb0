//! JWT token creation with configurable HMAC algorithm.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use coursehub_core::config::AuthConfig;
use coursehub_core::error::AppError;

use super::claims::{Claims, TokenType};
use super::signature::ClaimSigner;
use crate::error::AuthError;

/// Identity and login-generation fields shared by every token of one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    /// Subject.
    pub user_id: i64,
    /// Username.
    pub username: String,
    /// Role, empty when none.
    pub role: String,
    /// Session identifier.
    pub session_id: Uuid,
    /// Wall time of the login in seconds.
    pub login_time: i64,
    /// Login generation in milliseconds.
    pub login_timestamp: i64,
}

impl From<&Claims> for SessionSeed {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            role: claims.role.clone(),
            session_id: claims.session_id,
            login_time: claims.login_time,
            login_timestamp: claims.login_timestamp,
        }
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Header carrying the configured algorithm.
    header: Header,
    /// Keyed claim signer.
    signer: ClaimSigner,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = super::signing_algorithm(config)?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(algorithm),
            signer: ClaimSigner::new(config.jwt_secret.clone()),
        })
    }

    /// Encodes claims as they are. The keyed signature is not touched.
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&self.header, claims, &self.encoding_key).map_err(|e| {
            AuthError::Signing(format!("failed to encode {} token: {e}", claims.token_type))
        })
    }

    /// Builds signed claims of one type for the given seed.
    pub fn claims_for(
        &self,
        seed: &SessionSeed,
        token_type: TokenType,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Claims {
        let exp = (now + ttl).timestamp();
        let signature = self.signer.sign(
            seed.user_id,
            seed.session_id,
            token_type,
            exp,
            seed.login_timestamp,
        );
        Claims {
            user_id: seed.user_id,
            username: seed.username.clone(),
            role: seed.role.clone(),
            session_id: seed.session_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp,
            last_activity: match token_type {
                TokenType::Access => Some(now.timestamp()),
                TokenType::Refresh => None,
            },
            token_type,
            login_time: seed.login_time,
            login_timestamp: seed.login_timestamp,
            signature,
        }
    }

    /// Generates a new access + refresh token pair for the given seed.
    pub fn generate_token_pair(
        &self,
        seed: &SessionSeed,
        now: DateTime<Utc>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<TokenPair, AuthError> {
        let access_claims = self.claims_for(seed, TokenType::Access, now, access_ttl);
        let refresh_claims = self.claims_for(seed, TokenType::Refresh, now, refresh_ttl);

        let access_token = self.encode(&access_claims)?;
        let refresh_token = self.encode(&refresh_claims)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: now + access_ttl,
            refresh_expires_at: now + refresh_ttl,
        })
    }

    /// The keyed claim signer bound to the same secret.
    pub fn signer(&self) -> &ClaimSigner {
        &self.signer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtDecoder;

    fn seed() -> SessionSeed {
        SessionSeed {
            user_id: 7,
            username: "alice@example.com".to_string(),
            role: "student".to_string(),
            session_id: Uuid::new_v4(),
            login_time: 1_700_000_000,
            login_timestamp: 1_700_000_000_123,
        }
    }

    #[test]
    fn test_pair_shares_session_and_generation() {
        let config = AuthConfig::default();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config).unwrap();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let pair = encoder
            .generate_token_pair(&seed(), now, Duration::minutes(30), Duration::days(7))
            .unwrap();
        let access = decoder.decode(&pair.access_token).unwrap();
        let refresh = decoder.decode(&pair.refresh_token).unwrap();

        assert_eq!(access.session_id, refresh.session_id);
        assert_eq!(access.login_timestamp, refresh.login_timestamp);
        assert_eq!(access.token_type, TokenType::Access);
        assert_eq!(refresh.token_type, TokenType::Refresh);
        assert_eq!(access.last_activity, Some(now.timestamp()));
        assert_eq!(refresh.last_activity, None);
        assert_eq!(access.exp, now.timestamp() + 30 * 60);
        assert!(encoder.signer().matches(&access));
        assert!(encoder.signer().matches(&refresh));
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_same_instant_pairs_are_distinct() {
        let encoder = JwtEncoder::new(&AuthConfig::default()).unwrap();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let seed = seed();

        let first = encoder
            .generate_token_pair(&seed, now, Duration::minutes(30), Duration::days(7))
            .unwrap();
        let second = encoder
            .generate_token_pair(&seed, now, Duration::minutes(30), Duration::days(7))
            .unwrap();
        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_header_uses_configured_algorithm() {
        let config = AuthConfig {
            jwt_algorithm: "HS512".to_string(),
            ..AuthConfig::default()
        };
        let encoder = JwtEncoder::new(&config).unwrap();
        let claims = encoder.claims_for(&seed(), TokenType::Access, Utc::now(), Duration::minutes(5));
        let token = encoder.encode(&claims).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, jsonwebtoken::Algorithm::HS512);
    }
}
