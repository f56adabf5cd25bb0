//! Session lifecycle manager: issue, verify, refresh and logout flows.

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use coursehub_core::config::AuthConfig;
use coursehub_core::error::AppError;
use coursehub_core::traits::{Clock, LoginRegistry, TokenBlacklist};

use crate::error::AuthError;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder, SessionSeed, TokenPair, TokenType};

use super::policy::{TokenLifetimes, revocation_ttl};
use super::types::{LoginGrant, LogoutAck, SessionInfo, TokenInfo, UserInfo, UserSessionStatus};

/// Issues and validates session tokens against the login registry and the
/// blacklist.
#[derive(Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    decoder: Arc<JwtDecoder>,
    /// User -> latest login generation.
    registry: Arc<dyn LoginRegistry>,
    /// Revoked token strings.
    blacklist: Arc<dyn TokenBlacklist>,
    /// Time source for expiry and inactivity.
    clock: Arc<dyn Clock>,
    /// Token lifetimes.
    lifetimes: TokenLifetimes,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("lifetimes", &self.lifetimes)
            .field("registry", &self.registry)
            .field("blacklist", &self.blacklist)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        config: &AuthConfig,
        registry: Arc<dyn LoginRegistry>,
        blacklist: Arc<dyn TokenBlacklist>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            encoder: Arc::new(JwtEncoder::new(config)?),
            decoder: Arc::new(JwtDecoder::new(config)?),
            registry,
            blacklist,
            clock,
            lifetimes: TokenLifetimes::from(config),
        })
    }

    /// Overrides the lifetimes derived from configuration.
    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    /// Active token lifetimes.
    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// The login generation registry.
    pub fn registry(&self) -> &Arc<dyn LoginRegistry> {
        &self.registry
    }

    /// The revoked-token blacklist.
    pub fn blacklist(&self) -> &Arc<dyn TokenBlacklist> {
        &self.blacklist
    }

    // ── Issuing ──────────────────────────────────────────────────────

    /// Issues a fresh access/refresh pair for a user who just authenticated.
    ///
    /// Advances the user's login generation, so every token issued before
    /// this call stops verifying with [`AuthError::SessionSuperseded`].
    pub async fn issue(
        &self,
        user_id: i64,
        username: &str,
        role: Option<&str>,
    ) -> Result<TokenPair, AuthError> {
        let now = self.clock.now();
        let login_timestamp = self
            .registry
            .advance(user_id, now.timestamp_millis())
            .await?;

        let seed = SessionSeed {
            user_id,
            username: username.to_string(),
            role: role.unwrap_or_default().to_string(),
            session_id: Uuid::new_v4(),
            login_time: now.timestamp(),
            login_timestamp,
        };

        let pair = self.encoder.generate_token_pair(
            &seed,
            now,
            self.lifetimes.access,
            self.lifetimes.refresh,
        )?;

        info!(
            user_id,
            session_id = %seed.session_id,
            login_timestamp,
            "Issued token pair"
        );
        Ok(pair)
    }

    /// Issues a pair and wraps it into the login response shape.
    pub async fn login(
        &self,
        user_id: i64,
        username: &str,
        role: Option<&str>,
    ) -> Result<LoginGrant, AuthError> {
        let pair = self.issue(user_id, username, role).await?;
        Ok(LoginGrant {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
            expires_in: self.lifetimes.access.num_seconds(),
            user_info: UserInfo {
                user_id,
                username: username.to_string(),
                role: role.filter(|r| !r.is_empty()).map(str::to_string),
            },
        })
    }

    // ── Verification ─────────────────────────────────────────────────

    /// Verifies an access token and returns its claims.
    ///
    /// Checks, in order: blacklist, JWT signature, token type, keyed claim
    /// signature, login generation, hard expiry and inactivity. An idle token
    /// is blacklisted before [`AuthError::InactivityTimeout`] is returned.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::TokenMissing);
        }
        if self.blacklist.is_revoked(token).await? {
            debug!("Rejected blacklisted token");
            return Err(AuthError::Blacklisted);
        }

        let claims = self.decoder.decode(token)?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::TokenMalformed(
                "expected an access token".to_string(),
            ));
        }
        let last_activity = claims
            .last_activity
            .ok_or_else(|| AuthError::TokenMalformed("missing last_activity".to_string()))?;

        self.check_signature(&claims)?;
        self.check_generation(&claims).await?;

        let now = self.clock.now();
        if claims.is_expired_at(now) {
            debug!(user_id = claims.user_id, session_id = %claims.session_id, "Access token expired");
            return Err(AuthError::TokenExpired);
        }

        let idle = now.timestamp() - last_activity;
        if idle > self.lifetimes.inactivity.num_seconds() {
            self.revoke(token, Some(&claims), now).await?;
            warn!(
                user_id = claims.user_id,
                session_id = %claims.session_id,
                idle_seconds = idle,
                "Session expired due to inactivity"
            );
            return Err(AuthError::InactivityTimeout);
        }

        Ok(claims)
    }

    /// User id of a verified access token.
    pub async fn current_user_id(&self, token: &str) -> Result<i64, AuthError> {
        Ok(self.verify(token).await?.user_id)
    }

    /// Role of a verified access token. `None` when verification fails or
    /// the token carries no role.
    pub async fn current_role(&self, token: &str) -> Option<String> {
        let claims = self.verify(token).await.ok()?;
        claims.role().map(str::to_string)
    }

    /// Username of a verified access token, `None` when verification fails.
    pub async fn current_username(&self, token: &str) -> Option<String> {
        let claims = self.verify(token).await.ok()?;
        if claims.username.is_empty() {
            None
        } else {
            Some(claims.username)
        }
    }

    /// Session details of a verified access token.
    pub async fn session_info(&self, token: &str) -> Result<SessionInfo, AuthError> {
        let claims = self.verify(token).await?;
        Ok(SessionInfo::from(&claims))
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Exchanges a refresh token for a new pair of the same session.
    ///
    /// The login generation is not advanced, so access tokens issued earlier
    /// in the same session remain valid. The presented refresh token is
    /// blacklisted on success, and also when it is stale or expired.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::TokenMissing);
        }
        if self.blacklist.is_revoked(refresh_token).await? {
            debug!("Rejected blacklisted refresh token");
            return Err(AuthError::Blacklisted);
        }

        let claims = self.decoder.decode(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::TokenMalformed(
                "expected a refresh token".to_string(),
            ));
        }
        self.check_signature(&claims)?;

        let now = self.clock.now();
        if let Err(err) = self.check_generation(&claims).await {
            self.revoke(refresh_token, Some(&claims), now).await?;
            return Err(err);
        }
        if claims.is_expired_at(now) {
            self.revoke(refresh_token, Some(&claims), now).await?;
            debug!(user_id = claims.user_id, "Refresh token expired");
            return Err(AuthError::TokenExpired);
        }

        let seed = SessionSeed::from(&claims);
        let pair = self.encoder.generate_token_pair(
            &seed,
            now,
            self.lifetimes.access,
            self.lifetimes.refresh,
        )?;
        self.revoke(refresh_token, Some(&claims), now).await?;

        info!(
            user_id = claims.user_id,
            session_id = %claims.session_id,
            "Refreshed token pair"
        );
        Ok(pair)
    }

    /// Re-issues a current access token with `last_activity` set to now and
    /// a fresh `jti`.
    ///
    /// The old string is blacklisted. Signature-bound fields are unchanged.
    pub async fn extend_activity(&self, access_token: &str) -> Result<String, AuthError> {
        let mut claims = self.verify(access_token).await?;
        let now = self.clock.now();
        claims.last_activity = Some(now.timestamp());
        claims.jti = Uuid::new_v4();

        let extended = self.encoder.encode(&claims)?;
        self.revoke(access_token, Some(&claims), now).await?;

        debug!(
            user_id = claims.user_id,
            session_id = %claims.session_id,
            "Extended session activity"
        );
        Ok(extended)
    }

    // ── Revocation ───────────────────────────────────────────────────

    /// Blacklists the exact token string.
    ///
    /// A token that cannot be decoded is still blacklisted and acknowledged
    /// without a user id.
    pub async fn logout(&self, token: &str) -> Result<LogoutAck, AuthError> {
        if token.is_empty() {
            return Err(AuthError::TokenMissing);
        }
        let now = self.clock.now();
        let claims = self.decoder.decode(token).ok();
        self.revoke(token, claims.as_ref(), now).await?;

        let user_id = claims.as_ref().map(|c| c.user_id);
        match &claims {
            Some(c) => info!(user_id = c.user_id, session_id = %c.session_id, "Logged out"),
            None => info!("Logged out undecodable token"),
        }

        Ok(LogoutAck {
            message: "Successfully logged out".to_string(),
            user_id,
        })
    }

    /// Invalidates every token of `user_id` by advancing its generation.
    ///
    /// Returns the new generation.
    pub async fn force_logout_all(&self, user_id: i64) -> Result<i64, AuthError> {
        let now = self.clock.now();
        let generation = self
            .registry
            .advance(user_id, now.timestamp_millis())
            .await?;
        warn!(user_id, generation, "Forced logout of all sessions");
        Ok(generation)
    }

    /// Overwrites the user's login generation, e.g. from another instance.
    pub async fn sync_login_timestamp(
        &self,
        user_id: i64,
        login_timestamp: i64,
    ) -> Result<(), AuthError> {
        self.registry.set_latest(user_id, login_timestamp).await?;
        debug!(user_id, login_timestamp, "Synchronised login generation");
        Ok(())
    }

    /// The user's latest login generation.
    pub async fn last_login(&self, user_id: i64) -> Result<Option<i64>, AuthError> {
        Ok(self.registry.get_latest(user_id).await?)
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Decodes a token without verifying it and reports its state.
    pub async fn token_info(&self, token: &str) -> Result<TokenInfo, AuthError> {
        if token.is_empty() {
            return Err(AuthError::TokenMissing);
        }
        let claims = self.decoder.decode_unverified(token)?;
        let latest = self.registry.get_latest(claims.user_id).await?;
        let is_blacklisted = self.blacklist.is_revoked(token).await?;
        let now = self.clock.now();

        Ok(TokenInfo {
            is_blacklisted,
            is_from_latest_login: latest.is_none_or(|l| claims.login_timestamp >= l),
            latest_login_timestamp: latest,
            is_expired: claims.is_expired_at(now),
            signature_valid: self.encoder.signer().matches(&claims),
            claims,
        })
    }

    /// Session state of a user.
    pub async fn user_status(&self, user_id: i64) -> Result<UserSessionStatus, AuthError> {
        Ok(UserSessionStatus {
            user_id,
            latest_login_timestamp: self.registry.get_latest(user_id).await?,
            blacklist_size: self.blacklist.len().await?,
            login_records: self.registry.len().await?,
        })
    }

    /// Whether the token has a valid JWT signature and carries every
    /// required claim. Nothing else is checked.
    pub fn is_valid_format(&self, token: &str) -> bool {
        match self.decoder.decode(token) {
            Ok(claims) => claims.token_type == TokenType::Refresh || claims.last_activity.is_some(),
            Err(_) => false,
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn check_signature(&self, claims: &Claims) -> Result<(), AuthError> {
        if self.encoder.signer().matches(claims) {
            Ok(())
        } else {
            warn!(user_id = claims.user_id, "Keyed claim signature mismatch");
            Err(AuthError::SignatureMismatch)
        }
    }

    async fn check_generation(&self, claims: &Claims) -> Result<(), AuthError> {
        match self.registry.get_latest(claims.user_id).await? {
            Some(latest) if claims.login_timestamp < latest => {
                debug!(
                    user_id = claims.user_id,
                    session_id = %claims.session_id,
                    "Token superseded by a newer login"
                );
                Err(AuthError::SessionSuperseded)
            }
            _ => Ok(()),
        }
    }

    async fn revoke(
        &self,
        token: &str,
        claims: Option<&Claims>,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let remaining = match claims {
            Some(claims) => claims.remaining_ttl_seconds(now),
            None => self.lifetimes.refresh.num_seconds().max(0) as u64,
        };
        self.blacklist
            .revoke(token, revocation_ttl(remaining))
            .await?;
        Ok(())
    }
}
