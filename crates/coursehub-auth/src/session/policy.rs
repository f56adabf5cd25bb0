//! Token lifetime policy.

use chrono::Duration;

use coursehub_core::config::AuthConfig;

/// Lifetimes applied when minting and verifying tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    /// Hard lifetime of an access token.
    pub access: Duration,
    /// Hard lifetime of a refresh token.
    pub refresh: Duration,
    /// Maximum idle time of an access token.
    pub inactivity: Duration,
}

/// Floor applied to blacklist entry lifetimes.
pub(crate) const MIN_REVOCATION_TTL_SECONDS: u64 = 60;

impl From<&AuthConfig> for TokenLifetimes {
    fn from(config: &AuthConfig) -> Self {
        Self {
            access: Duration::minutes(config.access_ttl_minutes as i64),
            refresh: Duration::days(config.refresh_ttl_days as i64),
            inactivity: Duration::minutes(config.inactivity_timeout_minutes as i64),
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

/// Blacklist TTL for a token with `remaining_seconds` of life left.
///
/// One extra second covers the fraction of the current second already
/// elapsed, so the entry outlives the last second in which `exp` verifies.
pub(crate) fn revocation_ttl(remaining_seconds: u64) -> std::time::Duration {
    std::time::Duration::from_secs(
        remaining_seconds
            .saturating_add(1)
            .max(MIN_REVOCATION_TTL_SECONDS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let lifetimes = TokenLifetimes::default();
        assert_eq!(lifetimes.access, Duration::hours(24));
        assert_eq!(lifetimes.refresh, Duration::days(7));
        assert_eq!(lifetimes.inactivity, Duration::minutes(60));
    }

    #[test]
    fn test_revocation_ttl_floor() {
        assert_eq!(revocation_ttl(0).as_secs(), 60);
        assert_eq!(revocation_ttl(59).as_secs(), 60);
        assert_eq!(revocation_ttl(60).as_secs(), 61);
        assert_eq!(revocation_ttl(3_600).as_secs(), 3_601);
        assert_eq!(revocation_ttl(u64::MAX).as_secs(), u64::MAX);
    }
}
