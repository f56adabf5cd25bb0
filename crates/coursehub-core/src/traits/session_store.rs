//! Storage traits for session state: the login generation registry and the
//! revoked-token blacklist.
//!
//! Both are injected into the auth service so the backing store (process
//! memory or Redis) can be chosen by configuration.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Per-user record of the most recent login generation.
///
/// Any token carrying an older generation than the one recorded here is
/// considered superseded.
#[async_trait]
pub trait LoginRegistry: Send + Sync + std::fmt::Debug + 'static {
    /// Overwrites the generation recorded for `user_id`.
    async fn set_latest(&self, user_id: i64, login_timestamp: i64) -> AppResult<()>;

    /// Returns the generation recorded for `user_id`, if any.
    async fn get_latest(&self, user_id: i64) -> AppResult<Option<i64>>;

    /// Atomically records a new generation for `user_id` and returns it.
    ///
    /// The stored value becomes `max(candidate, previous + 1)`, so the
    /// generation strictly increases even when two logins share a
    /// timestamp.
    async fn advance(&self, user_id: i64, candidate: i64) -> AppResult<i64>;

    /// When more than `max_records` users are tracked, keeps only the
    /// `max_records / 2` most recent ones. Returns the number removed.
    async fn prune(&self, max_records: usize) -> AppResult<usize>;

    /// Number of users tracked.
    async fn len(&self) -> AppResult<usize>;

    /// Drops every record.
    async fn clear(&self) -> AppResult<()>;
}

/// Deny-list of revoked token strings.
#[async_trait]
pub trait TokenBlacklist: Send + Sync + std::fmt::Debug + 'static {
    /// Revokes `token` for at least `ttl`.
    async fn revoke(&self, token: &str, ttl: Duration) -> AppResult<()>;

    /// Whether `token` is currently revoked.
    async fn is_revoked(&self, token: &str) -> AppResult<bool>;

    /// Evicts entries whose TTL has elapsed.
    async fn purge_expired(&self) -> AppResult<()>;

    /// Number of revoked tokens currently held.
    async fn len(&self) -> AppResult<usize>;

    /// Drops every entry.
    async fn clear(&self) -> AppResult<()>;
}
