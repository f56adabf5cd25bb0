//! In-memory token blacklist using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use coursehub_core::result::AppResult;
use coursehub_core::traits::TokenBlacklist;

/// Per-entry expiry: each revoked token lives for the TTL stored as its value.
struct RevocationExpiry;

impl Expiry<String, Duration> for RevocationExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        ttl: &Duration,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(*ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        ttl: &Duration,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(*ttl)
    }
}

/// Revoked tokens kept in a moka cache, keyed by the exact token string.
///
/// No capacity bound is set: evicting a live entry would silently
/// re-permit a revoked token. Memory is bounded by the per-entry TTL.
#[derive(Debug, Clone)]
pub struct MemoryTokenBlacklist {
    cache: Cache<String, Duration>,
}

impl MemoryTokenBlacklist {
    /// Creates an empty blacklist.
    pub fn new() -> Self {
        let cache = Cache::builder().expire_after(RevocationExpiry).build();
        Self { cache }
    }
}

impl Default for MemoryTokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenBlacklist for MemoryTokenBlacklist {
    async fn revoke(&self, token: &str, ttl: Duration) -> AppResult<()> {
        self.cache.insert(token.to_string(), ttl).await;
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        Ok(self.cache.contains_key(token))
    }

    async fn purge_expired(&self) -> AppResult<()> {
        self.cache.run_pending_tasks().await;
        debug!(entries = self.cache.entry_count(), "Blacklist maintenance ran");
        Ok(())
    }

    async fn len(&self) -> AppResult<usize> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    async fn clear(&self) -> AppResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoke_then_check() {
        let blacklist = MemoryTokenBlacklist::new();
        assert!(!blacklist.is_revoked("a.b.c").await.unwrap());

        blacklist
            .revoke("a.b.c", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(blacklist.is_revoked("a.b.c").await.unwrap());
        assert!(!blacklist.is_revoked("a.b.d").await.unwrap());
        assert_eq!(blacklist.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let blacklist = MemoryTokenBlacklist::new();
        blacklist
            .revoke("short.lived.token", Duration::from_millis(50))
            .await
            .unwrap();
        assert!(blacklist.is_revoked("short.lived.token").await.unwrap());

        tokio::time::sleep(Duration::from_millis(150)).await;
        blacklist.purge_expired().await.unwrap();

        assert!(!blacklist.is_revoked("short.lived.token").await.unwrap());
        assert_eq!(blacklist.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear() {
        let blacklist = MemoryTokenBlacklist::new();
        blacklist.revoke("x", Duration::from_secs(60)).await.unwrap();
        blacklist.revoke("y", Duration::from_secs(60)).await.unwrap();
        blacklist.clear().await.unwrap();
        assert!(!blacklist.is_revoked("x").await.unwrap());
        assert_eq!(blacklist.len().await.unwrap(), 0);
    }
}
