//! Redis token blacklist: one expiring key per revoked token.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use coursehub_core::result::AppResult;
use coursehub_core::traits::TokenBlacklist;

use super::client::{RedisClient, store_error};
use crate::keys;

/// Revoked tokens shared through Redis. Expiry is left to Redis itself.
#[derive(Debug, Clone)]
pub struct RedisTokenBlacklist {
    client: RedisClient,
}

impl RedisTokenBlacklist {
    /// Creates a blacklist on top of an established client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenBlacklist for RedisTokenBlacklist {
    async fn revoke(&self, token: &str, ttl: Duration) -> AppResult<()> {
        let key = keys::revoked_token(self.client.prefix(), token);
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&key, "revoked", seconds)
            .await
            .map_err(store_error("Failed to revoke token"))?;
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        let key = keys::revoked_token(self.client.prefix(), token);
        let mut conn = self.client.conn_mut();
        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(store_error("Failed to check token revocation"))?;
        Ok(exists)
    }

    async fn purge_expired(&self) -> AppResult<()> {
        debug!("Redis expires revoked tokens natively");
        Ok(())
    }

    async fn len(&self) -> AppResult<usize> {
        let pattern = keys::revoked_token_pattern(self.client.prefix());
        Ok(self.client.scan_keys(&pattern).await?.len())
    }

    async fn clear(&self) -> AppResult<()> {
        let pattern = keys::revoked_token_pattern(self.client.prefix());
        let keys = self.client.scan_keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .del(keys)
            .await
            .map_err(store_error("Failed to clear blacklist"))?;
        Ok(())
    }
}
