//! Redis login generation registry stored in a single hash.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Script};
use tracing::info;

use coursehub_core::result::AppResult;
use coursehub_core::traits::LoginRegistry;

use super::client::{RedisClient, store_error};
use crate::keys;

/// Atomic monotonic advance.
///
/// KEYS[1] = generations hash
/// ARGV[1] = user id
/// ARGV[2] = candidate generation
///
/// Returns the stored generation.
const ADVANCE_SCRIPT: &str = r#"
    local current = redis.call('HGET', KEYS[1], ARGV[1])
    local candidate = tonumber(ARGV[2])
    if current then
        local bumped = tonumber(current) + 1
        if bumped > candidate then
            candidate = bumped
        end
    end
    redis.call('HSET', KEYS[1], ARGV[1], candidate)
    return candidate
"#;

/// Removes a record only if it still holds the expected generation.
const REMOVE_IF_UNCHANGED_SCRIPT: &str = r#"
    if redis.call('HGET', KEYS[1], ARGV[1]) == ARGV[2] then
        return redis.call('HDEL', KEYS[1], ARGV[1])
    end
    return 0
"#;

/// Login generations shared through Redis.
#[derive(Debug, Clone)]
pub struct RedisLoginRegistry {
    client: RedisClient,
    hash_key: String,
}

impl RedisLoginRegistry {
    /// Creates a registry on top of an established client.
    pub fn new(client: RedisClient) -> Self {
        let hash_key = keys::login_generations(client.prefix());
        Self { client, hash_key }
    }
}

#[async_trait]
impl LoginRegistry for RedisLoginRegistry {
    async fn set_latest(&self, user_id: i64, login_timestamp: i64) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .hset(&self.hash_key, user_id, login_timestamp)
            .await
            .map_err(store_error("Failed to store login generation"))?;
        Ok(())
    }

    async fn get_latest(&self, user_id: i64) -> AppResult<Option<i64>> {
        let mut conn = self.client.conn_mut();
        let value: Option<i64> = conn
            .hget(&self.hash_key, user_id)
            .await
            .map_err(store_error("Failed to read login generation"))?;
        Ok(value)
    }

    async fn advance(&self, user_id: i64, candidate: i64) -> AppResult<i64> {
        let mut conn = self.client.conn_mut();
        let generation: i64 = Script::new(ADVANCE_SCRIPT)
            .key(&self.hash_key)
            .arg(user_id)
            .arg(candidate)
            .invoke_async(&mut conn)
            .await
            .map_err(store_error("Failed to advance login generation"))?;
        Ok(generation)
    }

    async fn prune(&self, max_records: usize) -> AppResult<usize> {
        let mut conn = self.client.conn_mut();
        let count: usize = conn
            .hlen(&self.hash_key)
            .await
            .map_err(store_error("Failed to count login records"))?;
        if count <= max_records {
            return Ok(0);
        }

        let records: HashMap<i64, i64> = conn
            .hgetall(&self.hash_key)
            .await
            .map_err(store_error("Failed to read login records"))?;
        let mut records: Vec<(i64, i64)> = records.into_iter().collect();
        records.sort_by(|a, b| b.1.cmp(&a.1));

        let script = Script::new(REMOVE_IF_UNCHANGED_SCRIPT);
        let mut removed = 0usize;
        for (user_id, generation) in records.into_iter().skip(max_records / 2) {
            let deleted: i64 = script
                .key(&self.hash_key)
                .arg(user_id)
                .arg(generation)
                .invoke_async(&mut conn)
                .await
                .map_err(store_error("Failed to prune login record"))?;
            removed += deleted as usize;
        }

        info!(removed, "Old login records pruned");
        Ok(removed)
    }

    async fn len(&self) -> AppResult<usize> {
        let mut conn = self.client.conn_mut();
        let count: usize = conn
            .hlen(&self.hash_key)
            .await
            .map_err(store_error("Failed to count login records"))?;
        Ok(count)
    }

    async fn clear(&self) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .del(&self.hash_key)
            .await
            .map_err(store_error("Failed to clear login records"))?;
        Ok(())
    }
}
