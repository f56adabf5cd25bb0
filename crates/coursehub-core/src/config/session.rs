//! Session registry and blacklist configuration.

use serde::{Deserialize, Serialize};

/// Session state configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Backend holding login generations and revoked tokens.
    #[serde(default)]
    pub store: StoreBackend,
    /// Login records kept before the registry is pruned to half this size.
    #[serde(default = "default_max_login_records")]
    pub max_login_records: usize,
    /// Interval between cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Redis settings, used when `store = "redis"`.
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            max_login_records: default_max_login_records(),
            cleanup_interval_seconds: default_cleanup_interval(),
            redis: RedisStoreConfig::default(),
        }
    }
}

/// Where session state lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local maps; state is lost on restart and not shared.
    #[default]
    Memory,
    /// Redis; state is shared by every instance pointing at the same server.
    Redis,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Redis => write!(f, "redis"),
        }
    }
}

/// Redis connection settings for the session stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix for every key written by CourseHub.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_max_login_records() -> usize {
    10_000
}

fn default_cleanup_interval() -> u64 {
    300
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "coursehub:".to_string()
}
