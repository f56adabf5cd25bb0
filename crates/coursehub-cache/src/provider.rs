//! Builds the session stores selected by configuration.

use std::sync::Arc;

use tracing::info;

use coursehub_core::config::{SessionConfig, StoreBackend};
use coursehub_core::result::AppResult;
use coursehub_core::traits::{LoginRegistry, TokenBlacklist};

/// The registry/blacklist pair handed to the auth layer.
#[derive(Debug, Clone)]
pub struct SessionStores {
    /// Login generation registry.
    pub registry: Arc<dyn LoginRegistry>,
    /// Revoked-token blacklist.
    pub blacklist: Arc<dyn TokenBlacklist>,
}

impl SessionStores {
    /// Creates the stores for the configured backend.
    pub async fn from_config(config: &SessionConfig) -> AppResult<Self> {
        info!(backend = %config.store, "Initializing session stores");
        match config.store {
            StoreBackend::Memory => Self::memory(),
            StoreBackend::Redis => Self::redis(config).await,
        }
    }

    /// Process-local stores.
    #[cfg(feature = "memory")]
    pub fn memory() -> AppResult<Self> {
        Ok(Self {
            registry: Arc::new(crate::memory::MemoryLoginRegistry::new()),
            blacklist: Arc::new(crate::memory::MemoryTokenBlacklist::new()),
        })
    }

    #[cfg(not(feature = "memory"))]
    pub fn memory() -> AppResult<Self> {
        Err(coursehub_core::error::AppError::configuration(
            "session.store = \"memory\" requires the `memory` feature",
        ))
    }

    #[cfg(feature = "redis-backend")]
    async fn redis(config: &SessionConfig) -> AppResult<Self> {
        let client = crate::redis::RedisClient::connect(&config.redis).await?;
        Ok(Self {
            registry: Arc::new(crate::redis::RedisLoginRegistry::new(client.clone())),
            blacklist: Arc::new(crate::redis::RedisTokenBlacklist::new(client)),
        })
    }

    #[cfg(not(feature = "redis-backend"))]
    async fn redis(_config: &SessionConfig) -> AppResult<Self> {
        Err(coursehub_core::error::AppError::configuration(
            "session.store = \"redis\" requires the `redis-backend` feature",
        ))
    }
}
