//! Periodic pruning of login records and expired blacklist entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use coursehub_core::config::SessionConfig;
use coursehub_core::error::AppError;
use coursehub_core::traits::{LoginRegistry, TokenBlacklist};

/// Handles periodic cleanup of the session stores.
#[derive(Clone)]
pub struct SessionCleanup {
    /// Login generation registry to prune.
    registry: Arc<dyn LoginRegistry>,
    /// Blacklist whose expired entries are purged.
    blacklist: Arc<dyn TokenBlacklist>,
    /// Registry size that triggers pruning.
    max_login_records: usize,
}

impl std::fmt::Debug for SessionCleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCleanup")
            .field("max_login_records", &self.max_login_records)
            .finish()
    }
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(
        registry: Arc<dyn LoginRegistry>,
        blacklist: Arc<dyn TokenBlacklist>,
        max_login_records: usize,
    ) -> Self {
        Self {
            registry,
            blacklist,
            max_login_records,
        }
    }

    /// Creates a handler using the configured record limit.
    pub fn from_config(
        config: &SessionConfig,
        registry: Arc<dyn LoginRegistry>,
        blacklist: Arc<dyn TokenBlacklist>,
    ) -> Self {
        Self::new(registry, blacklist, config.max_login_records)
    }

    /// Runs one cleanup cycle.
    ///
    /// Returns the number of login records removed.
    pub async fn run_cleanup(&self) -> Result<usize, AppError> {
        let pruned = self.registry.prune(self.max_login_records).await?;
        self.blacklist.purge_expired().await?;

        if pruned > 0 {
            info!(
                pruned,
                max_login_records = self.max_login_records,
                "Pruned login records"
            );
        }
        Ok(pruned)
    }

    /// Runs cleanup every `interval` until `shutdown` flips to `true`.
    ///
    /// Failed cycles are logged and retried on the next tick.
    pub async fn run(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Session cleanup task started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cleanup().await {
                        error!(error = %e, "Session cleanup failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Session cleanup task stopped");
    }
}
