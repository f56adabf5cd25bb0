//! In-memory login generation registry backed by `DashMap`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use coursehub_core::result::AppResult;
use coursehub_core::traits::LoginRegistry;

/// Sharded concurrent map of `user_id -> login generation`.
///
/// Suitable for single-node deployments only: records are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoginRegistry {
    records: Arc<DashMap<i64, i64>>,
}

impl MemoryLoginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginRegistry for MemoryLoginRegistry {
    async fn set_latest(&self, user_id: i64, login_timestamp: i64) -> AppResult<()> {
        self.records.insert(user_id, login_timestamp);
        Ok(())
    }

    async fn get_latest(&self, user_id: i64) -> AppResult<Option<i64>> {
        Ok(self.records.get(&user_id).map(|r| *r.value()))
    }

    async fn advance(&self, user_id: i64, candidate: i64) -> AppResult<i64> {
        // The entry guard holds the shard lock, so concurrent logins for the
        // same user are serialised here.
        let generation = match self.records.entry(user_id) {
            Entry::Occupied(mut entry) => {
                let next = candidate.max(entry.get().saturating_add(1));
                entry.insert(next);
                next
            }
            Entry::Vacant(entry) => {
                entry.insert(candidate);
                candidate
            }
        };
        debug!(user_id, generation, "Login generation advanced");
        Ok(generation)
    }

    async fn prune(&self, max_records: usize) -> AppResult<usize> {
        if self.records.len() <= max_records {
            return Ok(0);
        }

        let mut snapshot: Vec<(i64, i64)> = self
            .records
            .iter()
            .map(|r| (*r.key(), *r.value()))
            .collect();
        snapshot.sort_by(|a, b| b.1.cmp(&a.1));

        let keep = max_records / 2;
        let mut removed = 0usize;
        for (user_id, generation) in snapshot.into_iter().skip(keep) {
            // Skip users who logged in again since the snapshot.
            if self
                .records
                .remove_if(&user_id, |_, current| *current == generation)
                .is_some()
            {
                removed += 1;
            }
        }

        info!(removed, kept = self.records.len(), "Old login records pruned");
        Ok(removed)
    }

    async fn len(&self) -> AppResult<usize> {
        Ok(self.records.len())
    }

    async fn clear(&self) -> AppResult<()> {
        self.records.clear();
        Ok(())
    }
}
