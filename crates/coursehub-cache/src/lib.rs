//! # coursehub-cache
//!
//! Backends for the session state used by the auth layer: the per-user
//! login generation registry and the revoked-token blacklist.
//!
//! - `memory`: process-local stores (`dashmap`, `moka`)
//! - `redis`: shared stores for multi-instance deployments
//! - `provider`: builds the pair selected by configuration

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::SessionStores;
