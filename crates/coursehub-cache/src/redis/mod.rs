//! Redis-backed session stores for multi-instance deployments.
//!
//! Login generations and revocations written by one instance are seen by
//! every other instance using the same server and key prefix, and survive
//! process restarts.

pub mod blacklist;
pub mod client;
pub mod registry;

pub use blacklist::RedisTokenBlacklist;
pub use client::RedisClient;
pub use registry::RedisLoginRegistry;
