//! Process-local session stores.

pub mod blacklist;
pub mod registry;

pub use blacklist::MemoryTokenBlacklist;
pub use registry::MemoryLoginRegistry;
