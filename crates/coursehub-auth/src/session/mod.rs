//! Session lifecycle: issue, verify, refresh, logout and periodic cleanup.

pub mod cleanup;
pub mod manager;
pub mod policy;
pub mod types;

pub use cleanup::SessionCleanup;
pub use manager::SessionManager;
pub use policy::TokenLifetimes;
pub use types::{LoginGrant, LogoutAck, SessionInfo, TokenInfo, UserInfo, UserSessionStatus};
