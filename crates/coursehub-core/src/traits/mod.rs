//! Core traits defined in `coursehub-core` and implemented by other crates.

pub mod clock;
pub mod session_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session_store::{LoginRegistry, TokenBlacklist};
