//! Role checks on verified claims.

pub mod enforcer;

pub use enforcer::{ADMIN, STUDENT, TEACHER, require_role};
