//! # coursehub-auth
//!
//! Token-based session authentication for CourseHub.
//!
//! ## Modules
//!
//! - `jwt`: claims, keyed claim signature, JWT encoding and decoding
//! - `session`: issue / verify / refresh / logout and registry cleanup
//! - `rbac`: role checks on verified claims
//! - `error`: the authentication failure taxonomy

pub mod error;
pub mod jwt;
pub mod rbac;
pub mod session;

pub use error::AuthError;
pub use jwt::{ClaimSigner, Claims, JwtDecoder, JwtEncoder, SessionSeed, TokenPair, TokenType};
pub use session::{
    LoginGrant, LogoutAck, SessionCleanup, SessionInfo, SessionManager, TokenInfo, TokenLifetimes,
    UserInfo, UserSessionStatus,
};
