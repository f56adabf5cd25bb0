//! Keyed claim signature binding a token to its identity fields and the
//! server secret.
//!
//! The JWT signature already protects the payload; this second signature
//! additionally ties `user_id`, `session_id`, `token_type`, `exp` and
//! `login_timestamp` together, so claims copied between tokens of the same
//! secret are still rejected.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::claims::{Claims, TokenType};

/// Hex characters kept from the digest.
const SIGNATURE_LEN: usize = 16;

/// Computes and checks keyed claim signatures.
#[derive(Clone)]
pub struct ClaimSigner {
    secret: String,
}

impl std::fmt::Debug for ClaimSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimSigner").finish_non_exhaustive()
    }
}

impl ClaimSigner {
    /// Creates a signer bound to the server secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// `hex(sha256("{user_id}:{session_id}:{token_type}:{exp}:{login_timestamp}:{secret}"))[..16]`
    pub fn sign(
        &self,
        user_id: i64,
        session_id: Uuid,
        token_type: TokenType,
        exp: i64,
        login_timestamp: i64,
    ) -> String {
        let data = format!(
            "{user_id}:{session_id}:{token_type}:{exp}:{login_timestamp}:{}",
            self.secret
        );
        let digest = format!("{:x}", Sha256::digest(data.as_bytes()));
        digest[..SIGNATURE_LEN].to_string()
    }

    /// Whether the embedded signature matches recomputation.
    pub fn matches(&self, claims: &Claims) -> bool {
        let expected = self.sign(
            claims.user_id,
            claims.session_id,
            claims.token_type,
            claims.exp,
            claims.login_timestamp,
        );
        constant_time_eq(expected.as_bytes(), claims.signature.as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
