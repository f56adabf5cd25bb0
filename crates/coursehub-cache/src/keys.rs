//! Key builders for session state kept in shared stores.
//!
//! Centralising key construction makes it easy to find every key the
//! auth layer writes.

use sha2::{Digest, Sha256};

/// Hash holding `user_id -> login generation`.
pub fn login_generations(prefix: &str) -> String {
    format!("{prefix}auth:login_generation")
}

/// Key marking a revoked token. The token itself is hashed so keys stay short.
pub fn revoked_token(prefix: &str, token: &str) -> String {
    format!("{prefix}auth:revoked:{}", token_digest(token))
}

/// Pattern matching every revoked-token key.
pub fn revoked_token_pattern(prefix: &str) -> String {
    format!("{prefix}auth:revoked:*")
}

/// Hex SHA-256 of a token string.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_key_is_stable_and_prefixed() {
        let a = revoked_token("coursehub:", "header.payload.sig");
        let b = revoked_token("coursehub:", "header.payload.sig");
        assert_eq!(a, b);
        assert!(a.starts_with("coursehub:auth:revoked:"));
        assert_eq!(a.len(), "coursehub:auth:revoked:".len() + 64);
    }

    #[test]
    fn test_distinct_tokens_distinct_keys() {
        assert_ne!(revoked_token("p:", "a.b.c"), revoked_token("p:", "a.b.d"));
    }
}
