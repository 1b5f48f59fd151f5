//! Login Token Entity (magic link)
//!
//! One-time emailed login token. Only the SHA-256 of the token is
//! stored; the clear token exists solely inside the emailed link.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::user_id::UserId;
use platform::crypto::{sha256, url_safe_token};

/// Magic link login token (hashed at rest)
#[derive(Debug, Clone)]
pub struct LoginToken {
    /// SHA-256 of the clear token
    pub token_hash: Vec<u8>,
    /// Account the token logs into
    pub user_id: UserId,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl LoginToken {
    /// Issue a new token
    ///
    /// Returns the entity to persist and the clear token to email.
    pub fn issue(user_id: UserId, ttl: Duration) -> (Self, String) {
        let clear = url_safe_token(32);
        let now = Utc::now();

        let token = Self {
            token_hash: sha256(clear.as_bytes()).to_vec(),
            user_id,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        };

        (token, clear)
    }

    /// Hash a presented clear token for lookup
    pub fn hash_of(clear: &str) -> Vec<u8> {
        sha256(clear.as_bytes()).to_vec()
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_hashes_token() {
        let (token, clear) = LoginToken::issue(UserId::new(), Duration::minutes(15));

        assert_eq!(clear.len(), 43); // 32 bytes base64url
        assert_eq!(token.token_hash, LoginToken::hash_of(&clear));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, clear_a) = LoginToken::issue(UserId::new(), Duration::minutes(15));
        let (b, clear_b) = LoginToken::issue(UserId::new(), Duration::minutes(15));
        assert_ne!(clear_a, clear_b);
        assert_ne!(a.token_hash, b.token_hash);
    }

    #[test]
    fn test_expiry() {
        let (mut token, _) = LoginToken::issue(UserId::new(), Duration::minutes(15));
        token.expires_at_ms = Utc::now().timestamp_millis() - 1;
        assert!(token.is_expired());
    }
}
