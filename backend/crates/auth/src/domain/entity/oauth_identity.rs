//! OAuth Identity Entities
//!
//! Links between local accounts and external identity providers, plus
//! the single-use state rows that protect the authorization-code flow.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::user_id::UserId;
use platform::crypto::url_safe_token;

/// Supported OAuth providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum OAuthProvider {
    #[display("google")]
    Google,
    #[display("apple")]
    Apple,
}

impl OAuthProvider {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "google" => Some(OAuthProvider::Google),
            "apple" => Some(OAuthProvider::Apple),
            _ => None,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Apple => "apple",
        }
    }
}

/// Link between a local user and a provider identity
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    pub provider: OAuthProvider,
    /// Stable subject identifier at the provider
    pub provider_user_id: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl OAuthIdentity {
    pub fn new(provider: OAuthProvider, provider_user_id: String, user_id: UserId) -> Self {
        Self {
            provider,
            provider_user_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Single-use state for the authorization-code flow
#[derive(Debug, Clone)]
pub struct OAuthState {
    /// Random state value round-tripped through the provider
    pub state: String,
    pub provider: OAuthProvider,
    /// Redirect URI the flow was started with
    pub redirect_uri: String,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl OAuthState {
    /// State TTL
    pub const TTL_MINUTES: i64 = 10;

    pub fn issue(provider: OAuthProvider, redirect_uri: String) -> Self {
        let now = Utc::now();
        Self {
            state: url_safe_token(24),
            provider,
            redirect_uri,
            expires_at_ms: (now + Duration::minutes(Self::TTL_MINUTES)).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

/// Identity claims returned by a provider after code exchange
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    pub provider: OAuthProvider,
    pub provider_user_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_codes() {
        assert_eq!(OAuthProvider::from_code("google"), Some(OAuthProvider::Google));
        assert_eq!(OAuthProvider::from_code("apple"), Some(OAuthProvider::Apple));
        assert_eq!(OAuthProvider::from_code("facebook"), None);
        assert_eq!(OAuthProvider::Google.to_string(), "google");
        assert_eq!(OAuthProvider::Apple.code(), "apple");
    }

    #[test]
    fn test_state_issue() {
        let state = OAuthState::issue(OAuthProvider::Google, "https://ph.test/cb".into());
        assert!(!state.state.is_empty());
        assert!(!state.is_expired());

        let other = OAuthState::issue(OAuthProvider::Google, "https://ph.test/cb".into());
        assert_ne!(state.state, other.state);
    }
}
