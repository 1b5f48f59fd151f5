//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Google OAuth settings
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Apple Sign-In settings
///
/// The client secret is not static: it is an ES256 JWT minted from the
/// team/key identifiers and the private key below.
#[derive(Debug, Clone)]
pub struct AppleOAuthConfig {
    pub client_id: String,
    pub team_id: String,
    pub key_id: String,
    pub private_key_pem: String,
    pub redirect_uri: String,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token (JWT) cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Secret for HMAC-signing refresh tokens (32 bytes)
    pub session_secret: [u8; 32],
    /// Secret for signing access JWTs (HS256)
    pub jwt_secret: [u8; 32],
    /// Access token TTL (15 minutes)
    pub access_ttl: Duration,
    /// Refresh session TTL without "Remember Me" (12 hours)
    pub session_ttl_short: Duration,
    /// Refresh session TTL with "Remember Me" (14 days)
    pub session_ttl_long: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,

    /// Magic link token TTL (15 minutes)
    pub magic_link_ttl: Duration,
    /// Base URL for emailed magic links (e.g. "https://psychichomily.com/login/verify")
    pub magic_link_base_url: String,

    /// WebAuthn relying party ID (domain, e.g. "psychichomily.com")
    pub rp_id: String,
    /// WebAuthn relying party origin (e.g. "https://psychichomily.com")
    pub rp_origin: String,
    /// WebAuthn relying party display name
    pub rp_name: String,

    /// Google OAuth (feature disabled when absent)
    pub google: Option<GoogleOAuthConfig>,
    /// Apple Sign-In (feature disabled when absent)
    pub apple: Option<AppleOAuthConfig>,

    /// Rate limit for sign-in attempts (per client)
    pub sign_in_rate: RateLimitConfig,
    /// Rate limit for sign-up attempts (per client)
    pub sign_up_rate: RateLimitConfig,
    /// Rate limit for magic-link requests (per client)
    pub magic_link_rate: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "ph_access".to_string(),
            refresh_cookie_name: "ph_refresh".to_string(),
            session_secret: [0u8; 32],
            jwt_secret: [0u8; 32],
            access_ttl: Duration::from_secs(15 * 60),
            session_ttl_short: Duration::from_secs(12 * 3600),
            session_ttl_long: Duration::from_secs(14 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            magic_link_ttl: Duration::from_secs(15 * 60),
            magic_link_base_url: "http://localhost:3000/login/verify".to_string(),
            rp_id: "localhost".to_string(),
            rp_origin: "http://localhost:3000".to_string(),
            rp_name: "Psychic Homily".to_string(),
            google: None,
            apple: None,
            sign_in_rate: RateLimitConfig::per_minute(10),
            sign_up_rate: RateLimitConfig::per_hour(10),
            magic_link_rate: RateLimitConfig::per_hour(5),
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development)
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;
        let mut session_secret = [0u8; 32];
        let mut jwt_secret = [0u8; 32];
        rand::rng().fill_bytes(&mut session_secret);
        rand::rng().fill_bytes(&mut jwt_secret);
        Self {
            session_secret,
            jwt_secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Get access token TTL in seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.as_secs() as i64
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_short_ms(&self) -> i64 {
        self.session_ttl_short.as_millis() as i64
    }

    /// Get session TTL with Remember Me in milliseconds
    pub fn session_ttl_long_ms(&self) -> i64 {
        self.session_ttl_long.as_millis() as i64
    }

    /// Session TTL for a given remember_me choice
    pub fn session_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.session_ttl_long
        } else {
            self.session_ttl_short
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.access_cookie_name, "ph_access");
        assert_eq!(config.refresh_cookie_name, "ph_refresh");
        assert_eq!(config.access_ttl, Duration::from_secs(900));
        assert_eq!(config.session_ttl_short, Duration::from_secs(12 * 3600));
        assert_eq!(config.session_ttl_long, Duration::from_secs(14 * 24 * 3600));
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert!(config.google.is_none());
        assert!(config.apple.is_none());
    }

    #[test]
    fn test_with_random_secrets() {
        let config1 = AuthConfig::with_random_secrets();
        let config2 = AuthConfig::with_random_secrets();

        assert_ne!(config1.session_secret, config2.session_secret);
        assert_ne!(config1.jwt_secret, config2.jwt_secret);
        assert_ne!(config1.session_secret, config1.jwt_secret);
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert!(config.session_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_session_ttl_choice() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl(false), config.session_ttl_short);
        assert_eq!(config.session_ttl(true), config.session_ttl_long);
    }
}
