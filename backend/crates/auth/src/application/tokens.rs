//! Token Service
//!
//! The two token formats issued by the auth subsystem:
//!
//! - **Refresh token**: `{session UUID}.{base64url HMAC-SHA256}` referencing
//!   a server-side session row. Verification recomputes the HMAC before any
//!   database access.
//! - **Access token**: short-lived HS256 JWT carrying the public id, role
//!   and session id. Validated locally by middleware, no database access.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Claims carried by access JWTs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: user public id
    pub sub: String,
    /// Role code ("user" / "moderator" / "admin")
    pub role: String,
    /// Refresh session id backing this token
    pub sid: Uuid,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl AccessClaims {
    /// Parsed role; defaults to User for unknown codes from older tokens
    pub fn user_role(&self) -> UserRole {
        UserRole::from_code(&self.role).unwrap_or_default()
    }
}

/// Generate a signed refresh token for a session
pub fn sign_refresh_token(session: &AuthSession, config: &AuthConfig) -> String {
    let session_id = session.session_id.to_string();

    let mut mac = Hmac::<Sha256>::new_from_slice(&config.session_secret)
        .expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Parse and verify a refresh token, returning the session id
pub fn parse_refresh_token(token: &str, config: &AuthConfig) -> AuthResult<Uuid> {
    let (session_id_str, signature_b64) = token
        .split_once('.')
        .ok_or(AuthError::SessionInvalid)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(&config.session_secret)
        .expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id_str.parse().map_err(|_| AuthError::SessionInvalid)
}

/// Issue an access JWT for a live session
pub fn issue_access_token(session: &AuthSession, config: &AuthConfig) -> AuthResult<String> {
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: session.public_id.to_string(),
        role: session.user_role.code().to_string(),
        sid: session.session_id,
        iat: now,
        exp: now + config.access_ttl_secs(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&config.jwt_secret),
    )
    .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {e}")))
}

/// Verify an access JWT and return its claims
pub fn verify_access_token(token: &str, config: &AuthConfig) -> AuthResult<AccessClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 30;

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&config.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::AccessTokenInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::user_name::UserName;
    use chrono::Duration;

    fn test_session() -> AuthSession {
        let user = User::new(UserName::new("gig_goer").unwrap());
        AuthSession::new(
            user.user_id,
            user.public_id,
            user.user_role,
            false,
            vec![0u8; 32],
            None,
            None,
            Duration::hours(12),
        )
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let config = AuthConfig::with_random_secrets();
        let session = test_session();

        let token = sign_refresh_token(&session, &config);
        let parsed = parse_refresh_token(&token, &config).unwrap();
        assert_eq!(parsed, session.session_id);
    }

    #[test]
    fn test_refresh_token_tamper_detection() {
        let config = AuthConfig::with_random_secrets();
        let session = test_session();

        let token = sign_refresh_token(&session, &config);

        // Swap in a different session id, keep the signature
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), sig);
        assert!(matches!(
            parse_refresh_token(&forged, &config),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_refresh_token_wrong_secret() {
        let config = AuthConfig::with_random_secrets();
        let other = AuthConfig::with_random_secrets();
        let session = test_session();

        let token = sign_refresh_token(&session, &config);
        assert!(parse_refresh_token(&token, &other).is_err());
    }

    #[test]
    fn test_refresh_token_garbage() {
        let config = AuthConfig::with_random_secrets();
        assert!(parse_refresh_token("no-dot-here", &config).is_err());
        assert!(parse_refresh_token("a.b.c", &config).is_err());
        assert!(parse_refresh_token("", &config).is_err());
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = AuthConfig::with_random_secrets();
        let session = test_session();

        let token = issue_access_token(&session, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, session.public_id.to_string());
        assert_eq!(claims.sid, session.session_id);
        assert_eq!(claims.user_role(), UserRole::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_access_token_wrong_secret() {
        let config = AuthConfig::with_random_secrets();
        let other = AuthConfig::with_random_secrets();
        let session = test_session();

        let token = issue_access_token(&session, &config).unwrap();
        assert!(matches!(
            verify_access_token(&token, &other),
            Err(AuthError::AccessTokenInvalid)
        ));
    }

    #[test]
    fn test_access_token_expired() {
        let config = AuthConfig::with_random_secrets();
        let session = test_session();

        // Hand-craft claims that expired well past the verification leeway
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: session.public_id.to_string(),
            role: session.user_role.code().to_string(),
            sid: session.session_id,
            iat: now - 3600,
            exp: now - 1800,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&config.jwt_secret),
        )
        .unwrap();

        assert!(matches!(
            verify_access_token(&token, &config),
            Err(AuthError::AccessTokenInvalid)
        ));
    }
}
