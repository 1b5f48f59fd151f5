//! OAuth Use Cases (Google, Apple Sign-In)
//!
//! Authorization-code flow with a single-use server-side state.
//! Token exchange is plain reqwest against the provider endpoints;
//! Apple's client secret is an ES256 JWT minted per exchange.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::application::config::{AppleOAuthConfig, AuthConfig, GoogleOAuthConfig};
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::entity::oauth_identity::{
    OAuthIdentity, OAuthProvider, OAuthState, OAuthUserInfo,
};
use crate::domain::entity::{credentials::Credentials, user::User, user_profile::UserProfile};
use crate::domain::repository::{
    CredentialsRepository, OAuthRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};
use platform::client::ClientFingerprint;
use platform::crypto::url_safe_token;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const APPLE_AUTH_URL: &str = "https://appleid.apple.com/auth/authorize";
const APPLE_TOKEN_URL: &str = "https://appleid.apple.com/auth/token";

/// OAuth flow use case
pub struct OAuthUseCase<R>
where
    R: UserRepository + CredentialsRepository + OAuthRepository + SessionRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    http: reqwest::Client,
}

impl<R> OAuthUseCase<R>
where
    R: UserRepository + CredentialsRepository + OAuthRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            config,
            http: reqwest::Client::new(),
        }
    }

    // ========================================================================
    // Start
    // ========================================================================

    /// Start the flow: persist state, return the provider authorize URL
    pub async fn start(&self, provider: OAuthProvider) -> AuthResult<String> {
        let redirect_uri = self.redirect_uri(provider)?;
        let state = OAuthState::issue(provider, redirect_uri.clone());
        self.repo.create_state(&state).await?;

        let url = match provider {
            OAuthProvider::Google => {
                let google = self.google_config()?;
                format!(
                    "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
                    GOOGLE_AUTH_URL,
                    urlencode(&google.client_id),
                    urlencode(&redirect_uri),
                    urlencode("openid email profile"),
                    urlencode(&state.state),
                )
            }
            OAuthProvider::Apple => {
                let apple = self.apple_config()?;
                format!(
                    "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&response_mode=form_post&state={}",
                    APPLE_AUTH_URL,
                    urlencode(&apple.client_id),
                    urlencode(&redirect_uri),
                    urlencode("name email"),
                    urlencode(&state.state),
                )
            }
        };

        tracing::info!(provider = %provider, "OAuth flow started");
        Ok(url)
    }

    // ========================================================================
    // Callback
    // ========================================================================

    /// Complete the flow: consume state, exchange the code, open a session
    pub async fn callback(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<IssuedSession> {
        let stored = self
            .repo
            .consume_state(state)
            .await?
            .ok_or(AuthError::OAuthStateInvalid)?;

        if stored.is_expired() || stored.provider != provider {
            return Err(AuthError::OAuthStateInvalid);
        }

        let info = match provider {
            OAuthProvider::Google => self.exchange_google(code, &stored.redirect_uri).await?,
            OAuthProvider::Apple => self.exchange_apple(code, &stored.redirect_uri).await?,
        };

        let user = self.resolve_user(&info).await?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let mut user = user;
        user.record_login();
        UserRepository::update(self.repo.as_ref(), &user).await?;

        tracing::info!(public_id = %user.public_id, provider = %provider, "OAuth login");

        let issuer = SessionIssuer::new(self.repo.clone(), self.config.clone());
        issuer.open(&user, true, &fingerprint).await
    }

    /// Find the linked user, or provision one on first sign-in
    async fn resolve_user(&self, info: &OAuthUserInfo) -> AuthResult<User> {
        if let Some(identity) = self
            .repo
            .find_identity(info.provider, &info.provider_user_id)
            .await?
        {
            return UserRepository::find_by_id(self.repo.as_ref(), &identity.user_id)
                .await?
                .ok_or(AuthError::UserNotFound);
        }

        // Link by verified email when the account already exists
        if let (Some(email_str), true) = (&info.email, info.email_verified) {
            if let Ok(email) = Email::new(email_str) {
                if let Some(existing) = self.repo.find_by_email(&email).await? {
                    let identity = OAuthIdentity::new(
                        info.provider,
                        info.provider_user_id.clone(),
                        existing.user_id,
                    );
                    self.repo.create_identity(&identity).await?;
                    return Ok(existing);
                }
            }
        }

        // First sign-in: provision a passwordless account
        let user_name = self.derive_user_name(info).await?;
        let user = User::new(user_name);

        let email = info
            .email
            .as_deref()
            .and_then(|e| Email::new(e).ok());
        let mut profile = match email {
            Some(email) => UserProfile::with_email(user.user_id, email, info.email_verified),
            None => UserProfile::new(user.user_id),
        };
        profile.display_name = info.display_name.clone();

        UserRepository::create(self.repo.as_ref(), &user, &profile).await?;
        CredentialsRepository::create(self.repo.as_ref(), &Credentials::passwordless(user.user_id))
            .await?;

        let identity =
            OAuthIdentity::new(info.provider, info.provider_user_id.clone(), user.user_id);
        self.repo.create_identity(&identity).await?;

        tracing::info!(public_id = %user.public_id, provider = %info.provider, "OAuth user provisioned");
        Ok(user)
    }

    /// Derive a unique user name from the provider email (or a random one)
    async fn derive_user_name(&self, info: &OAuthUserInfo) -> AuthResult<UserName> {
        let base = info
            .email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .map(|local| {
                local
                    .chars()
                    .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
                    .collect::<String>()
            })
            .filter(|s| s.len() >= 3)
            .unwrap_or_else(|| format!("fan-{}", &url_safe_token(6).to_lowercase()));

        if let Ok(name) = UserName::new(&base) {
            if !self.repo.exists_by_user_name(&name).await? {
                return Ok(name);
            }
        }

        // Collision or invalid base: append random suffixes until free
        for _ in 0..5 {
            let candidate = format!("{}-{}", base, url_safe_token(4).to_lowercase());
            if let Ok(name) = UserName::new(&candidate) {
                if !self.repo.exists_by_user_name(&name).await? {
                    return Ok(name);
                }
            }
        }

        Err(AuthError::Internal(
            "Could not derive a unique user name".to_string(),
        ))
    }

    // ========================================================================
    // Provider exchanges
    // ========================================================================

    async fn exchange_google(&self, code: &str, redirect_uri: &str) -> AuthResult<OAuthUserInfo> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        #[derive(Deserialize)]
        struct UserInfo {
            sub: String,
            email: Option<String>,
            #[serde(default)]
            email_verified: bool,
            name: Option<String>,
        }

        let google = self.google_config()?;

        let mut params = HashMap::new();
        params.insert("client_id", google.client_id.clone());
        params.insert("client_secret", google.client_secret.clone());
        params.insert("code", code.to_string());
        params.insert("grant_type", "authorization_code".to_string());
        params.insert("redirect_uri", redirect_uri.to_string());

        let token_resp = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::OAuthExchange(format!("Google token request failed: {e}")))?;

        if !token_resp.status().is_success() {
            return Err(AuthError::OAuthExchange(format!(
                "Google token request failed with status {}",
                token_resp.status()
            )));
        }

        let token: TokenResponse = token_resp
            .json()
            .await
            .map_err(|e| AuthError::OAuthExchange(format!("Bad Google token response: {e}")))?;

        let user_resp = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AuthError::OAuthExchange(format!("Google userinfo failed: {e}")))?;

        if !user_resp.status().is_success() {
            return Err(AuthError::OAuthExchange(format!(
                "Google userinfo failed with status {}",
                user_resp.status()
            )));
        }

        let user: UserInfo = user_resp
            .json()
            .await
            .map_err(|e| AuthError::OAuthExchange(format!("Bad Google userinfo: {e}")))?;

        Ok(OAuthUserInfo {
            provider: OAuthProvider::Google,
            provider_user_id: user.sub,
            email: user.email,
            email_verified: user.email_verified,
            display_name: user.name,
        })
    }

    async fn exchange_apple(&self, code: &str, redirect_uri: &str) -> AuthResult<OAuthUserInfo> {
        #[derive(Deserialize)]
        struct TokenResponse {
            id_token: String,
        }

        #[derive(Deserialize)]
        struct AppleIdClaims {
            sub: String,
            email: Option<String>,
            #[serde(default)]
            email_verified: Option<serde_json::Value>,
        }

        let apple = self.apple_config()?;
        let client_secret = generate_apple_client_secret(apple)?;

        let mut params = HashMap::new();
        params.insert("client_id", apple.client_id.clone());
        params.insert("client_secret", client_secret);
        params.insert("code", code.to_string());
        params.insert("grant_type", "authorization_code".to_string());
        params.insert("redirect_uri", redirect_uri.to_string());

        let token_resp = self
            .http
            .post(APPLE_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::OAuthExchange(format!("Apple token request failed: {e}")))?;

        if !token_resp.status().is_success() {
            return Err(AuthError::OAuthExchange(format!(
                "Apple token request failed with status {}",
                token_resp.status()
            )));
        }

        let token: TokenResponse = token_resp
            .json()
            .await
            .map_err(|e| AuthError::OAuthExchange(format!("Bad Apple token response: {e}")))?;

        // The id_token arrives directly from Apple's token endpoint over
        // TLS; claims are read without a second signature check
        let claims: AppleIdClaims = decode_jwt_claims(&token.id_token)?;

        // Apple reports email_verified as either bool or "true"/"false"
        let email_verified = matches!(
            claims.email_verified,
            Some(serde_json::Value::Bool(true))
        ) || matches!(
            &claims.email_verified,
            Some(serde_json::Value::String(s)) if s == "true"
        );

        Ok(OAuthUserInfo {
            provider: OAuthProvider::Apple,
            provider_user_id: claims.sub,
            email: claims.email,
            email_verified,
            display_name: None,
        })
    }

    // ========================================================================
    // Config accessors
    // ========================================================================

    fn google_config(&self) -> AuthResult<&GoogleOAuthConfig> {
        self.config
            .google
            .as_ref()
            .ok_or_else(|| AuthError::OAuthNotConfigured("google".to_string()))
    }

    fn apple_config(&self) -> AuthResult<&AppleOAuthConfig> {
        self.config
            .apple
            .as_ref()
            .ok_or_else(|| AuthError::OAuthNotConfigured("apple".to_string()))
    }

    fn redirect_uri(&self, provider: OAuthProvider) -> AuthResult<String> {
        match provider {
            OAuthProvider::Google => Ok(self.google_config()?.redirect_uri.clone()),
            OAuthProvider::Apple => Ok(self.apple_config()?.redirect_uri.clone()),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Mint the ES256 client-secret JWT Apple requires for the token exchange
fn generate_apple_client_secret(config: &AppleOAuthConfig) -> AuthResult<String> {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims<'a> {
        iss: &'a str,
        sub: &'a str,
        aud: &'a str,
        iat: i64,
        exp: i64,
    }

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        iss: &config.team_id,
        sub: &config.client_id,
        aud: "https://appleid.apple.com",
        iat: now,
        exp: now + 5 * 60,
    };

    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(config.key_id.clone());

    let key = EncodingKey::from_ec_pem(config.private_key_pem.as_bytes())
        .map_err(|e| AuthError::OAuthExchange(format!("Failed to parse Apple private key: {e}")))?;

    encode(&header, &claims, &key)
        .map_err(|e| AuthError::OAuthExchange(format!("Failed to sign Apple client secret: {e}")))
}

/// Decode the payload segment of a JWT without signature verification
fn decode_jwt_claims<T: serde::de::DeserializeOwned>(token: &str) -> AuthResult<T> {
    let mut segments = token.split('.');
    let payload = segments
        .nth(1)
        .ok_or_else(|| AuthError::OAuthExchange("Malformed id_token".to_string()))?;

    let bytes = platform::crypto::from_base64url(payload)
        .map_err(|e| AuthError::OAuthExchange(format!("Malformed id_token payload: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::OAuthExchange(format!("Bad id_token claims: {e}")))
}

/// Minimal percent-encoding for query string values
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode() {
        assert_eq!(urlencode("abc-123_~.ok"), "abc-123_~.ok");
        assert_eq!(urlencode("a b"), "a%20b");
        assert_eq!(
            urlencode("https://ph.test/cb?x=1"),
            "https%3A%2F%2Fph.test%2Fcb%3Fx%3D1"
        );
        assert_eq!(urlencode("openid email"), "openid%20email");
    }

    #[test]
    fn test_decode_jwt_claims() {
        #[derive(serde::Deserialize)]
        struct Claims {
            sub: String,
        }

        // header.payload.signature with payload {"sub":"abc123"}
        let payload = platform::crypto::to_base64url(br#"{"sub":"abc123"}"#);
        let token = format!("eyJhbGciOiJub25lIn0.{}.sig", payload);

        let claims: Claims = decode_jwt_claims(&token).unwrap();
        assert_eq!(claims.sub, "abc123");
    }

    #[test]
    fn test_decode_jwt_claims_malformed() {
        let result: AuthResult<serde_json::Value> = decode_jwt_claims("only-one-segment");
        assert!(result.is_err());

        let result: AuthResult<serde_json::Value> = decode_jwt_claims("a.!!!notbase64!!!.c");
        assert!(result.is_err());
    }
}
