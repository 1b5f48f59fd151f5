//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    auth_session::AuthSession,
    credentials::Credentials,
    login_token::LoginToken,
    oauth_identity::{OAuthIdentity, OAuthProvider, OAuthState},
    passkey::{PasskeyCredential, WebauthnChallenge},
    user::User,
    user_profile::UserProfile,
};
use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_id::UserId, user_name::UserName,
};
use crate::error::AuthResult;
use platform::rate_limit::RateLimitConfig;
use uuid::Uuid;

/// User repository trait (users + profiles)
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user together with an empty profile
    async fn create(&self, user: &User, profile: &UserProfile) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by public ID
    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>>;

    /// Find user by user name (canonical match)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Find user by profile email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Find profile by user ID
    async fn find_profile(&self, user_id: &UserId) -> AuthResult<Option<UserProfile>>;

    /// Update profile
    async fn update_profile(&self, profile: &UserProfile) -> AuthResult<()>;
}

/// Credentials repository trait
#[trait_variant::make(CredentialsRepository: Send)]
pub trait LocalCredentialsRepository {
    /// Create credentials
    async fn create(&self, credentials: &Credentials) -> AuthResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>>;

    /// Update credentials
    async fn update(&self, credentials: &Credentials) -> AuthResult<()>;
}

/// Auth session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find session by ID and verify fingerprint
    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>>;

    /// Find all live sessions for a user
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<AuthSession>>;

    /// Update session (e.g., last activity)
    async fn update(&self, session: &AuthSession) -> AuthResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete all sessions for a user (except current)
    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Magic link token repository trait
#[trait_variant::make(LoginTokenRepository: Send)]
pub trait LocalLoginTokenRepository {
    /// Persist a freshly issued token
    async fn create(&self, token: &LoginToken) -> AuthResult<()>;

    /// Atomically consume a token by its hash
    ///
    /// Returns `None` for unknown hashes; expired tokens are reported
    /// via `AuthError::LoginTokenExpired`.
    async fn consume(&self, token_hash: &[u8]) -> AuthResult<Option<LoginToken>>;

    /// Invalidate outstanding tokens for a user (on successful redeem)
    async fn delete_for_user(&self, user_id: &UserId) -> AuthResult<u64>;
}

/// Passkey repository trait (credentials + ceremony state)
#[trait_variant::make(PasskeyRepository: Send)]
pub trait LocalPasskeyRepository {
    /// Store a registered credential
    async fn create_credential(&self, credential: &PasskeyCredential) -> AuthResult<()>;

    /// List credentials for a user
    async fn find_credentials(&self, user_id: &UserId) -> AuthResult<Vec<PasskeyCredential>>;

    /// Update a credential (counter / state after use)
    async fn update_credential(&self, credential: &PasskeyCredential) -> AuthResult<()>;

    /// Delete a credential owned by the user
    async fn delete_credential(&self, user_id: &UserId, credential_id: &str) -> AuthResult<bool>;

    /// Persist ceremony state
    async fn create_challenge(&self, challenge: &WebauthnChallenge) -> AuthResult<()>;

    /// Atomically consume ceremony state
    async fn consume_challenge(&self, challenge_id: Uuid) -> AuthResult<Option<WebauthnChallenge>>;
}

/// OAuth repository trait (identities + state)
#[trait_variant::make(OAuthRepository: Send)]
pub trait LocalOAuthRepository {
    /// Link a provider identity to a user
    async fn create_identity(&self, identity: &OAuthIdentity) -> AuthResult<()>;

    /// Find the linked user for a provider identity
    async fn find_identity(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> AuthResult<Option<OAuthIdentity>>;

    /// Persist flow state
    async fn create_state(&self, state: &OAuthState) -> AuthResult<()>;

    /// Atomically consume flow state
    async fn consume_state(&self, state: &str) -> AuthResult<Option<OAuthState>>;
}

/// Rate limit repository trait
#[trait_variant::make(RateLimitRepository: Send)]
pub trait LocalRateLimitRepository {
    /// Check and increment the counter for a scope key
    ///
    /// Returns whether the request is allowed.
    async fn check_rate(&self, key: &str, config: &RateLimitConfig) -> AuthResult<bool>;
}

/// Everything the auth presentation layer needs from one store
///
/// Blanket-implemented; spares the handlers from repeating the full
/// bound list.
pub trait AuthRepo:
    UserRepository
    + CredentialsRepository
    + SessionRepository
    + LoginTokenRepository
    + PasskeyRepository
    + OAuthRepository
    + RateLimitRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthRepo for T where
    T: UserRepository
        + CredentialsRepository
        + SessionRepository
        + LoginTokenRepository
        + PasskeyRepository
        + OAuthRepository
        + RateLimitRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
