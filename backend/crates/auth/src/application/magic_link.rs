//! Magic Link Use Cases
//!
//! Request: email a one-time login link. Redeem: consume the token and
//! open a session. The request endpoint never reveals whether an email
//! is registered.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::entity::login_token::LoginToken;
use crate::domain::repository::{
    LoginTokenRepository, RateLimitRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};
use platform::client::ClientFingerprint;

/// Outbound port for email delivery
///
/// Implementations live in the infrastructure layer (SMTP via lettre,
/// console for development).
#[trait_variant::make(EmailSender: Send)]
pub trait LocalEmailSender {
    /// Send a magic login link
    async fn send_magic_link(
        &self,
        to: &Email,
        link: &str,
        expires_in_minutes: i64,
    ) -> AuthResult<()>;
}

// ============================================================================
// Request
// ============================================================================

/// Request magic link use case
pub struct RequestMagicLinkUseCase<R, E>
where
    R: UserRepository + LoginTokenRepository + RateLimitRepository,
    E: EmailSender,
{
    repo: Arc<R>,
    mailer: Arc<E>,
    config: Arc<AuthConfig>,
}

impl<R, E> RequestMagicLinkUseCase<R, E>
where
    R: UserRepository + LoginTokenRepository + RateLimitRepository,
    E: EmailSender,
{
    pub fn new(repo: Arc<R>, mailer: Arc<E>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    /// Always succeeds from the caller's point of view (no account probing).
    pub async fn execute(&self, email: &str, fingerprint: &ClientFingerprint) -> AuthResult<()> {
        let rate_key = format!("magiclink:{}", fingerprint.rate_key());
        if !self
            .repo
            .check_rate(&rate_key, &self.config.magic_link_rate)
            .await?
        {
            return Err(AuthError::RateLimitExceeded);
        }

        let email = match Email::new(email) {
            Ok(email) => email,
            Err(_) => {
                // Malformed address: same response as unknown address
                tracing::debug!("Magic link requested for malformed email");
                return Ok(());
            }
        };

        let Some(user) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("Magic link requested for unknown email");
            return Ok(());
        };

        if !user.can_login() {
            tracing::debug!(public_id = %user.public_id, "Magic link requested for disabled account");
            return Ok(());
        }

        let ttl = chrono::Duration::from_std(self.config.magic_link_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid magic link TTL: {e}")))?;
        let (token, clear) = LoginToken::issue(user.user_id, ttl);

        LoginTokenRepository::create(self.repo.as_ref(), &token).await?;

        let link = format!("{}?token={}", self.config.magic_link_base_url, clear);
        let expires_in_minutes = ttl.num_minutes();

        self.mailer
            .send_magic_link(&email, &link, expires_in_minutes)
            .await?;

        tracing::info!(public_id = %user.public_id, "Magic link sent");
        Ok(())
    }
}

// ============================================================================
// Redeem
// ============================================================================

/// Redeem magic link use case
pub struct RedeemMagicLinkUseCase<R>
where
    R: UserRepository + LoginTokenRepository + SessionRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RedeemMagicLinkUseCase<R>
where
    R: UserRepository + LoginTokenRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        clear_token: &str,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<IssuedSession> {
        let token_hash = LoginToken::hash_of(clear_token);

        let token = self
            .repo
            .consume(&token_hash)
            .await?
            .ok_or(AuthError::LoginTokenInvalid)?;

        if token.is_expired() {
            return Err(AuthError::LoginTokenExpired);
        }

        let user = UserRepository::find_by_id(self.repo.as_ref(), &token.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        // A redeemed link proves control of the mailbox
        if let Some(mut profile) = self.repo.find_profile(&user.user_id).await? {
            if !profile.email_verified {
                profile.mark_email_verified();
                self.repo.update_profile(&profile).await?;
            }
        }

        // Invalidate any other outstanding links
        self.repo.delete_for_user(&user.user_id).await?;

        let mut user = user;
        user.record_login();
        UserRepository::update(self.repo.as_ref(), &user).await?;

        tracing::info!(public_id = %user.public_id, "Magic link redeemed");

        let issuer = SessionIssuer::new(self.repo.clone(), self.config.clone());
        issuer.open(&user, false, &fingerprint).await
    }
}
