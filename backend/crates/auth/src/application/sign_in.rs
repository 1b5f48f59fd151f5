//! Sign In Use Case
//!
//! Authenticates a user with password and opens a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::repository::{
    CredentialsRepository, RateLimitRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};
use platform::client::ClientFingerprint;

/// Sign in input
pub struct SignInInput {
    /// User name or email
    pub identifier: String,
    /// Password
    pub password: String,
    /// Remember me flag
    pub remember_me: bool,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + CredentialsRepository + SessionRepository + RateLimitRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + CredentialsRepository + SessionRepository + RateLimitRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<IssuedSession> {
        let rate_key = format!("signin:{}", fingerprint.rate_key());
        if !self
            .repo
            .check_rate(&rate_key, &self.config.sign_in_rate)
            .await?
        {
            return Err(AuthError::RateLimitExceeded);
        }

        // An email identifier contains '@'; anything else is a user name
        let user = if input.identifier.contains('@') {
            let email =
                Email::new(&input.identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.repo.find_by_email(&email).await?
        } else {
            let user_name =
                UserName::new(&input.identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.repo.find_by_user_name(&user_name).await?
        };

        let user = user.ok_or(AuthError::InvalidCredentials)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let mut credentials = CredentialsRepository::find_by_user_id(
            self.repo.as_ref(),
            &user.user_id,
        )
        .await?
        .ok_or(AuthError::Internal("Credentials not found".to_string()))?;

        if credentials.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        let password_hash = credentials
            .password_hash
            .clone()
            .ok_or(AuthError::PasswordNotSet)?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !password_hash.verify(&raw_password, self.config.pepper()) {
            credentials.record_failure();
            CredentialsRepository::update(self.repo.as_ref(), &credentials).await?;
            return Err(AuthError::InvalidCredentials);
        }

        // Reset failure count and update last login
        credentials.reset_failures();
        CredentialsRepository::update(self.repo.as_ref(), &credentials).await?;

        let mut user = user;
        user.record_login();
        UserRepository::update(self.repo.as_ref(), &user).await?;

        let issuer = SessionIssuer::new(self.repo.clone(), self.config.clone());
        issuer.open(&user, input.remember_me, &fingerprint).await
    }
}
