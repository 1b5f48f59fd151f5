//! Sign Up Use Case
//!
//! Creates a new user account with password credentials.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credentials::Credentials, user::User, user_profile::UserProfile};
use crate::domain::repository::{CredentialsRepository, RateLimitRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};
use platform::client::ClientFingerprint;

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub password: String,
    /// Optional email; required for magic-link login later
    pub email: Option<String>,
}

/// Sign up output
pub struct SignUpOutput {
    pub public_id: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository + CredentialsRepository + RateLimitRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository + CredentialsRepository + RateLimitRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        input: SignUpInput,
        fingerprint: &ClientFingerprint,
    ) -> AuthResult<SignUpOutput> {
        let rate_key = format!("signup:{}", fingerprint.rate_key());
        if !self
            .repo
            .check_rate(&rate_key, &self.config.sign_up_rate)
            .await?
        {
            return Err(AuthError::RateLimitExceeded);
        }

        // Validate user name
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Internal(e.to_string()))?;

        if self.repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        // Validate email when provided
        let email = input
            .email
            .as_deref()
            .map(Email::new)
            .transpose()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if let Some(email) = &email {
            if self.repo.exists_by_email(email).await? {
                return Err(AuthError::EmailTaken);
            }
        }

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        // Breach check is advisory: an unreachable HIBP API must not block signup
        match raw_password.check_breach().await {
            Ok(true) => {
                return Err(AuthError::PasswordValidation(
                    "This password has appeared in a data breach".to_string(),
                ));
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "HIBP breach check failed, continuing");
            }
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Create user + profile + credentials
        let user = User::new(user_name);
        let mut profile = UserProfile::new(user.user_id);
        if let Some(email) = email {
            profile.set_email(email);
        }
        let credentials = Credentials::with_password(user.user_id, password_hash);

        UserRepository::create(self.repo.as_ref(), &user, &profile).await?;
        CredentialsRepository::create(self.repo.as_ref(), &credentials).await?;

        tracing::info!(
            public_id = %user.public_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(SignUpOutput {
            public_id: user.public_id.to_string(),
        })
    }
}
