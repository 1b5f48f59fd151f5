//! Session Issuance
//!
//! Shared tail of every login flow (password, magic link, passkey,
//! OAuth): create the server-side session row and mint both tokens.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::{issue_access_token, sign_refresh_token};
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::entity::user::User;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

pub use platform::client::ClientFingerprint;

/// Tokens handed to the presentation layer after a successful login
pub struct IssuedSession {
    pub refresh_token: String,
    pub access_token: String,
    pub public_id: String,
    pub remember_me: bool,
}

/// Creates sessions and mints tokens for authenticated users
pub struct SessionIssuer<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionIssuer<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Open a session for a user that has already been authenticated
    pub async fn open(
        &self,
        user: &User,
        remember_me: bool,
        fingerprint: &ClientFingerprint,
    ) -> AuthResult<IssuedSession> {
        let ttl = chrono::Duration::from_std(self.config.session_ttl(remember_me))
            .map_err(|e| crate::error::AuthError::Internal(format!("Invalid session TTL: {e}")))?;

        let session = AuthSession::new(
            user.user_id,
            user.public_id,
            user.user_role,
            remember_me,
            fingerprint.hash_vec(),
            fingerprint.ip_string(),
            fingerprint.user_agent.clone(),
            ttl,
        );

        self.session_repo.create(&session).await?;

        let refresh_token = sign_refresh_token(&session, &self.config);
        let access_token = issue_access_token(&session, &self.config)?;

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            remember_me = remember_me,
            "Session opened"
        );

        Ok(IssuedSession {
            refresh_token,
            access_token,
            public_id: user.public_id.to_string(),
            remember_me,
        })
    }
}
