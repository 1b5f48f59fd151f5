//! Sign Out Use Case
//!
//! Invalidates refresh sessions.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::parse_refresh_token;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Sign out from current session
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        let session_id = parse_refresh_token(refresh_token, &self.config)?;
        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }

    /// Sign out from all sessions (except current)
    pub async fn execute_all(
        &self,
        refresh_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<u64> {
        let session_id = parse_refresh_token(refresh_token, &self.config)?;

        // Get current session to find user_id
        let session = self
            .session_repo
            .find_by_id(session_id, fingerprint_hash)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let deleted = self
            .session_repo
            .delete_all_for_user(&session.user_id, Some(session_id))
            .await?;

        tracing::info!(
            user_id = %session.user_id,
            deleted = deleted,
            "User signed out from all other sessions"
        );

        Ok(deleted)
    }
}
