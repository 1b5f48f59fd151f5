//! Refresh Use Case
//!
//! Validates the refresh session and mints a fresh access token.
//! Also backs the session-status endpoint and auth middleware.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::{issue_access_token, parse_refresh_token};
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub access_token: String,
    pub public_id: String,
    pub user_role: String,
    pub session_expires_at_ms: i64,
}

/// Refresh use case
pub struct RefreshUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RefreshUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Validate the refresh token and issue a new access token
    pub async fn execute(
        &self,
        refresh_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<RefreshOutput> {
        let session = self.get_session(refresh_token, fingerprint_hash).await?;

        let access_token = issue_access_token(&session, &self.config)?;

        Ok(RefreshOutput {
            access_token,
            public_id: session.public_id.to_string(),
            user_role: session.user_role.code().to_string(),
            session_expires_at_ms: session.expires_at_ms,
        })
    }

    /// Just check if the refresh session is valid (returns bool)
    pub async fn is_valid(&self, refresh_token: &str, fingerprint_hash: &[u8]) -> bool {
        self.get_session(refresh_token, fingerprint_hash)
            .await
            .is_ok()
    }

    /// Get session and update last activity
    pub async fn get_session(
        &self,
        refresh_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<AuthSession> {
        let session_id = parse_refresh_token(refresh_token, &self.config)?;

        let session = self
            .session_repo
            .find_by_id(session_id, fingerprint_hash)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let mut session = session;
        session.touch();

        // Extend remember-me sessions based on config
        let ttl_long = chrono::Duration::from_std(self.config.session_ttl_long)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;
        session.extend_if_needed(ttl_long);

        // Update in background
        let session_clone = session.clone();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update(&session_clone).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}
