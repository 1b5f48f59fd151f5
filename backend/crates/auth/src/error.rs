//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// User name already exists
    #[error("User name already exists")]
    UserNameTaken,

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Invalid credentials (wrong password, unknown identifier)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account has no password (magic link / passkey / OAuth account)
    #[error("Password login is not enabled for this account")]
    PasswordNotSet,

    /// Account is locked (too many failed attempts)
    #[error("Account is temporarily locked")]
    AccountLocked,

    /// Account is disabled
    #[error("Account is disabled")]
    AccountDisabled,

    /// Session not found or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Session fingerprint mismatch
    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    /// Access token invalid or expired
    #[error("Access token invalid or expired")]
    AccessTokenInvalid,

    /// Magic link token expired
    #[error("Login link has expired")]
    LoginTokenExpired,

    /// Magic link token not found (already used or never issued)
    #[error("Login link is invalid")]
    LoginTokenInvalid,

    /// Passkey challenge invalid or expired
    #[error("Passkey challenge invalid or expired")]
    PasskeyChallengeInvalid,

    /// Passkey ceremony failed verification
    #[error("Passkey verification failed: {0}")]
    PasskeyVerification(String),

    /// No passkeys registered for the user
    #[error("No passkeys registered for this account")]
    NoPasskeys,

    /// Passkey credential not found
    #[error("Passkey not found")]
    PasskeyNotFound,

    /// OAuth provider not configured
    #[error("OAuth provider not configured: {0}")]
    OAuthNotConfigured(String),

    /// OAuth state invalid or expired
    #[error("OAuth state invalid or expired")]
    OAuthStateInvalid,

    /// OAuth exchange with the provider failed
    #[error("OAuth exchange failed: {0}")]
    OAuthExchange(String),

    /// Rate limit exceeded
    #[error("Too many requests")]
    RateLimitExceeded,

    /// Missing required header
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Password validation error
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Email delivery error
    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::UserNameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::PasswordNotSet => StatusCode::PRECONDITION_FAILED,
            AuthError::AccountLocked => StatusCode::LOCKED,
            AuthError::AccountDisabled => StatusCode::FORBIDDEN,
            AuthError::SessionInvalid
            | AuthError::SessionFingerprintMismatch
            | AuthError::AccessTokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::LoginTokenExpired => StatusCode::GONE,
            AuthError::LoginTokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::PasskeyChallengeInvalid => StatusCode::GONE,
            AuthError::PasskeyVerification(_) => StatusCode::UNAUTHORIZED,
            AuthError::NoPasskeys => StatusCode::PRECONDITION_FAILED,
            AuthError::PasskeyNotFound => StatusCode::NOT_FOUND,
            AuthError::OAuthNotConfigured(_) => StatusCode::NOT_IMPLEMENTED,
            AuthError::OAuthStateInvalid => StatusCode::UNAUTHORIZED,
            AuthError::OAuthExchange(_) => StatusCode::BAD_GATEWAY,
            AuthError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AuthError::MissingHeader(_) | AuthError::PasswordValidation(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::EmailDelivery(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound | AuthError::PasskeyNotFound => ErrorKind::NotFound,
            AuthError::UserNameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::SessionInvalid
            | AuthError::SessionFingerprintMismatch
            | AuthError::AccessTokenInvalid
            | AuthError::LoginTokenInvalid
            | AuthError::OAuthStateInvalid
            | AuthError::PasskeyVerification(_) => ErrorKind::Unauthorized,
            AuthError::AccountLocked | AuthError::AccountDisabled => ErrorKind::Forbidden,
            AuthError::LoginTokenExpired | AuthError::PasskeyChallengeInvalid => ErrorKind::Gone,
            AuthError::PasswordNotSet | AuthError::NoPasskeys => ErrorKind::UnprocessableEntity,
            AuthError::RateLimitExceeded => ErrorKind::TooManyRequests,
            AuthError::MissingHeader(_) | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::OAuthNotConfigured(_) | AuthError::OAuthExchange(_) => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::EmailDelivery(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::EmailDelivery(msg) => {
                tracing::error!(message = %msg, "Email delivery error");
            }
            AuthError::OAuthExchange(msg) => {
                tracing::error!(message = %msg, "OAuth exchange error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            AuthError::RateLimitExceeded => {
                tracing::warn!("Auth rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::client::FingerprintError> for AuthError {
    fn from(err: platform::client::FingerprintError) -> Self {
        match err {
            platform::client::FingerprintError::MissingHeader(header) => {
                AuthError::MissingHeader(header)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::UserNameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::LoginTokenExpired.status_code(), StatusCode::GONE);
        assert_eq!(
            AuthError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::OAuthNotConfigured("apple".into()).status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AuthError::SessionInvalid.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::AccountDisabled.kind(), ErrorKind::Forbidden);
        assert_eq!(
            AuthError::PasskeyChallengeInvalid.kind(),
            ErrorKind::Gone
        );
        assert_eq!(
            AuthError::RateLimitExceeded.kind(),
            ErrorKind::TooManyRequests
        );
    }
}
