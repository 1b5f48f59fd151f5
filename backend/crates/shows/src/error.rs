//! Shows Error Types
//!
//! Show-domain error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Shows-specific result type alias
pub type ShowsResult<T> = Result<T, ShowsError>;

/// Shows-specific error variants
#[derive(Debug, Error)]
pub enum ShowsError {
    /// Show not found
    #[error("Show not found")]
    ShowNotFound,

    /// Artist not found
    #[error("Artist not found")]
    ArtistNotFound,

    /// Venue not found
    #[error("Venue not found")]
    VenueNotFound,

    /// Venue edit not found
    #[error("Venue edit not found")]
    VenueEditNotFound,

    /// Slug already in use
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    /// Lineup validation failed
    #[error("Invalid lineup: {0}")]
    InvalidLineup(String),

    /// Invalid status transition
    #[error("Cannot move show from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Caller does not own the resource
    #[error("Not the owner of this resource")]
    NotOwner,

    /// Caller lacks the required role
    #[error("Insufficient role")]
    Forbidden,

    /// Authentication required
    #[error("Authentication required")]
    Unauthenticated,

    /// Validation error (dates, fields)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Rate limit exceeded
    #[error("Too many requests")]
    RateLimitExceeded,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShowsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShowsError::ShowNotFound
            | ShowsError::ArtistNotFound
            | ShowsError::VenueNotFound
            | ShowsError::VenueEditNotFound => StatusCode::NOT_FOUND,
            ShowsError::SlugTaken(_) => StatusCode::CONFLICT,
            ShowsError::InvalidLineup(_) | ShowsError::Validation(_) => StatusCode::BAD_REQUEST,
            ShowsError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ShowsError::NotOwner | ShowsError::Forbidden => StatusCode::FORBIDDEN,
            ShowsError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ShowsError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ShowsError::Database(_) | ShowsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShowsError::ShowNotFound
            | ShowsError::ArtistNotFound
            | ShowsError::VenueNotFound
            | ShowsError::VenueEditNotFound => ErrorKind::NotFound,
            ShowsError::SlugTaken(_) | ShowsError::InvalidTransition { .. } => ErrorKind::Conflict,
            ShowsError::InvalidLineup(_) | ShowsError::Validation(_) => ErrorKind::BadRequest,
            ShowsError::NotOwner | ShowsError::Forbidden => ErrorKind::Forbidden,
            ShowsError::Unauthenticated => ErrorKind::Unauthorized,
            ShowsError::RateLimitExceeded => ErrorKind::TooManyRequests,
            ShowsError::Database(_) | ShowsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ShowsError::Database(e) => {
                tracing::error!(error = %e, "Shows database error");
            }
            ShowsError::Internal(msg) => {
                tracing::error!(message = %msg, "Shows internal error");
            }
            ShowsError::RateLimitExceeded => {
                tracing::warn!("Show submission rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Shows error");
            }
        }
    }
}

impl IntoResponse for ShowsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<auth::AuthError> for ShowsError {
    fn from(err: auth::AuthError) -> Self {
        match err {
            auth::AuthError::AccessTokenInvalid => ShowsError::Unauthenticated,
            other => ShowsError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShowsError::ShowNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ShowsError::SlugTaken("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ShowsError::NotOwner.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ShowsError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ShowsError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = ShowsError::InvalidTransition {
            from: "rejected".to_string(),
            to: "private".to_string(),
        };
        assert!(err.to_string().contains("rejected"));
        assert!(err.to_string().contains("private"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
