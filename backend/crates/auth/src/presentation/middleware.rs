//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.
//! Access tokens are validated locally (JWT), no database access.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::handlers::extract_claims;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid access token
///
/// On success the verified claims are inserted into request extensions
/// for downstream handlers.
pub async fn require_auth(
    state: AuthMiddlewareState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    match extract_claims(req.headers(), &state.config) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(_) => Err((
            StatusCode::UNAUTHORIZED,
            [("X-Auth-Required", "true")],
        )
            .into_response()),
    }
}

/// Middleware that requires a moderator or admin access token
pub async fn require_staff(
    state: AuthMiddlewareState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let claims = match extract_claims(req.headers(), &state.config) {
        Ok(claims) => claims,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                [("X-Auth-Required", "true")],
            )
                .into_response());
        }
    };

    if claims.user_role() < UserRole::Moderator {
        return Err(StatusCode::FORBIDDEN.into_response());
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
