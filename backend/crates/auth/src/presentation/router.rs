//! Auth Router

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::passkeys::build_webauthn;
use crate::error::AuthResult;
use crate::infra::email::Mailer;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(
    repo: PgAuthRepository,
    mailer: Mailer,
    config: AuthConfig,
) -> AuthResult<Router> {
    let webauthn = Arc::new(build_webauthn(&config)?);

    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        webauthn,
        config: Arc::new(config),
    };

    Ok(Router::new()
        .route("/signup", post(handlers::sign_up::<PgAuthRepository>))
        .route("/signin", post(handlers::sign_in::<PgAuthRepository>))
        .route("/signout", post(handlers::sign_out::<PgAuthRepository>))
        .route("/signout/all", post(handlers::sign_out_all::<PgAuthRepository>))
        .route("/refresh", post(handlers::refresh::<PgAuthRepository>))
        .route("/status", get(handlers::session_status::<PgAuthRepository>))
        .route("/me", get(handlers::me::<PgAuthRepository>))
        .route("/magic-link", post(handlers::magic_link_request::<PgAuthRepository>))
        .route(
            "/magic-link/redeem",
            post(handlers::magic_link_redeem::<PgAuthRepository>),
        )
        .route(
            "/passkeys/register/start",
            post(handlers::passkey_register_start::<PgAuthRepository>),
        )
        .route(
            "/passkeys/register/finish",
            post(handlers::passkey_register_finish::<PgAuthRepository>),
        )
        .route("/passkeys", get(handlers::passkey_list::<PgAuthRepository>))
        .route(
            "/passkeys/{credential_id}",
            delete(handlers::passkey_delete::<PgAuthRepository>),
        )
        .route(
            "/passkeys/login/start",
            post(handlers::passkey_login_start::<PgAuthRepository>),
        )
        .route(
            "/passkeys/login/finish",
            post(handlers::passkey_login_finish::<PgAuthRepository>),
        )
        .route(
            "/oauth/{provider}/start",
            get(handlers::oauth_start::<PgAuthRepository>),
        )
        .route(
            "/oauth/{provider}/callback",
            post(handlers::oauth_callback::<PgAuthRepository>),
        )
        .with_state(state))
}
