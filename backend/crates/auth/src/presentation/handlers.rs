//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;
use webauthn_rs::prelude::Webauthn;

use platform::client::{ClientFingerprint, extract_client_ip, extract_fingerprint};
use platform::cookie::CookieConfig;

use crate::application::config::AuthConfig;
use crate::application::session::IssuedSession;
use crate::application::tokens::{AccessClaims, verify_access_token};
use crate::application::{
    OAuthUseCase, PasskeyLoginUseCase, PasskeyRegistrationUseCase, RedeemMagicLinkUseCase,
    RefreshUseCase, RequestMagicLinkUseCase, SignInInput, SignInUseCase, SignOutUseCase,
    SignUpInput, SignUpUseCase,
};
use crate::domain::entity::oauth_identity::OAuthProvider;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthRepo, PasskeyRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::infra::email::Mailer;
use crate::presentation::dto::{
    MagicLinkRedeemRequest, MagicLinkRequest, OAuthCallbackRequest, OAuthStartResponse,
    PasskeyItem, PasskeyListResponse, PasskeyLoginFinishRequest, PasskeyLoginStartRequest,
    PasskeyLoginStartResponse, PasskeyRegisterFinishRequest, PasskeyRegisterFinishResponse,
    PasskeyRegisterStartResponse, SessionStatusResponse, SignInRequest, SignInResponse,
    SignUpRequest, SignUpResponse, UserInfoResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthRepo,
{
    pub repo: Arc<R>,
    pub mailer: Arc<Mailer>,
    pub webauthn: Arc<Webauthn>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        user_name: req.user_name,
        password: req.password,
        email: req.email,
    };

    let output = use_case.execute(input, &fingerprint).await?;

    Ok(Json(SignUpResponse {
        public_id: output.public_id,
    }))
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignInInput {
        identifier: req.identifier,
        password: req.password,
        remember_me: req.remember_me,
    };

    let issued = use_case.execute(input, fingerprint).await?;

    Ok(login_response(&state.config, issued))
}

/// POST /api/auth/signout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepo,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name);

    if let Some(token) = token {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // Ignore errors - just clear the cookies
        let _ = use_case.execute(&token).await;
    }

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (header::SET_COOKIE, access_cookie(&state.config).build_delete_cookie()),
            (header::SET_COOKIE, refresh_cookie(&state.config).build_delete_cookie()),
        ]),
    ))
}

/// POST /api/auth/signout/all
pub async fn sign_out_all<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AuthResult<StatusCode>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute_all(&token, &fingerprint.hash).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Refresh / Session Status
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(&token, &fingerprint.hash).await?;

    let access = access_cookie(&state.config).build_set_cookie(&output.access_token);

    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, access)]),
        Json(SessionStatusResponse {
            authenticated: true,
            public_id: Some(output.public_id),
            user_role: Some(output.user_role),
            session_expires_at_ms: Some(output.session_expires_at_ms),
        }),
    ))
}

/// GET /api/auth/status
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name);

    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());

    let session = if let Some(token) = token {
        use_case.get_session(&token, &fingerprint.hash).await.ok()
    } else {
        None
    };

    match session {
        Some(session) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            public_id: Some(session.public_id.to_string()),
            user_role: Some(session.user_role.code().to_string()),
            session_expires_at_ms: Some(session.expires_at_ms),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            public_id: None,
            user_role: None,
            session_expires_at_ms: None,
        })),
    }
}

// ============================================================================
// Magic Link
// ============================================================================

/// POST /api/auth/magic-link
pub async fn magic_link_request<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<MagicLinkRequest>,
) -> AuthResult<StatusCode>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let use_case = RequestMagicLinkUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email, &fingerprint).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/magic-link/redeem
pub async fn magic_link_redeem<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<MagicLinkRedeemRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let use_case = RedeemMagicLinkUseCase::new(state.repo.clone(), state.config.clone());
    let issued = use_case.execute(&req.token, fingerprint).await?;

    Ok(login_response(&state.config, issued))
}

// ============================================================================
// Passkeys
// ============================================================================

/// POST /api/auth/passkeys/register/start (authenticated)
pub async fn passkey_register_start<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<PasskeyRegisterStartResponse>>
where
    R: AuthRepo,
{
    let user = require_user(&state, &headers).await?;

    let use_case = PasskeyRegistrationUseCase::new(state.repo.clone(), state.webauthn.clone());
    let start = use_case.start(&user.user_id).await?;

    Ok(Json(PasskeyRegisterStartResponse {
        challenge_id: start.challenge_id,
        options: start.creation_options,
    }))
}

/// POST /api/auth/passkeys/register/finish (authenticated)
pub async fn passkey_register_finish<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<PasskeyRegisterFinishRequest>,
) -> AuthResult<Json<PasskeyRegisterFinishResponse>>
where
    R: AuthRepo,
{
    let user = require_user(&state, &headers).await?;

    let use_case = PasskeyRegistrationUseCase::new(state.repo.clone(), state.webauthn.clone());
    let credential_id = use_case
        .finish(&user.user_id, req.challenge_id, req.label, req.credential)
        .await?;

    Ok(Json(PasskeyRegisterFinishResponse { credential_id }))
}

/// GET /api/auth/passkeys (authenticated)
pub async fn passkey_list<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<PasskeyListResponse>>
where
    R: AuthRepo,
{
    let user = require_user(&state, &headers).await?;

    let credentials = state.repo.find_credentials(&user.user_id).await?;

    let passkeys = credentials
        .into_iter()
        .map(|c| PasskeyItem {
            credential_id: c.credential_id,
            label: c.label,
            created_at: c.created_at.timestamp_millis(),
            last_used_at: c.last_used_at.map(|t| t.timestamp_millis()),
        })
        .collect();

    Ok(Json(PasskeyListResponse { passkeys }))
}

/// DELETE /api/auth/passkeys/{credential_id} (authenticated)
pub async fn passkey_delete<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Path(credential_id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: AuthRepo,
{
    let user = require_user(&state, &headers).await?;

    let deleted = state
        .repo
        .delete_credential(&user.user_id, &credential_id)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AuthError::PasskeyNotFound)
    }
}

/// POST /api/auth/passkeys/login/start
pub async fn passkey_login_start<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<PasskeyLoginStartRequest>,
) -> AuthResult<Json<PasskeyLoginStartResponse>>
where
    R: AuthRepo,
{
    let use_case = PasskeyLoginUseCase::new(
        state.repo.clone(),
        state.webauthn.clone(),
        state.config.clone(),
    );
    let start = use_case.start(&req.user_name).await?;

    Ok(Json(PasskeyLoginStartResponse {
        challenge_id: start.challenge_id,
        options: start.request_options,
    }))
}

/// POST /api/auth/passkeys/login/finish
pub async fn passkey_login_finish<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<PasskeyLoginFinishRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let use_case = PasskeyLoginUseCase::new(
        state.repo.clone(),
        state.webauthn.clone(),
        state.config.clone(),
    );
    let issued = use_case
        .finish(req.challenge_id, req.credential, fingerprint)
        .await?;

    Ok(login_response(&state.config, issued))
}

// ============================================================================
// OAuth
// ============================================================================

/// GET /api/auth/oauth/{provider}/start
pub async fn oauth_start<R>(
    State(state): State<AuthAppState<R>>,
    Path(provider): Path<String>,
) -> AuthResult<Json<OAuthStartResponse>>
where
    R: AuthRepo,
{
    let provider = OAuthProvider::from_code(&provider)
        .ok_or_else(|| AuthError::OAuthNotConfigured(provider))?;

    let use_case = OAuthUseCase::new(state.repo.clone(), state.config.clone());
    let authorize_url = use_case.start(provider).await?;

    Ok(Json(OAuthStartResponse { authorize_url }))
}

/// POST /api/auth/oauth/{provider}/callback
pub async fn oauth_callback<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(provider): Path<String>,
    Json(req): Json<OAuthCallbackRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthRepo,
{
    let fingerprint = fingerprint_from(&headers, addr)?;

    let provider = OAuthProvider::from_code(&provider)
        .ok_or_else(|| AuthError::OAuthNotConfigured(provider))?;

    let use_case = OAuthUseCase::new(state.repo.clone(), state.config.clone());
    let issued = use_case
        .callback(provider, &req.code, &req.state, fingerprint)
        .await?;

    Ok(login_response(&state.config, issued))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me (authenticated)
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<UserInfoResponse>>
where
    R: AuthRepo,
{
    let user = require_user(&state, &headers).await?;
    let profile = state.repo.find_profile(&user.user_id).await?;

    let (email, email_verified, display_name, home_city) = match profile {
        Some(p) => (
            p.email.map(|e| e.as_str().to_string()),
            p.email_verified,
            p.display_name,
            p.home_city,
        ),
        None => (None, false, None, None),
    };

    Ok(Json(UserInfoResponse {
        public_id: user.public_id.to_string(),
        user_name: user.user_name.original().to_string(),
        user_role: user.user_role.code().to_string(),
        email,
        email_verified,
        display_name,
        home_city,
        last_login_at: user.last_login_at.map(|t| t.timestamp_millis()),
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn fingerprint_from(
    headers: &HeaderMap,
    addr: std::net::SocketAddr,
) -> AuthResult<ClientFingerprint> {
    let client_ip = extract_client_ip(headers, Some(addr.ip()));
    Ok(extract_fingerprint(headers, client_ip)?)
}

/// Extract and verify the access token from Bearer header or cookie
pub fn extract_claims(headers: &HeaderMap, config: &AuthConfig) -> AuthResult<AccessClaims> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer
        .or_else(|| platform::cookie::extract_cookie(headers, &config.access_cookie_name))
        .ok_or(AuthError::AccessTokenInvalid)?;

    verify_access_token(&token, config)
}

/// Resolve the authenticated user from the access token
async fn require_user<R>(state: &AuthAppState<R>, headers: &HeaderMap) -> AuthResult<User>
where
    R: AuthRepo,
{
    let claims = extract_claims(headers, &state.config)?;
    let public_id = claims
        .sub
        .parse()
        .map_err(|_| AuthError::AccessTokenInvalid)?;

    UserRepository::find_by_public_id(state.repo.as_ref(), &public_id)
        .await?
        .ok_or(AuthError::UserNotFound)
}

fn access_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.access_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.access_ttl_secs()),
    }
}

fn refresh_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.refresh_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: None,
    }
}

/// Build the standard login response: both cookies + public id body
fn login_response(config: &AuthConfig, issued: IssuedSession) -> axum::response::Response {
    // リフレッシュクッキーの Max-Age はログイン時に選んだ TTL に合わせる
    let refresh_max_age = if issued.remember_me {
        config.session_ttl_long.as_secs() as i64
    } else {
        config.session_ttl_short.as_secs() as i64
    };

    let access = access_cookie(config).build_set_cookie(&issued.access_token);
    let refresh =
        refresh_cookie(config).build_set_cookie_with_max_age(&issued.refresh_token, refresh_max_age);

    (
        StatusCode::OK,
        AppendHeaders([
            (header::SET_COOKIE, access),
            (header::SET_COOKIE, refresh),
        ]),
        Json(SignInResponse {
            public_id: issued.public_id,
        }),
    )
        .into_response()
}
