//! Passkey Use Cases (WebAuthn)
//!
//! Registration and authentication ceremonies via webauthn-rs. The
//! state between the start and finish halves is persisted as a
//! single-use challenge row rather than held in server memory.

use std::sync::Arc;

use uuid::Uuid;
use webauthn_rs::prelude::{
    CreationChallengeResponse, Passkey, PasskeyAuthentication, PasskeyRegistration,
    PublicKeyCredential, RegisterPublicKeyCredential, RequestChallengeResponse, Url, Webauthn,
    WebauthnBuilder,
};

use crate::application::config::AuthConfig;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::entity::passkey::{CeremonyKind, PasskeyCredential, WebauthnChallenge};
use crate::domain::repository::{PasskeyRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};
use platform::client::ClientFingerprint;
use platform::crypto::to_base64url;

/// Build the webauthn-rs relying party from config
pub fn build_webauthn(config: &AuthConfig) -> AuthResult<Webauthn> {
    let origin = Url::parse(&config.rp_origin)
        .map_err(|e| AuthError::Internal(format!("Invalid RP origin: {e}")))?;

    WebauthnBuilder::new(&config.rp_id, &origin)
        .map_err(|e| AuthError::Internal(format!("Invalid RP config: {e}")))?
        .rp_name(&config.rp_name)
        .build()
        .map_err(|e| AuthError::Internal(format!("Failed to build WebAuthn: {e}")))
}

fn deserialize_passkeys(credentials: &[PasskeyCredential]) -> AuthResult<Vec<Passkey>> {
    credentials
        .iter()
        .map(|c| {
            serde_json::from_value(c.passkey_json.clone())
                .map_err(|e| AuthError::Internal(format!("Corrupt stored passkey: {e}")))
        })
        .collect()
}

// ============================================================================
// Registration (authenticated user adds a passkey)
// ============================================================================

/// Output of the registration start half
pub struct RegistrationStart {
    pub challenge_id: Uuid,
    pub creation_options: CreationChallengeResponse,
}

/// Passkey registration use case
pub struct PasskeyRegistrationUseCase<R>
where
    R: UserRepository + PasskeyRepository,
{
    repo: Arc<R>,
    webauthn: Arc<Webauthn>,
}

impl<R> PasskeyRegistrationUseCase<R>
where
    R: UserRepository + PasskeyRepository,
{
    pub fn new(repo: Arc<R>, webauthn: Arc<Webauthn>) -> Self {
        Self { repo, webauthn }
    }

    /// Start registration: produce creation options, persist ceremony state
    pub async fn start(&self, user_id: &UserId) -> AuthResult<RegistrationStart> {
        let user = UserRepository::find_by_id(self.repo.as_ref(), user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Exclude already-registered credentials so the authenticator
        // refuses to create duplicates
        let existing = self.repo.find_credentials(user_id).await?;
        let exclude = if existing.is_empty() {
            None
        } else {
            Some(
                deserialize_passkeys(&existing)?
                    .iter()
                    .map(|p| p.cred_id().clone())
                    .collect(),
            )
        };

        let (creation_options, reg_state) = self
            .webauthn
            .start_passkey_registration(
                *user.user_id.as_uuid(),
                user.user_name.as_str(),
                user.user_name.as_str(),
                exclude,
            )
            .map_err(|e| AuthError::PasskeyVerification(e.to_string()))?;

        let state_json = serde_json::to_value(&reg_state)
            .map_err(|e| AuthError::Internal(format!("Failed to serialize ceremony: {e}")))?;

        let challenge = WebauthnChallenge::new(user.user_id, CeremonyKind::Registration, state_json);
        self.repo.create_challenge(&challenge).await?;

        Ok(RegistrationStart {
            challenge_id: challenge.challenge_id,
            creation_options,
        })
    }

    /// Finish registration: verify the attestation and store the credential
    pub async fn finish(
        &self,
        user_id: &UserId,
        challenge_id: Uuid,
        label: String,
        response: RegisterPublicKeyCredential,
    ) -> AuthResult<String> {
        let challenge = self
            .repo
            .consume_challenge(challenge_id)
            .await?
            .ok_or(AuthError::PasskeyChallengeInvalid)?;

        if challenge.is_expired()
            || challenge.kind != CeremonyKind::Registration
            || challenge.user_id != *user_id
        {
            return Err(AuthError::PasskeyChallengeInvalid);
        }

        let reg_state: PasskeyRegistration = serde_json::from_value(challenge.state_json)
            .map_err(|e| AuthError::Internal(format!("Corrupt ceremony state: {e}")))?;

        let passkey = self
            .webauthn
            .finish_passkey_registration(&response, &reg_state)
            .map_err(|e| AuthError::PasskeyVerification(e.to_string()))?;

        let credential_id = to_base64url(passkey.cred_id().as_ref());
        let passkey_json = serde_json::to_value(&passkey)
            .map_err(|e| AuthError::Internal(format!("Failed to serialize passkey: {e}")))?;

        let credential =
            PasskeyCredential::new(credential_id.clone(), *user_id, label, passkey_json);
        self.repo.create_credential(&credential).await?;

        tracing::info!(user_id = %user_id, credential_id = %credential_id, "Passkey registered");

        Ok(credential_id)
    }
}

// ============================================================================
// Authentication (passkey login)
// ============================================================================

/// Output of the authentication start half
pub struct AuthenticationStart {
    pub challenge_id: Uuid,
    pub request_options: RequestChallengeResponse,
}

/// Passkey login use case
pub struct PasskeyLoginUseCase<R>
where
    R: UserRepository + PasskeyRepository + SessionRepository,
{
    repo: Arc<R>,
    webauthn: Arc<Webauthn>,
    config: Arc<AuthConfig>,
}

impl<R> PasskeyLoginUseCase<R>
where
    R: UserRepository + PasskeyRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, webauthn: Arc<Webauthn>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            webauthn,
            config,
        }
    }

    /// Start authentication for a user name
    pub async fn start(&self, user_name: &str) -> AuthResult<AuthenticationStart> {
        let user_name = UserName::new(user_name).map_err(|_| AuthError::UserNotFound)?;
        let user = self
            .repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let credentials = self.repo.find_credentials(&user.user_id).await?;
        if credentials.is_empty() {
            return Err(AuthError::NoPasskeys);
        }

        let passkeys = deserialize_passkeys(&credentials)?;

        let (request_options, auth_state) = self
            .webauthn
            .start_passkey_authentication(&passkeys)
            .map_err(|e| AuthError::PasskeyVerification(e.to_string()))?;

        let state_json = serde_json::to_value(&auth_state)
            .map_err(|e| AuthError::Internal(format!("Failed to serialize ceremony: {e}")))?;

        let challenge =
            WebauthnChallenge::new(user.user_id, CeremonyKind::Authentication, state_json);
        self.repo.create_challenge(&challenge).await?;

        Ok(AuthenticationStart {
            challenge_id: challenge.challenge_id,
            request_options,
        })
    }

    /// Finish authentication: verify the assertion and open a session
    pub async fn finish(
        &self,
        challenge_id: Uuid,
        response: PublicKeyCredential,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<IssuedSession> {
        let challenge = self
            .repo
            .consume_challenge(challenge_id)
            .await?
            .ok_or(AuthError::PasskeyChallengeInvalid)?;

        if challenge.is_expired() || challenge.kind != CeremonyKind::Authentication {
            return Err(AuthError::PasskeyChallengeInvalid);
        }

        let auth_state: PasskeyAuthentication = serde_json::from_value(challenge.state_json)
            .map_err(|e| AuthError::Internal(format!("Corrupt ceremony state: {e}")))?;

        let result = self
            .webauthn
            .finish_passkey_authentication(&response, &auth_state)
            .map_err(|e| AuthError::PasskeyVerification(e.to_string()))?;

        // Persist the updated signature counter
        let credential_id = to_base64url(result.cred_id().as_ref());
        let credentials = self.repo.find_credentials(&challenge.user_id).await?;
        let mut credential = credentials
            .into_iter()
            .find(|c| c.credential_id == credential_id)
            .ok_or(AuthError::PasskeyVerification("Unknown credential".to_string()))?;

        let mut passkey: Passkey = serde_json::from_value(credential.passkey_json.clone())
            .map_err(|e| AuthError::Internal(format!("Corrupt stored passkey: {e}")))?;
        passkey.update_credential(&result);

        let passkey_json = serde_json::to_value(&passkey)
            .map_err(|e| AuthError::Internal(format!("Failed to serialize passkey: {e}")))?;
        credential.record_use(passkey_json);
        self.repo.update_credential(&credential).await?;

        let user = UserRepository::find_by_id(self.repo.as_ref(), &challenge.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let mut user = user;
        user.record_login();
        UserRepository::update(self.repo.as_ref(), &user).await?;

        tracing::info!(public_id = %user.public_id, "Passkey login");

        let issuer = SessionIssuer::new(self.repo.clone(), self.config.clone());
        issuer.open(&user, true, &fingerprint).await
    }
}
