//! Passkey Entities (WebAuthn)
//!
//! Stored passkey credentials plus the short-lived ceremony state
//! persisted between the start and finish halves of a WebAuthn flow.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::user_id::UserId;

/// A registered passkey credential
///
/// The `passkey` field is the serialized `webauthn_rs::prelude::Passkey`,
/// stored as JSON; the credential id is duplicated as the row key.
#[derive(Debug, Clone)]
pub struct PasskeyCredential {
    /// Credential ID (base64url, as reported by the authenticator)
    pub credential_id: String,
    /// Owning user
    pub user_id: UserId,
    /// User-chosen label ("work laptop", "phone")
    pub label: String,
    /// Serialized webauthn-rs Passkey (JSON)
    pub passkey_json: serde_json::Value,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful authentication
    pub last_used_at: Option<DateTime<Utc>>,
}

impl PasskeyCredential {
    pub fn new(
        credential_id: String,
        user_id: UserId,
        label: String,
        passkey_json: serde_json::Value,
    ) -> Self {
        Self {
            credential_id,
            user_id,
            label,
            passkey_json,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    /// Record a successful authentication with an updated credential state
    pub fn record_use(&mut self, passkey_json: serde_json::Value) {
        self.passkey_json = passkey_json;
        self.last_used_at = Some(Utc::now());
    }
}

/// Which half-open ceremony a challenge row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum CeremonyKind {
    Registration = 0,
    Authentication = 1,
}

impl CeremonyKind {
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(CeremonyKind::Registration),
            1 => Some(CeremonyKind::Authentication),
            _ => None,
        }
    }
}

/// Persisted WebAuthn ceremony state, consumed exactly once
#[derive(Debug, Clone)]
pub struct WebauthnChallenge {
    /// Challenge ID handed to the client
    pub challenge_id: Uuid,
    /// User (known for registration; resolved at start for authentication)
    pub user_id: UserId,
    /// Registration or authentication
    pub kind: CeremonyKind,
    /// Serialized PasskeyRegistration / PasskeyAuthentication state (JSON)
    pub state_json: serde_json::Value,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl WebauthnChallenge {
    /// Ceremony state TTL
    pub const TTL_MINUTES: i64 = 5;

    pub fn new(user_id: UserId, kind: CeremonyKind, state_json: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            challenge_id: Uuid::new_v4(),
            user_id,
            kind,
            state_json,
            expires_at_ms: (now + Duration::minutes(Self::TTL_MINUTES)).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceremony_kind_roundtrip() {
        assert_eq!(
            CeremonyKind::from_id(CeremonyKind::Registration.id()),
            Some(CeremonyKind::Registration)
        );
        assert_eq!(
            CeremonyKind::from_id(CeremonyKind::Authentication.id()),
            Some(CeremonyKind::Authentication)
        );
        assert_eq!(CeremonyKind::from_id(7), None);
    }

    #[test]
    fn test_challenge_expiry_window() {
        let challenge = WebauthnChallenge::new(
            UserId::new(),
            CeremonyKind::Registration,
            serde_json::json!({}),
        );
        assert!(!challenge.is_expired());

        let remaining = challenge.expires_at_ms - Utc::now().timestamp_millis();
        assert!(remaining <= WebauthnChallenge::TTL_MINUTES * 60_000);
        assert!(remaining > (WebauthnChallenge::TTL_MINUTES - 1) * 60_000);
    }

    #[test]
    fn test_record_use_updates_state() {
        let mut cred = PasskeyCredential::new(
            "credid".to_string(),
            UserId::new(),
            "phone".to_string(),
            serde_json::json!({"counter": 1}),
        );
        assert!(cred.last_used_at.is_none());

        cred.record_use(serde_json::json!({"counter": 2}));
        assert!(cred.last_used_at.is_some());
        assert_eq!(cred.passkey_json["counter"], 2);
    }
}
