//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webauthn_rs::prelude::{
    CreationChallengeResponse, PublicKeyCredential, RegisterPublicKeyCredential,
    RequestChallengeResponse,
};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub user_name: String,
    pub password: String,
    /// Optional; required later for magic-link login
    pub email: Option<String>,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub public_id: String,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// User name or email
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub public_id: String,
}

// ============================================================================
// Session Status / Refresh
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub public_id: Option<String>,
    pub user_role: Option<String>,
    pub session_expires_at_ms: Option<i64>,
}

// ============================================================================
// Magic Link
// ============================================================================

/// Magic link request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRequest {
    pub email: String,
}

/// Magic link redeem request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRedeemRequest {
    pub token: String,
}

// ============================================================================
// Passkeys
// ============================================================================

/// Passkey registration start response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyRegisterStartResponse {
    pub challenge_id: Uuid,
    /// WebAuthn creation options, passed to navigator.credentials.create
    pub options: CreationChallengeResponse,
}

/// Passkey registration finish request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyRegisterFinishRequest {
    pub challenge_id: Uuid,
    /// User-chosen label ("work laptop", "phone")
    #[serde(default = "default_passkey_label")]
    pub label: String,
    pub credential: RegisterPublicKeyCredential,
}

fn default_passkey_label() -> String {
    "passkey".to_string()
}

/// Passkey registration finish response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyRegisterFinishResponse {
    pub credential_id: String,
}

/// Passkey login start request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyLoginStartRequest {
    pub user_name: String,
}

/// Passkey login start response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyLoginStartResponse {
    pub challenge_id: Uuid,
    /// WebAuthn request options, passed to navigator.credentials.get
    pub options: RequestChallengeResponse,
}

/// Passkey login finish request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyLoginFinishRequest {
    pub challenge_id: Uuid,
    pub credential: PublicKeyCredential,
}

/// One registered passkey (for the account page)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyItem {
    pub credential_id: String,
    pub label: String,
    pub created_at: i64,
    pub last_used_at: Option<i64>,
}

/// Passkey list response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyListResponse {
    pub passkeys: Vec<PasskeyItem>,
}

// ============================================================================
// OAuth
// ============================================================================

/// OAuth start response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthStartResponse {
    pub authorize_url: String,
}

/// OAuth callback request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackRequest {
    pub code: String,
    pub state: String,
}

// ============================================================================
// Current User
// ============================================================================

/// Current user info response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub public_id: String,
    pub user_name: String,
    pub user_role: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
    pub home_city: Option<String>,
    pub last_login_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_defaults() {
        let json = r#"{"identifier":"gig_goer","password":"pw"}"#;
        let req: SignInRequest = serde_json::from_str(json).unwrap();
        assert!(!req.remember_me);
    }

    #[test]
    fn test_camel_case_serialization() {
        let resp = SessionStatusResponse {
            authenticated: true,
            public_id: Some("abc".to_string()),
            user_role: Some("user".to_string()),
            session_expires_at_ms: Some(123),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("publicId"));
        assert!(json.contains("userRole"));
        assert!(json.contains("sessionExpiresAtMs"));
    }

    #[test]
    fn test_oauth_callback_deserialization() {
        let json = r#"{"code":"authcode","state":"xyz"}"#;
        let req: OAuthCallbackRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.code, "authcode");
        assert_eq!(req.state, "xyz");
    }

    #[test]
    fn test_default_passkey_label() {
        assert_eq!(default_passkey_label(), "passkey");
    }
}
