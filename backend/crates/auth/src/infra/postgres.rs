//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use nid::Nanoid;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    credentials::Credentials,
    login_token::LoginToken,
    oauth_identity::{OAuthIdentity, OAuthProvider, OAuthState},
    passkey::{CeremonyKind, PasskeyCredential, WebauthnChallenge},
    user::User,
    user_profile::UserProfile,
};
use crate::domain::repository::{
    CredentialsRepository, LoginTokenRepository, OAuthRepository, PasskeyRepository,
    RateLimitRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_id::UserId, user_name::UserName,
    user_password::UserPassword, user_role::UserRole, user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};
use platform::rate_limit::RateLimitConfig;

/// How long stale rate-limit windows are kept
const RATE_WINDOW_RETENTION_MS: i64 = 3600_000; // 1 hour

/// Counts from the startup cleanup pass
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupReport {
    pub sessions: u64,
    pub login_tokens: u64,
    pub challenges: u64,
    pub oauth_states: u64,
    pub rate_windows: u64,
}

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up all expired auth data (startup housekeeping)
    pub async fn cleanup_expired(&self) -> AuthResult<CleanupReport> {
        let now_ms = Utc::now().timestamp_millis();
        let old_window_ms = now_ms - RATE_WINDOW_RETENTION_MS;

        let sessions = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let login_tokens = sqlx::query("DELETE FROM login_tokens WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let challenges = sqlx::query("DELETE FROM webauthn_challenges WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let oauth_states = sqlx::query("DELETE FROM oauth_states WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let rate_windows = sqlx::query("DELETE FROM rate_limits WHERE window_start_ms < $1")
            .bind(old_window_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let report = CleanupReport {
            sessions,
            login_tokens,
            challenges,
            oauth_states,
            rate_windows,
        };

        tracing::info!(
            sessions = report.sessions,
            login_tokens = report.login_tokens,
            challenges = report.challenges,
            oauth_states = report.oauth_states,
            rate_windows = report.rate_windows,
            "Cleaned up expired auth data"
        );

        Ok(report)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User, profile: &UserProfile) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                user_name,
                user_name_canonical,
                user_role,
                user_status,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.user_role.id())
        .bind(user.user_status.id())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                user_id,
                email,
                email_verified,
                display_name,
                home_city,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(profile.email.as_ref().map(|e| e.as_str()))
        .bind(profile.email_verified)
        .bind(&profile.display_name)
        .bind(&profile.home_city)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                user_name,
                user_name_canonical,
                user_role,
                user_status,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                user_name,
                user_name_canonical,
                user_role,
                user_status,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE public_id = $1
            "#,
        )
        .bind(public_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                user_name,
                user_name_canonical,
                user_role,
                user_status,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE user_name_canonical = $1
            "#,
        )
        .bind(user_name.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.user_id,
                u.public_id,
                u.user_name,
                u.user_name_canonical,
                u.user_role,
                u.user_status,
                u.last_login_at,
                u.created_at,
                u.updated_at
            FROM users u
            JOIN user_profiles p ON p.user_id = u.user_id
            WHERE p.email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_profiles WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                user_name = $2,
                user_name_canonical = $3,
                user_role = $4,
                user_status = $5,
                last_login_at = $6,
                updated_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.user_role.id())
        .bind(user.user_status.id())
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_profile(&self, user_id: &UserId) -> AuthResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                user_id,
                email,
                email_verified,
                display_name,
                home_city,
                created_at,
                updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    async fn update_profile(&self, profile: &UserProfile) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE user_profiles SET
                email = $2,
                email_verified = $3,
                display_name = $4,
                home_city = $5,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(profile.email.as_ref().map(|e| e.as_str()))
        .bind(profile.email_verified)
        .bind(&profile.display_name)
        .bind(&profile.home_city)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Credentials Repository Implementation
// ============================================================================

impl CredentialsRepository for PgAuthRepository {
    async fn create(&self, credentials: &Credentials) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (
                user_id,
                password_hash,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credentials.user_id.as_uuid())
        .bind(credentials.password_hash.as_ref().map(|p| p.as_str()))
        .bind(credentials.login_failed_count as i16)
        .bind(credentials.last_failed_at)
        .bind(credentials.locked_until)
        .bind(credentials.created_at)
        .bind(credentials.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credentials()).transpose()
    }

    async fn update(&self, credentials: &Credentials) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials SET
                password_hash = $2,
                login_failed_count = $3,
                last_failed_at = $4,
                locked_until = $5,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(credentials.user_id.as_uuid())
        .bind(credentials.password_hash.as_ref().map(|p| p.as_str()))
        .bind(credentials.login_failed_count as i16)
        .bind(credentials.last_failed_at)
        .bind(credentials.locked_until)
        .bind(credentials.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                public_id,
                user_role,
                expires_at_ms,
                remember_me,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.public_id.as_str())
        .bind(session.user_role.id())
        .bind(session.expires_at_ms)
        .bind(session.remember_me)
        .bind(&session.client_fingerprint_hash)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                public_id,
                user_role,
                expires_at_ms,
                remember_me,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            FROM auth_sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                // Verify fingerprint
                if r.client_fingerprint_hash != fingerprint_hash {
                    tracing::warn!(
                        session_id = %session_id,
                        "Auth session fingerprint mismatch"
                    );
                    return Err(AuthError::SessionFingerprintMismatch);
                }
                Ok(Some(r.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                public_id,
                user_role,
                expires_at_ms,
                remember_me,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            FROM auth_sessions
            WHERE user_id = $1 AND expires_at_ms > $2
            ORDER BY last_activity_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(now_ms)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_session()).collect()
    }

    async fn update(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_sessions SET
                expires_at_ms = $2,
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64> {
        let deleted = match except {
            Some(except_id) => {
                sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1 AND session_id != $2")
                    .bind(user_id.as_uuid())
                    .bind(except_id)
                    .execute(&self.pool)
                    .await?
                    .rows_affected()
            }
            None => {
                sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
                    .bind(user_id.as_uuid())
                    .execute(&self.pool)
                    .await?
                    .rows_affected()
            }
        };

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Login Token Repository Implementation (magic link)
// ============================================================================

impl LoginTokenRepository for PgAuthRepository {
    async fn create(&self, token: &LoginToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO login_tokens (
                token_hash,
                user_id,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token_hash)
        .bind(token.user_id.as_uuid())
        .bind(token.expires_at_ms)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume(&self, token_hash: &[u8]) -> AuthResult<Option<LoginToken>> {
        let row = sqlx::query_as::<_, LoginTokenRow>(
            r#"
            DELETE FROM login_tokens
            WHERE token_hash = $1
            RETURNING
                token_hash,
                user_id,
                expires_at_ms,
                created_at
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_token()))
    }

    async fn delete_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM login_tokens WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Passkey Repository Implementation
// ============================================================================

impl PasskeyRepository for PgAuthRepository {
    async fn create_credential(&self, credential: &PasskeyCredential) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO webauthn_credentials (
                credential_id,
                user_id,
                label,
                passkey,
                created_at,
                last_used_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&credential.credential_id)
        .bind(credential.user_id.as_uuid())
        .bind(&credential.label)
        .bind(&credential.passkey_json)
        .bind(credential.created_at)
        .bind(credential.last_used_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_credentials(&self, user_id: &UserId) -> AuthResult<Vec<PasskeyCredential>> {
        let rows = sqlx::query_as::<_, PasskeyRow>(
            r#"
            SELECT
                credential_id,
                user_id,
                label,
                passkey,
                created_at,
                last_used_at
            FROM webauthn_credentials
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_credential()).collect())
    }

    async fn update_credential(&self, credential: &PasskeyCredential) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE webauthn_credentials SET
                passkey = $2,
                last_used_at = $3
            WHERE credential_id = $1
            "#,
        )
        .bind(&credential.credential_id)
        .bind(&credential.passkey_json)
        .bind(credential.last_used_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_credential(&self, user_id: &UserId, credential_id: &str) -> AuthResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM webauthn_credentials WHERE credential_id = $1 AND user_id = $2",
        )
        .bind(credential_id)
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn create_challenge(&self, challenge: &WebauthnChallenge) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO webauthn_challenges (
                challenge_id,
                user_id,
                ceremony_kind,
                state,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(challenge.challenge_id)
        .bind(challenge.user_id.as_uuid())
        .bind(challenge.kind.id())
        .bind(&challenge.state_json)
        .bind(challenge.expires_at_ms)
        .bind(challenge.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume_challenge(&self, challenge_id: Uuid) -> AuthResult<Option<WebauthnChallenge>> {
        let row = sqlx::query_as::<_, ChallengeRow>(
            r#"
            DELETE FROM webauthn_challenges
            WHERE challenge_id = $1
            RETURNING
                challenge_id,
                user_id,
                ceremony_kind,
                state,
                expires_at_ms,
                created_at
            "#,
        )
        .bind(challenge_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_challenge()).transpose()
    }
}

// ============================================================================
// OAuth Repository Implementation
// ============================================================================

impl OAuthRepository for PgAuthRepository {
    async fn create_identity(&self, identity: &OAuthIdentity) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO oauth_identities (
                provider,
                provider_user_id,
                user_id,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(identity.provider.code())
        .bind(&identity.provider_user_id)
        .bind(identity.user_id.as_uuid())
        .bind(identity.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_identity(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> AuthResult<Option<OAuthIdentity>> {
        let row = sqlx::query_as::<_, OAuthIdentityRow>(
            r#"
            SELECT
                provider,
                provider_user_id,
                user_id,
                created_at
            FROM oauth_identities
            WHERE provider = $1 AND provider_user_id = $2
            "#,
        )
        .bind(provider.code())
        .bind(provider_user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn create_state(&self, state: &OAuthState) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO oauth_states (
                state,
                provider,
                redirect_uri,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&state.state)
        .bind(state.provider.code())
        .bind(&state.redirect_uri)
        .bind(state.expires_at_ms)
        .bind(state.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume_state(&self, state: &str) -> AuthResult<Option<OAuthState>> {
        let row = sqlx::query_as::<_, OAuthStateRow>(
            r#"
            DELETE FROM oauth_states
            WHERE state = $1
            RETURNING
                state,
                provider,
                redirect_uri,
                expires_at_ms,
                created_at
            "#,
        )
        .bind(state)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_state()).transpose()
    }
}

// ============================================================================
// Rate Limit Repository Implementation
// ============================================================================

impl RateLimitRepository for PgAuthRepository {
    async fn check_rate(&self, key: &str, config: &RateLimitConfig) -> AuthResult<bool> {
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = config.window_ms();
        let window_start = (now_ms / window_ms) * window_ms;

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO rate_limits (scope, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (scope, window_start_ms)
            DO UPDATE SET request_count = rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;
        let allowed = count <= config.max_requests;

        if !allowed {
            tracing::warn!(scope = %key, count = count, max = config.max_requests, "Rate limit exceeded");
        }

        Ok(allowed)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    user_name: String,
    #[allow(dead_code)]
    user_name_canonical: String,
    user_role: i16,
    user_status: i16,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        let user_name = UserName::from_db(&self.user_name)
            .map_err(|e| AuthError::Internal(format!("Invalid user_name: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            user_name,
            user_role: UserRole::from_id(self.user_role),
            user_status: UserStatus::from_id(self.user_status).unwrap_or_default(),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    email: Option<String>,
    email_verified: bool,
    display_name: Option<String>,
    home_city: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> UserProfile {
        UserProfile {
            user_id: UserId::from_uuid(self.user_id),
            email: self.email.map(Email::from_db),
            email_verified: self.email_verified,
            display_name: self.display_name,
            home_city: self.home_city,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    user_id: Uuid,
    password_hash: Option<String>,
    login_failed_count: i16,
    last_failed_at: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<Credentials> {
        let password_hash = self
            .password_hash
            .map(UserPassword::from_db)
            .transpose()
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Credentials {
            user_id: UserId::from_uuid(self.user_id),
            password_hash,
            login_failed_count: self.login_failed_count as u16,
            last_failed_at: self.last_failed_at,
            locked_until: self.locked_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    public_id: String,
    user_role: i16,
    expires_at_ms: i64,
    remember_me: bool,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthResult<AuthSession> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        Ok(AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            user_role: UserRole::from_id(self.user_role),
            expires_at_ms: self.expires_at_ms,
            remember_me: self.remember_me,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LoginTokenRow {
    token_hash: Vec<u8>,
    user_id: Uuid,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl LoginTokenRow {
    fn into_token(self) -> LoginToken {
        LoginToken {
            token_hash: self.token_hash,
            user_id: UserId::from_uuid(self.user_id),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PasskeyRow {
    credential_id: String,
    user_id: Uuid,
    label: String,
    passkey: serde_json::Value,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl PasskeyRow {
    fn into_credential(self) -> PasskeyCredential {
        PasskeyCredential {
            credential_id: self.credential_id,
            user_id: UserId::from_uuid(self.user_id),
            label: self.label,
            passkey_json: self.passkey,
            created_at: self.created_at,
            last_used_at: self.last_used_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChallengeRow {
    challenge_id: Uuid,
    user_id: Uuid,
    ceremony_kind: i16,
    state: serde_json::Value,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl ChallengeRow {
    fn into_challenge(self) -> AuthResult<WebauthnChallenge> {
        let kind = CeremonyKind::from_id(self.ceremony_kind)
            .ok_or_else(|| AuthError::Internal(format!("Invalid ceremony kind: {}", self.ceremony_kind)))?;

        Ok(WebauthnChallenge {
            challenge_id: self.challenge_id,
            user_id: UserId::from_uuid(self.user_id),
            kind,
            state_json: self.state,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OAuthIdentityRow {
    provider: String,
    provider_user_id: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl OAuthIdentityRow {
    fn into_identity(self) -> AuthResult<OAuthIdentity> {
        let provider = OAuthProvider::from_code(&self.provider)
            .ok_or_else(|| AuthError::Internal(format!("Invalid provider: {}", self.provider)))?;

        Ok(OAuthIdentity {
            provider,
            provider_user_id: self.provider_user_id,
            user_id: UserId::from_uuid(self.user_id),
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OAuthStateRow {
    state: String,
    provider: String,
    redirect_uri: String,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl OAuthStateRow {
    fn into_state(self) -> AuthResult<OAuthState> {
        let provider = OAuthProvider::from_code(&self.provider)
            .ok_or_else(|| AuthError::Internal(format!("Invalid provider: {}", self.provider)))?;

        Ok(OAuthState {
            state: self.state,
            provider,
            redirect_uri: self.redirect_uri,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        })
    }
}
