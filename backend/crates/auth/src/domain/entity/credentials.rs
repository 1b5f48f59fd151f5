//! Credentials Entity
//!
//! Authentication credentials for a user.
//! Separated from User entity to isolate sensitive data.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{user_id::UserId, user_password::UserPassword};

/// Credentials entity
///
/// Contains sensitive authentication data:
/// - Password hash (optional: magic-link / passkey / OAuth accounts have none)
/// - Login failure tracking
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Reference to User
    pub user_id: UserId,
    /// Hashed password, when password login is enabled
    pub password_hash: Option<UserPassword>,
    /// Consecutive login failure count
    pub login_failed_count: u16,
    /// Last login failure time
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Account locked until (temporary lockout after failures)
    pub locked_until: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credentials {
    /// Maximum login failures before temporary lockout
    pub const MAX_LOGIN_FAILURES: u16 = 5;
    /// Lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 15;

    /// Create credentials with a password
    pub fn with_password(user_id: UserId, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password_hash: Some(password_hash),
            login_failed_count: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create passwordless credentials (magic link / passkey / OAuth account)
    pub fn passwordless(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password_hash: None,
            login_failed_count: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if account is currently locked
    pub fn is_locked(&self) -> bool {
        if let Some(locked_until) = self.locked_until {
            Utc::now() < locked_until
        } else {
            false
        }
    }

    /// Record a failed login attempt
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count += 1;
        self.last_failed_at = Some(now);
        self.updated_at = now;

        // Lock account after too many failures
        if self.login_failed_count >= Self::MAX_LOGIN_FAILURES {
            self.locked_until = Some(now + chrono::Duration::minutes(Self::LOCKOUT_MINUTES));
        }
    }

    /// Reset login failure count on successful login
    pub fn reset_failures(&mut self) {
        self.login_failed_count = 0;
        self.last_failed_at = None;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    /// Set or replace the password
    pub fn set_password(&mut self, new_password: UserPassword) {
        self.password_hash = Some(new_password);
        self.updated_at = Utc::now();
    }

    /// Whether password login is enabled for this account
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn hashed(s: &str) -> UserPassword {
        let raw = RawPassword::new(s.to_string()).unwrap();
        UserPassword::from_raw(&raw, None).unwrap()
    }

    #[test]
    fn test_lockout_after_max_failures() {
        let mut creds = Credentials::with_password(UserId::new(), hashed("cholla cactus court"));
        assert!(!creds.is_locked());

        for _ in 0..Credentials::MAX_LOGIN_FAILURES {
            creds.record_failure();
        }

        assert!(creds.is_locked());
        assert_eq!(creds.login_failed_count, Credentials::MAX_LOGIN_FAILURES);
    }

    #[test]
    fn test_reset_failures_unlocks() {
        let mut creds = Credentials::with_password(UserId::new(), hashed("cholla cactus court"));
        for _ in 0..Credentials::MAX_LOGIN_FAILURES {
            creds.record_failure();
        }
        assert!(creds.is_locked());

        creds.reset_failures();
        assert!(!creds.is_locked());
        assert_eq!(creds.login_failed_count, 0);
        assert!(creds.last_failed_at.is_none());
    }

    #[test]
    fn test_passwordless_account() {
        let creds = Credentials::passwordless(UserId::new());
        assert!(!creds.has_password());
        assert!(!creds.is_locked());
    }
}
