//! User Profile Entity
//!
//! Contact and display details, separated from the core User entity.
//! Email lives here rather than on User so accounts without email
//! (passkey-only) stay representable.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId};

/// User profile entity
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// Reference to User
    pub user_id: UserId,
    /// Email address (unique when present)
    pub email: Option<Email>,
    /// Whether the email has been verified (magic link redeem verifies it)
    pub email_verified: bool,
    /// Display name shown alongside submissions
    pub display_name: Option<String>,
    /// Home city, used to default show listings
    pub home_city: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create an empty profile for a new user
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: None,
            email_verified: false,
            display_name: None,
            home_city: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a profile with a known email (OAuth provisioning)
    pub fn with_email(user_id: UserId, email: Email, verified: bool) -> Self {
        let mut profile = Self::new(user_id);
        profile.email = Some(email);
        profile.email_verified = verified;
        profile
    }

    /// Set or replace the email; resets verification
    pub fn set_email(&mut self, email: Email) {
        self.email = Some(email);
        self.email_verified = false;
        self.updated_at = Utc::now();
    }

    /// Mark the current email as verified
    pub fn mark_email_verified(&mut self) {
        if self.email.is_some() {
            self.email_verified = true;
            self.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_email_resets_verification() {
        let mut profile = UserProfile::new(UserId::new());
        profile.set_email(Email::new("fan@example.com").unwrap());
        profile.mark_email_verified();
        assert!(profile.email_verified);

        profile.set_email(Email::new("new@example.com").unwrap());
        assert!(!profile.email_verified);
    }

    #[test]
    fn test_verify_without_email_is_noop() {
        let mut profile = UserProfile::new(UserId::new());
        profile.mark_email_verified();
        assert!(!profile.email_verified);
    }
}
