//! User Entity
//!
//! Core user profile entity containing non-sensitive user data.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    public_id::PublicId, user_id::UserId, user_name::UserName, user_role::UserRole,
    user_status::UserStatus,
};

/// User entity
///
/// Contains public user profile information.
/// Sensitive auth data is in the Credentials entity.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// User name (unique, for login and display)
    pub user_name: UserName,
    /// Role (User, Moderator, Admin)
    pub user_role: UserRole,
    /// Status (Active, Disabled)
    pub user_status: UserStatus,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(user_name: UserName) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            user_name,
            user_role: UserRole::default(),
            user_status: UserStatus::default(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if user can login
    pub fn can_login(&self) -> bool {
        self.user_status.can_login()
    }

    /// Staff accounts may review submissions
    pub fn is_staff(&self) -> bool {
        self.user_role.is_moderator_or_higher()
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    /// Update user status
    pub fn set_status(&mut self, status: UserStatus) {
        self.user_status = status;
        self.updated_at = Utc::now();
    }

    /// Update user name
    pub fn set_user_name(&mut self, user_name: UserName) {
        self.user_name = user_name;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(UserName::new("gig_goer").unwrap());
        assert_eq!(user.user_role, UserRole::User);
        assert_eq!(user.user_status, UserStatus::Active);
        assert!(user.last_login_at.is_none());
        assert!(user.can_login());
        assert!(!user.is_staff());
    }

    #[test]
    fn test_record_login() {
        let mut user = User::new(UserName::new("gig_goer").unwrap());
        user.record_login();
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_disabled_cannot_login() {
        let mut user = User::new(UserName::new("gig_goer").unwrap());
        user.set_status(UserStatus::Disabled);
        assert!(!user.can_login());
    }
}
