//! UserPassword Value Object
//!
//! Thin domain wrappers over the platform password primitives.
//! `RawPassword` is the validated clear text (zeroized on drop);
//! `UserPassword` is the stored Argon2id hash.

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};

/// Validated clear-text password (never stored, zeroized on drop)
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a raw password against the password policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }

    /// Check the password against the HIBP breach corpus
    ///
    /// Failures are non-fatal; callers log and continue.
    pub async fn check_breach(&self) -> Result<bool, PasswordHashError> {
        self.0.check_breach().await
    }
}

/// Stored password hash (PHC string)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> Result<Self, PasswordHashError> {
        Ok(Self(raw.inner().hash(pepper)?))
    }

    /// Restore from database value
    pub fn from_db(phc: String) -> Result<Self, PasswordHashError> {
        Ok(Self(HashedPassword::from_phc_string(phc)?))
    }

    /// Verify a raw password against this hash
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// PHC string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("cholla cactus court".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None));

        let other = RawPassword::new("a completely different one".to_string()).unwrap();
        assert!(!hashed.verify(&other, None));
    }

    #[test]
    fn test_policy_rejects_weak() {
        assert!(RawPassword::new("short".to_string()).is_err());
        assert!(RawPassword::new("password123".to_string()).is_err());
    }

    #[test]
    fn test_db_roundtrip() {
        let raw = RawPassword::new("cholla cactus court".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        let restored = UserPassword::from_db(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&raw, None));
    }

    #[test]
    fn test_invalid_db_value() {
        assert!(UserPassword::from_db("garbage".to_string()).is_err());
    }
}
