//! UserName Value Object
//!
//! User names serve both login and display. The original spelling is
//! preserved for display; a canonical form (NFKC + lowercase) enforces
//! uniqueness and case-insensitive lookup.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum user name length (code points)
pub const MIN_USER_NAME_LENGTH: usize = 3;

/// Maximum user name length (code points)
pub const MAX_USER_NAME_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name must be at least {MIN_USER_NAME_LENGTH} characters")]
    TooShort,

    #[error("User name must be at most {MAX_USER_NAME_LENGTH} characters")]
    TooLong,

    #[error("User name may only contain letters, digits, '_', '-' and '.'")]
    InvalidCharacter,

    #[error("User name may not start or end with a separator")]
    BadBoundary,

    #[error("User name is reserved")]
    Reserved,
}

/// Names that would collide with routes or staff impersonation
const RESERVED_NAMES: &[&str] = &[
    "admin",
    "administrator",
    "moderator",
    "root",
    "support",
    "staff",
    "api",
    "me",
    "psychichomily",
];

/// Validated user name (original + canonical form)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Validate a new user name
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original: String = raw.as_ref().nfkc().collect::<String>().trim().to_string();
        let canonical = original.to_lowercase();

        let char_count = canonical.chars().count();
        if char_count < MIN_USER_NAME_LENGTH {
            return Err(UserNameError::TooShort);
        }
        if char_count > MAX_USER_NAME_LENGTH {
            return Err(UserNameError::TooLong);
        }

        for ch in canonical.chars() {
            if !(ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.') {
                return Err(UserNameError::InvalidCharacter);
            }
        }

        let first = canonical.chars().next().unwrap();
        let last = canonical.chars().last().unwrap();
        if !first.is_alphanumeric() || !last.is_alphanumeric() {
            return Err(UserNameError::BadBoundary);
        }

        if RESERVED_NAMES.contains(&canonical.as_str()) {
            return Err(UserNameError::Reserved);
        }

        Ok(Self { original, canonical })
    }

    /// Restore from database values (already validated)
    pub fn from_db(original: &str) -> Result<Self, UserNameError> {
        Ok(Self {
            original: original.to_string(),
            canonical: original.to_lowercase(),
        })
    }

    /// Original spelling (for display)
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Canonical form (for uniqueness and lookup)
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(UserName::new("gig_goer").is_ok());
        assert!(UserName::new("Desert.Trash-99").is_ok());
        assert!(UserName::new("abc").is_ok());
    }

    #[test]
    fn test_canonical_lowercases() {
        let name = UserName::new("PhoenixPunk").unwrap();
        assert_eq!(name.original(), "PhoenixPunk");
        assert_eq!(name.canonical(), "phoenixpunk");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(UserName::new("ab"), Err(UserNameError::TooShort));
        assert_eq!(
            UserName::new("x".repeat(MAX_USER_NAME_LENGTH + 1)),
            Err(UserNameError::TooLong)
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(UserName::new("has space"), Err(UserNameError::InvalidCharacter));
        assert_eq!(UserName::new("semi;colon"), Err(UserNameError::InvalidCharacter));
        assert_eq!(UserName::new("at@sign"), Err(UserNameError::InvalidCharacter));
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(UserName::new(".leading"), Err(UserNameError::BadBoundary));
        assert_eq!(UserName::new("trailing-"), Err(UserNameError::BadBoundary));
    }

    #[test]
    fn test_reserved() {
        assert_eq!(UserName::new("admin"), Err(UserNameError::Reserved));
        assert_eq!(UserName::new("Moderator"), Err(UserNameError::Reserved));
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width characters fold to their ASCII equivalents
        let name = UserName::new("ｇｉｇｇｏｅｒ").unwrap();
        assert_eq!(name.canonical(), "giggoer");
    }
}
