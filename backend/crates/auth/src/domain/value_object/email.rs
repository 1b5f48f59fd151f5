//! Email Value Object
//!
//! Validated, canonicalized email address. The canonical form (NFKC,
//! lowercased) is what gets stored and compared; the original spelling
//! is not preserved.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum total length per RFC 5321
const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,

    #[error("Email is too long (max {MAX_EMAIL_LENGTH} characters)")]
    TooLong,

    #[error("Email format is invalid")]
    InvalidFormat,
}

/// Validated email address (canonical form)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and canonicalize an email address
    ///
    /// Canonicalization: NFKC normalization, trim, ASCII lowercase.
    /// Validation is intentionally shallow (local@domain.tld shape);
    /// real verification happens by sending mail to it.
    pub fn new(raw: &str) -> Result<Self, EmailError> {
        let normalized: String = raw.nfkc().collect::<String>().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }
        if normalized.chars().count() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }

        let (local, domain) = normalized.split_once('@').ok_or(EmailError::InvalidFormat)?;

        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::InvalidFormat);
        }
        if domain.contains('@') || !domain.contains('.') {
            return Err(EmailError::InvalidFormat);
        }
        if domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::InvalidFormat);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(normalized))
    }

    /// Restore from database value (already canonical)
    pub fn from_db(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part (after the @)
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or("")
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(Email::new("fan@example.com").is_ok());
        assert!(Email::new("booking+shows@venue.example.org").is_ok());
        assert!(Email::new("a@b.co").is_ok());
    }

    #[test]
    fn test_canonicalization() {
        let email = Email::new("  Fan@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "fan@example.com");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(Email::new(""), Err(EmailError::Empty));
        assert_eq!(Email::new("no-at-sign"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("@example.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("fan@"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("fan@nodot"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("fan@.example.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("two words@example.com"), Err(EmailError::InvalidFormat));
    }

    #[test]
    fn test_too_long() {
        let long = format!("{}@example.com", "x".repeat(250));
        assert_eq!(Email::new(&long), Err(EmailError::TooLong));
    }
}
