//! Slug Value Object
//!
//! URL path segment for artists and venues, derived from the display
//! name. Slugs are unique per entity type.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum slug length
pub const MAX_SLUG_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("Slug cannot be empty")]
    Empty,

    #[error("Slug must be at most {MAX_SLUG_LENGTH} characters")]
    TooLong,

    #[error("Slug may only contain lowercase letters, digits and dashes")]
    InvalidCharacter,
}

/// URL-safe identifier derived from a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Parse a slug that is expected to already be in canonical form
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > MAX_SLUG_LENGTH {
            return Err(SlugError::TooLong);
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            || s.starts_with('-')
            || s.ends_with('-')
            || s.contains("--")
        {
            return Err(SlugError::InvalidCharacter);
        }
        Ok(Self(s.to_string()))
    }

    /// Derive a slug from a display name
    ///
    /// NFKC-normalizes, lowercases, maps runs of non-alphanumerics to a
    /// single dash. Returns `Empty` when nothing sluggable remains
    /// (e.g. a name written entirely in unsupported punctuation).
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let normalized: String = name.nfkc().collect::<String>().to_lowercase();

        let mut slug = String::with_capacity(normalized.len());
        let mut last_dash = true; // suppress leading dash
        for ch in normalized.chars() {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                slug.push(ch);
                last_dash = false;
            } else if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }

        if slug.is_empty() {
            return Err(SlugError::Empty);
        }
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }

        Ok(Self(slug))
    }

    /// Append a numeric suffix (for uniqueness collisions)
    pub fn with_suffix(&self, n: u32) -> Self {
        let mut base = self.0.clone();
        let suffix = format!("-{n}");
        if base.len() + suffix.len() > MAX_SLUG_LENGTH {
            base.truncate(MAX_SLUG_LENGTH - suffix.len());
            while base.ends_with('-') {
                base.pop();
            }
        }
        Self(format!("{base}{suffix}"))
    }

    /// Restore from database value (already canonical)
    pub fn from_db(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Slug::from_name("Destruction Unit").unwrap().as_str(), "destruction-unit");
        assert_eq!(Slug::from_name("X-Ray Spex!").unwrap().as_str(), "x-ray-spex");
        assert_eq!(Slug::from_name("  The  Linecutters  ").unwrap().as_str(), "the-linecutters");
        assert_eq!(Slug::from_name("100 gecs").unwrap().as_str(), "100-gecs");
    }

    #[test]
    fn test_from_name_unicode() {
        assert_eq!(Slug::from_name("Café Tacvba").unwrap().as_str(), "caf-tacvba");
        assert_eq!(Slug::from_name("ＡＢＣ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_from_name_empty() {
        assert_eq!(Slug::from_name("!!!---"), Err(SlugError::Empty));
        assert_eq!(Slug::from_name(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_valid() {
        assert!(Slug::parse("valley-bar").is_ok());
        assert!(Slug::parse("trunk-space-2").is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(Slug::parse("Has-Upper"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("-leading"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("trailing-"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("double--dash"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("with space"), Err(SlugError::InvalidCharacter));
    }

    #[test]
    fn test_with_suffix() {
        let slug = Slug::from_name("Valley Bar").unwrap();
        assert_eq!(slug.with_suffix(2).as_str(), "valley-bar-2");
    }

    #[test]
    fn test_truncation() {
        let long = "x".repeat(100);
        let slug = Slug::from_name(&long).unwrap();
        assert!(slug.as_str().len() <= MAX_SLUG_LENGTH);
        assert!(Slug::parse(slug.as_str()).is_ok());
    }
}
