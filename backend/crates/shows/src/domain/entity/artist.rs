//! Artist Entity

use chrono::{DateTime, Utc};
use kernel::id::ArtistId;

use crate::domain::value_object::slug::Slug;
use crate::error::{ShowsError, ShowsResult};

/// Artist entity
#[derive(Debug, Clone)]
pub struct Artist {
    pub artist_id: ArtistId,
    /// URL slug (unique)
    pub slug: Slug,
    /// Display name
    pub name: String,
    /// Hometown, e.g. "Phoenix, AZ"
    pub hometown: Option<String>,
    /// Band site / Bandcamp / Linktree
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artist {
    /// Create an artist from a display name, deriving the slug
    pub fn from_name(name: &str) -> ShowsResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShowsError::Validation("Artist name cannot be empty".to_string()));
        }

        let slug = Slug::from_name(name)
            .map_err(|e| ShowsError::Validation(format!("Cannot slugify artist name: {e}")))?;

        let now = Utc::now();
        Ok(Self {
            artist_id: ArtistId::new(),
            slug,
            name: name.to_string(),
            hometown: None,
            website: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_details(&mut self, hometown: Option<String>, website: Option<String>) {
        self.hometown = hometown;
        self.website = website;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        let artist = Artist::from_name("  Destruction Unit ").unwrap();
        assert_eq!(artist.name, "Destruction Unit");
        assert_eq!(artist.slug.as_str(), "destruction-unit");
    }

    #[test]
    fn test_from_name_rejects_empty() {
        assert!(Artist::from_name("   ").is_err());
        assert!(Artist::from_name("!!!").is_err());
    }
}
