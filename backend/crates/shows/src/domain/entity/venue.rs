//! Venue Entity

use chrono::{DateTime, Utc};
use kernel::id::VenueId;

use crate::domain::value_object::{slug::Slug, venue_status::VenueStatus};
use crate::error::{ShowsError, ShowsResult};

/// Venue entity
#[derive(Debug, Clone)]
pub struct Venue {
    pub venue_id: VenueId,
    /// URL slug (unique)
    pub slug: Slug,
    /// Display name
    pub name: String,
    /// City, e.g. "Phoenix"
    pub city: String,
    /// Street address
    pub address: Option<String>,
    pub website: Option<String>,
    /// Door policy, e.g. "all ages", "21+"
    pub age_policy: Option<String>,
    /// Unverified until an admin confirms the details
    pub status: VenueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// Create a venue from a name and city, deriving the slug
    pub fn from_name(name: &str, city: &str) -> ShowsResult<Self> {
        let name = name.trim();
        let city = city.trim();
        if name.is_empty() {
            return Err(ShowsError::Validation("Venue name cannot be empty".to_string()));
        }
        if city.is_empty() {
            return Err(ShowsError::Validation("Venue city cannot be empty".to_string()));
        }

        let slug = Slug::from_name(name)
            .map_err(|e| ShowsError::Validation(format!("Cannot slugify venue name: {e}")))?;

        let now = Utc::now();
        Ok(Self {
            venue_id: VenueId::new(),
            slug,
            name: name.to_string(),
            city: city.to_string(),
            address: None,
            website: None,
            age_policy: None,
            status: VenueStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Admin verification: unverified -> verified
    pub fn verify(&mut self) {
        self.status = VenueStatus::Verified;
        self.updated_at = Utc::now();
    }

    pub fn is_verified(&self) -> bool {
        self.status == VenueStatus::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        let venue = Venue::from_name("The Trunk Space", "Phoenix").unwrap();
        assert_eq!(venue.slug.as_str(), "the-trunk-space");
        assert_eq!(venue.status, VenueStatus::Unverified);
        assert!(!venue.is_verified());
    }

    #[test]
    fn test_verify() {
        let mut venue = Venue::from_name("Valley Bar", "Phoenix").unwrap();
        venue.verify();
        assert!(venue.is_verified());
    }

    #[test]
    fn test_validation() {
        assert!(Venue::from_name("", "Phoenix").is_err());
        assert!(Venue::from_name("Valley Bar", " ").is_err());
    }
}
