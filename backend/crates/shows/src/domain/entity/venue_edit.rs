//! Venue Edit Entity
//!
//! A proposed change to a venue's details. Edits hold the new field
//! values (None = leave unchanged) and wait for staff review; approval
//! applies the changes to the venue row in the same transaction.

use chrono::{DateTime, Utc};
use kernel::id::{VenueEditId, VenueId};

use crate::domain::value_object::edit_status::EditStatus;
use crate::error::{ShowsError, ShowsResult};

/// Proposed field changes (None = keep current value)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueEditFields {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub age_policy: Option<String>,
}

impl VenueEditFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.address.is_none()
            && self.website.is_none()
            && self.age_policy.is_none()
    }
}

/// Venue edit entity
#[derive(Debug, Clone)]
pub struct VenueEdit {
    pub edit_id: VenueEditId,
    pub venue_id: VenueId,
    pub fields: VenueEditFields,
    /// Why the change is needed
    pub note: Option<String>,
    pub status: EditStatus,
    /// Public id of the proposing user
    pub proposed_by: String,
    /// Public id of the reviewing staff member
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VenueEdit {
    pub fn new(
        venue_id: VenueId,
        fields: VenueEditFields,
        note: Option<String>,
        proposed_by: String,
    ) -> ShowsResult<Self> {
        if fields.is_empty() {
            return Err(ShowsError::Validation(
                "Venue edit must change at least one field".to_string(),
            ));
        }

        Ok(Self {
            edit_id: VenueEditId::new(),
            venue_id,
            fields,
            note,
            status: EditStatus::Pending,
            proposed_by,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        })
    }

    /// Staff approval: pending -> approved
    pub fn approve(&mut self, reviewer: String) -> ShowsResult<()> {
        self.resolve(EditStatus::Approved, reviewer)
    }

    /// Staff rejection: pending -> rejected
    pub fn reject(&mut self, reviewer: String) -> ShowsResult<()> {
        self.resolve(EditStatus::Rejected, reviewer)
    }

    fn resolve(&mut self, to: EditStatus, reviewer: String) -> ShowsResult<()> {
        if !self.status.is_resolvable() {
            return Err(ShowsError::InvalidTransition {
                from: self.status.code().to_string(),
                to: to.code().to_string(),
            });
        }
        self.status = to;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit() -> VenueEdit {
        VenueEdit::new(
            VenueId::new(),
            VenueEditFields {
                address: Some("1234 Grand Ave".to_string()),
                ..Default::default()
            },
            Some("address was missing".to_string()),
            "proposerpubid00000000".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_edit_rejected() {
        let result = VenueEdit::new(
            VenueId::new(),
            VenueEditFields::default(),
            None,
            "proposerpubid00000000".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_approve() {
        let mut e = edit();
        e.approve("staffpubid00000000000".to_string()).unwrap();
        assert_eq!(e.status, EditStatus::Approved);
        assert!(e.reviewed_at.is_some());

        // Already resolved
        assert!(e.reject("staffpubid00000000000".to_string()).is_err());
    }

    #[test]
    fn test_reject() {
        let mut e = edit();
        e.reject("staffpubid00000000000".to_string()).unwrap();
        assert_eq!(e.status, EditStatus::Rejected);
        assert!(e.approve("staffpubid00000000000".to_string()).is_err());
    }
}
