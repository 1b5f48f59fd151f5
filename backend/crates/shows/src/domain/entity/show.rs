//! Show Entity
//!
//! A show is a dated lineup at a venue. Position 0 in the lineup is
//! the headliner; the duplicate matcher keys on it.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ArtistId, ShowId, VenueId};

use crate::domain::value_object::show_status::ShowStatus;
use crate::error::{ShowsError, ShowsResult};

/// Show entity
#[derive(Debug, Clone)]
pub struct Show {
    pub show_id: ShowId,
    /// Calendar date of the show (venue-local)
    pub date: NaiveDate,
    pub venue_id: VenueId,
    /// Optional title ("Benefit for ..."); defaults to the lineup
    pub title: Option<String>,
    pub description: Option<String>,
    /// Door price as entered ("$10", "donation")
    pub price: Option<String>,
    pub ticket_url: Option<String>,
    /// Door policy override, e.g. "all ages"
    pub age_restriction: Option<String>,
    pub status: ShowStatus,
    /// Public id of the submitting user
    pub submitted_by: String,
    /// When a submission matched an existing show, the original
    pub duplicate_of: Option<ShowId>,
    /// Public id of the reviewing staff member
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Show {
    /// Create a new pending show
    pub fn new(date: NaiveDate, venue_id: VenueId, submitted_by: String) -> Self {
        let now = Utc::now();
        Self {
            show_id: ShowId::new(),
            date,
            venue_id,
            title: None,
            description: None,
            price: None,
            ticket_url: None,
            age_restriction: None,
            status: ShowStatus::Pending,
            submitted_by,
            duplicate_of: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Staff approval: pending | rejected -> approved
    pub fn approve(&mut self, reviewer: String) -> ShowsResult<()> {
        if !self.status.can_approve() {
            return Err(self.transition_error(ShowStatus::Approved));
        }
        self.status = ShowStatus::Approved;
        self.record_review(reviewer);
        Ok(())
    }

    /// Staff rejection: pending -> rejected
    pub fn reject(&mut self, reviewer: String) -> ShowsResult<()> {
        if !self.status.can_reject() {
            return Err(self.transition_error(ShowStatus::Rejected));
        }
        self.status = ShowStatus::Rejected;
        self.record_review(reviewer);
        Ok(())
    }

    /// Owner toggle: approved -> private
    pub fn make_private(&mut self) -> ShowsResult<()> {
        if !self.status.can_toggle_private() {
            return Err(self.transition_error(ShowStatus::Private));
        }
        self.status = ShowStatus::Private;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Owner toggle: private -> approved
    pub fn make_public(&mut self) -> ShowsResult<()> {
        if !self.status.can_toggle_private() {
            return Err(self.transition_error(ShowStatus::Approved));
        }
        self.status = ShowStatus::Approved;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Visible to this viewer?
    ///
    /// Approved shows are public. Everything else is visible to the
    /// submitter and to staff.
    pub fn visible_to(&self, viewer_public_id: Option<&str>, is_staff: bool) -> bool {
        if self.status.is_public() {
            return true;
        }
        if is_staff {
            return true;
        }
        match viewer_public_id {
            Some(pid) => pid == self.submitted_by,
            None => false,
        }
    }

    pub fn is_owned_by(&self, public_id: &str) -> bool {
        self.submitted_by == public_id
    }

    fn record_review(&mut self, reviewer: String) {
        let now = Utc::now();
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.updated_at = now;
    }

    fn transition_error(&self, to: ShowStatus) -> ShowsError {
        ShowsError::InvalidTransition {
            from: self.status.code().to_string(),
            to: to.code().to_string(),
        }
    }
}

/// One slot in a show's lineup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupSlot {
    pub artist_id: ArtistId,
    /// 0 = headliner
    pub position: i16,
}

/// Minimal artist projection for listings
#[derive(Debug, Clone)]
pub struct ArtistRef {
    pub artist_id: ArtistId,
    pub slug: String,
    pub name: String,
    pub position: i16,
}

/// Minimal venue projection for listings
#[derive(Debug, Clone)]
pub struct VenueRef {
    pub venue_id: VenueId,
    pub slug: String,
    pub name: String,
    pub city: String,
}

/// Show with its lineup and venue resolved (read model)
#[derive(Debug, Clone)]
pub struct ShowDetails {
    pub show: Show,
    pub venue: VenueRef,
    /// Ordered by position; index 0 is the headliner
    pub lineup: Vec<ArtistRef>,
}

impl ShowDetails {
    pub fn headliner(&self) -> Option<&ArtistRef> {
        self.lineup.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show() -> Show {
        Show::new(
            NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            VenueId::new(),
            "submitterpubid0000000".to_string(),
        )
    }

    #[test]
    fn test_new_show_is_pending() {
        let s = show();
        assert_eq!(s.status, ShowStatus::Pending);
        assert!(s.reviewed_by.is_none());
        assert!(s.duplicate_of.is_none());
    }

    #[test]
    fn test_approve_flow() {
        let mut s = show();
        s.approve("staffpubid00000000000".to_string()).unwrap();
        assert_eq!(s.status, ShowStatus::Approved);
        assert!(s.reviewed_by.is_some());
        assert!(s.reviewed_at.is_some());

        // Approving twice is a conflict
        assert!(s.approve("staffpubid00000000000".to_string()).is_err());
    }

    #[test]
    fn test_reject_then_reapprove() {
        let mut s = show();
        s.reject("staffpubid00000000000".to_string()).unwrap();
        assert_eq!(s.status, ShowStatus::Rejected);

        // Rejection is terminal for the owner, but staff can re-approve
        assert!(s.reject("staffpubid00000000000".to_string()).is_err());
        s.approve("staffpubid00000000000".to_string()).unwrap();
        assert_eq!(s.status, ShowStatus::Approved);
    }

    #[test]
    fn test_private_toggle() {
        let mut s = show();
        // Pending cannot go private
        assert!(s.make_private().is_err());

        s.approve("staffpubid00000000000".to_string()).unwrap();
        s.make_private().unwrap();
        assert_eq!(s.status, ShowStatus::Private);

        s.make_public().unwrap();
        assert_eq!(s.status, ShowStatus::Approved);
    }

    #[test]
    fn test_visibility() {
        let mut s = show();

        // Pending: submitter and staff only
        assert!(!s.visible_to(None, false));
        assert!(!s.visible_to(Some("someoneelse0000000000"), false));
        assert!(s.visible_to(Some("submitterpubid0000000"), false));
        assert!(s.visible_to(None, true));

        s.approve("staffpubid00000000000".to_string()).unwrap();
        assert!(s.visible_to(None, false));

        s.make_private().unwrap();
        assert!(!s.visible_to(None, false));
        assert!(s.visible_to(Some("submitterpubid0000000"), false));
    }
}
