//! Review Use Cases
//!
//! The moderation surface: show approval/rejection, the owner
//! private toggle, venue verification, and venue edit review.

use std::sync::Arc;

use kernel::id::{ShowId, VenueEditId, VenueId};
use uuid::Uuid;

use crate::domain::entity::venue_edit::{VenueEdit, VenueEditFields};
use crate::domain::repository::{
    Page, PageResult, ShowRepository, VenueEditRepository, VenueRepository,
};
use crate::domain::entity::show::ShowDetails;
use crate::domain::entity::venue::Venue;
use crate::error::{ShowsError, ShowsResult};
use notify::{NotifyEvent, NotifyHandle};

/// Review use case (staff / owner actions)
pub struct ReviewUseCase<R>
where
    R: ShowRepository + VenueRepository + VenueEditRepository,
{
    repo: Arc<R>,
    notify: NotifyHandle,
}

impl<R> ReviewUseCase<R>
where
    R: ShowRepository + VenueRepository + VenueEditRepository,
{
    pub fn new(repo: Arc<R>, notify: NotifyHandle) -> Self {
        Self { repo, notify }
    }

    // ========================================================================
    // Shows
    // ========================================================================

    /// Staff: approve a pending (or rejected) show
    pub async fn approve_show(&self, show_id: Uuid, reviewer: &str) -> ShowsResult<()> {
        let show_id = ShowId::from_uuid(show_id);
        let details = self
            .repo
            .find_details(&show_id)
            .await?
            .ok_or(ShowsError::ShowNotFound)?;

        let mut show = details.show.clone();
        show.approve(reviewer.to_string())?;
        self.repo.update_status(&show).await?;

        tracing::info!(show_id = %show_id, reviewer = %reviewer, "Show approved");

        self.notify.emit(NotifyEvent::ShowApproved {
            show_id: show_id.to_string(),
            headliner: headliner_name(&details),
            venue: details.venue.name.clone(),
            date: show.date,
            reviewed_by: reviewer.to_string(),
        });

        Ok(())
    }

    /// Staff: reject a pending show
    pub async fn reject_show(&self, show_id: Uuid, reviewer: &str) -> ShowsResult<()> {
        let show_id = ShowId::from_uuid(show_id);
        let details = self
            .repo
            .find_details(&show_id)
            .await?
            .ok_or(ShowsError::ShowNotFound)?;

        let mut show = details.show.clone();
        show.reject(reviewer.to_string())?;
        self.repo.update_status(&show).await?;

        tracing::info!(show_id = %show_id, reviewer = %reviewer, "Show rejected");

        self.notify.emit(NotifyEvent::ShowRejected {
            show_id: show_id.to_string(),
            headliner: headliner_name(&details),
            venue: details.venue.name.clone(),
            date: show.date,
            reviewed_by: reviewer.to_string(),
        });

        Ok(())
    }

    /// Owner (or staff): toggle an approved show private / public
    pub async fn set_show_private(
        &self,
        show_id: Uuid,
        caller_public_id: &str,
        caller_is_staff: bool,
        private: bool,
    ) -> ShowsResult<()> {
        let show_id = ShowId::from_uuid(show_id);
        let mut show = ShowRepository::find_by_id(self.repo.as_ref(), &show_id)
            .await?
            .ok_or(ShowsError::ShowNotFound)?;

        if !show.is_owned_by(caller_public_id) && !caller_is_staff {
            return Err(ShowsError::NotOwner);
        }

        if private {
            show.make_private()?;
        } else {
            show.make_public()?;
        }
        self.repo.update_status(&show).await?;

        tracing::info!(show_id = %show_id, private = private, "Show visibility changed");
        Ok(())
    }

    /// Staff queue: pending shows, oldest first
    pub async fn pending_shows(&self, page: Page) -> ShowsResult<PageResult<ShowDetails>> {
        ShowRepository::list_pending(self.repo.as_ref(), page).await
    }

    // ========================================================================
    // Venues
    // ========================================================================

    /// Admin: mark a venue verified
    pub async fn verify_venue(&self, venue_id: Uuid) -> ShowsResult<()> {
        let venue_id = VenueId::from_uuid(venue_id);
        let mut venue = VenueRepository::find_by_id(self.repo.as_ref(), &venue_id)
            .await?
            .ok_or(ShowsError::VenueNotFound)?;

        venue.verify();
        VenueRepository::update(self.repo.as_ref(), &venue).await?;

        tracing::info!(venue_id = %venue_id, venue = %venue.name, "Venue verified");
        Ok(())
    }

    /// Admin queue: unverified venues
    pub async fn unverified_venues(&self, page: Page) -> ShowsResult<PageResult<Venue>> {
        self.repo.list_unverified(page).await
    }

    // ========================================================================
    // Venue edits
    // ========================================================================

    /// Any authenticated user: propose a venue edit
    pub async fn propose_venue_edit(
        &self,
        venue_id: Uuid,
        fields: VenueEditFields,
        note: Option<String>,
        proposed_by: &str,
    ) -> ShowsResult<Uuid> {
        let venue_id = VenueId::from_uuid(venue_id);
        let venue = VenueRepository::find_by_id(self.repo.as_ref(), &venue_id)
            .await?
            .ok_or(ShowsError::VenueNotFound)?;

        let edit = VenueEdit::new(venue_id, fields, note, proposed_by.to_string())?;
        VenueEditRepository::create(self.repo.as_ref(), &edit).await?;

        tracing::info!(edit_id = %edit.edit_id, venue = %venue.name, "Venue edit proposed");

        self.notify.emit(NotifyEvent::VenueEditProposed {
            edit_id: edit.edit_id.to_string(),
            venue: venue.name.clone(),
            proposed_by: proposed_by.to_string(),
        });

        Ok(edit.edit_id.into_uuid())
    }

    /// Staff: approve an edit, applying its fields to the venue
    pub async fn approve_venue_edit(&self, edit_id: Uuid, reviewer: &str) -> ShowsResult<()> {
        let edit_id = VenueEditId::from_uuid(edit_id);
        let mut edit = VenueEditRepository::find_by_id(self.repo.as_ref(), &edit_id)
            .await?
            .ok_or(ShowsError::VenueEditNotFound)?;

        let mut venue = VenueRepository::find_by_id(self.repo.as_ref(), &edit.venue_id)
            .await?
            .ok_or(ShowsError::VenueNotFound)?;

        edit.approve(reviewer.to_string())?;
        apply_fields(&mut venue, &edit.fields);

        self.repo.resolve(&edit, Some(&venue)).await?;

        tracing::info!(edit_id = %edit_id, venue = %venue.name, "Venue edit approved");
        Ok(())
    }

    /// Staff: reject an edit
    pub async fn reject_venue_edit(&self, edit_id: Uuid, reviewer: &str) -> ShowsResult<()> {
        let edit_id = VenueEditId::from_uuid(edit_id);
        let mut edit = VenueEditRepository::find_by_id(self.repo.as_ref(), &edit_id)
            .await?
            .ok_or(ShowsError::VenueEditNotFound)?;

        edit.reject(reviewer.to_string())?;
        self.repo.resolve(&edit, None).await?;

        tracing::info!(edit_id = %edit_id, "Venue edit rejected");
        Ok(())
    }

    /// Staff queue: pending venue edits
    pub async fn pending_venue_edits(&self, page: Page) -> ShowsResult<PageResult<VenueEdit>> {
        VenueEditRepository::list_pending(self.repo.as_ref(), page).await
    }
}

/// Apply approved edit fields onto the venue
fn apply_fields(venue: &mut Venue, fields: &VenueEditFields) {
    if let Some(name) = &fields.name {
        venue.name = name.clone();
    }
    if let Some(city) = &fields.city {
        venue.city = city.clone();
    }
    if let Some(address) = &fields.address {
        venue.address = Some(address.clone());
    }
    if let Some(website) = &fields.website {
        venue.website = Some(website.clone());
    }
    if let Some(age_policy) = &fields.age_policy {
        venue.age_policy = Some(age_policy.clone());
    }
    venue.updated_at = chrono::Utc::now();
}

fn headliner_name(details: &ShowDetails) -> String {
    details
        .headliner()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "(unknown)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fields_partial() {
        let mut venue = Venue::from_name("Trunk Space", "Phoenix").unwrap();
        let fields = VenueEditFields {
            address: Some("1124 N 3rd St".to_string()),
            website: Some("https://thetrunkspace.com".to_string()),
            ..Default::default()
        };

        apply_fields(&mut venue, &fields);

        assert_eq!(venue.name, "Trunk Space"); // unchanged
        assert_eq!(venue.city, "Phoenix"); // unchanged
        assert_eq!(venue.address.as_deref(), Some("1124 N 3rd St"));
        assert_eq!(venue.website.as_deref(), Some("https://thetrunkspace.com"));
        assert!(venue.age_policy.is_none());
    }
}
