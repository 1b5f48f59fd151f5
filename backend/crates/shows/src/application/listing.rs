//! Listing Use Cases
//!
//! Public read surface: show listings, show detail, artist and venue
//! pages, typeahead search.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::ShowId;
use uuid::Uuid;

use crate::application::config::ShowsConfig;
use crate::domain::entity::{artist::Artist, show::ShowDetails, venue::Venue};
use crate::domain::repository::{
    ArtistRepository, Page, PageResult, ShowQuery, ShowRepository, VenueRepository,
};
use crate::domain::value_object::slug::Slug;
use crate::error::{ShowsError, ShowsResult};

/// Typeahead result cap
const SEARCH_LIMIT: i64 = 20;

/// Who is looking (drives visibility of pending/private shows)
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub public_id: Option<String>,
    pub is_staff: bool,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Listing use case
pub struct ListingUseCase<R>
where
    R: ArtistRepository + VenueRepository + ShowRepository,
{
    repo: Arc<R>,
    config: Arc<ShowsConfig>,
}

impl<R> ListingUseCase<R>
where
    R: ArtistRepository + VenueRepository + ShowRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ShowsConfig>) -> Self {
        Self { repo, config }
    }

    /// Page through shows with filters
    ///
    /// Upcoming shows by default: when no date filter is given,
    /// `date_from` becomes today.
    pub async fn list_shows(
        &self,
        mut query: ShowQuery,
        viewer: &Viewer,
        page: u32,
        per_page: Option<u32>,
    ) -> ShowsResult<PageResult<ShowDetails>> {
        if query.date_from.is_none() && query.date_to.is_none() {
            query.date_from = Some(Utc::now().date_naive());
        }
        query.viewer_public_id = viewer.public_id.clone();
        query.viewer_is_staff = viewer.is_staff;

        let page = Page::new(
            page,
            per_page.unwrap_or(self.config.default_page_size),
            self.config.max_page_size,
        );

        self.repo.list(&query, page).await
    }

    /// Show detail, visibility-checked
    pub async fn get_show(&self, show_id: Uuid, viewer: &Viewer) -> ShowsResult<ShowDetails> {
        let show_id = ShowId::from_uuid(show_id);
        let details = self
            .repo
            .find_details(&show_id)
            .await?
            .ok_or(ShowsError::ShowNotFound)?;

        if !details
            .show
            .visible_to(viewer.public_id.as_deref(), viewer.is_staff)
        {
            // Hidden shows 404 rather than confirm their existence
            return Err(ShowsError::ShowNotFound);
        }

        Ok(details)
    }

    /// Artist page: the artist plus their upcoming approved shows
    pub async fn artist_detail(
        &self,
        slug: &str,
        page: u32,
    ) -> ShowsResult<(Artist, PageResult<ShowDetails>)> {
        let slug = Slug::parse(slug).map_err(|e| ShowsError::Validation(e.to_string()))?;
        let artist = ArtistRepository::find_by_slug(self.repo.as_ref(), &slug)
            .await?
            .ok_or(ShowsError::ArtistNotFound)?;

        let query = ShowQuery {
            artist_slug: Some(artist.slug.as_str().to_string()),
            date_from: Some(Utc::now().date_naive()),
            ..Default::default()
        };
        let page = Page::new(page, self.config.default_page_size, self.config.max_page_size);
        let shows = self.repo.list(&query, page).await?;

        Ok((artist, shows))
    }

    /// Venue page: the venue plus its upcoming approved shows
    pub async fn venue_detail(
        &self,
        slug: &str,
        page: u32,
    ) -> ShowsResult<(Venue, PageResult<ShowDetails>)> {
        let slug = Slug::parse(slug).map_err(|e| ShowsError::Validation(e.to_string()))?;
        let venue = VenueRepository::find_by_slug(self.repo.as_ref(), &slug)
            .await?
            .ok_or(ShowsError::VenueNotFound)?;

        let query = ShowQuery {
            venue_slug: Some(venue.slug.as_str().to_string()),
            date_from: Some(Utc::now().date_naive()),
            ..Default::default()
        };
        let page = Page::new(page, self.config.default_page_size, self.config.max_page_size);
        let shows = self.repo.list(&query, page).await?;

        Ok((venue, shows))
    }

    /// Artist typeahead
    pub async fn search_artists(&self, query: &str) -> ShowsResult<Vec<Artist>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }
        ArtistRepository::search(self.repo.as_ref(), query, SEARCH_LIMIT).await
    }

    /// Venue typeahead
    pub async fn search_venues(&self, query: &str) -> ShowsResult<Vec<Venue>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }
        VenueRepository::search(self.repo.as_ref(), query, SEARCH_LIMIT).await
    }
}
