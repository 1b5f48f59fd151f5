//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::NaiveDate;
use kernel::id::{ArtistId, ShowId, VenueEditId, VenueId};

use crate::domain::entity::{
    artist::Artist,
    saved::{FavoriteArtist, SavedShow},
    show::{Show, ShowDetails},
    venue::Venue,
    venue_edit::VenueEdit,
};
use crate::domain::value_object::slug::Slug;
use crate::error::ShowsResult;
use platform::rate_limit::RateLimitConfig;

// ============================================================================
// Pagination
// ============================================================================

/// Page request (1-based)
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: u32, per_page: u32, max_per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, max_per_page),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * (self.per_page as i64)
    }
}

/// One page of results plus the total count
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> PageResult<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            (self.total + self.per_page as i64 - 1) / self.per_page as i64
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Filters for the public show listing
#[derive(Debug, Clone, Default)]
pub struct ShowQuery {
    /// Match venue city (case-insensitive)
    pub city: Option<String>,
    pub venue_slug: Option<String>,
    pub artist_slug: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Free-text search over show title, artist and venue names
    pub search: Option<String>,
    /// Viewer identity for visibility of private/pending shows
    pub viewer_public_id: Option<String>,
    pub viewer_is_staff: bool,
}

/// Outcome of a guarded show submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new show row was created
    Created(ShowId),
    /// The submission matched an existing show; no row was created
    Duplicate(ShowId),
}

impl SubmitOutcome {
    pub fn show_id(&self) -> ShowId {
        match self {
            SubmitOutcome::Created(id) | SubmitOutcome::Duplicate(id) => *id,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, SubmitOutcome::Duplicate(_))
    }
}

// ============================================================================
// Repository traits
// ============================================================================

/// Artist repository trait
#[trait_variant::make(ArtistRepository: Send)]
pub trait LocalArtistRepository {
    async fn create(&self, artist: &Artist) -> ShowsResult<()>;

    async fn find_by_id(&self, artist_id: &ArtistId) -> ShowsResult<Option<Artist>>;

    async fn find_by_slug(&self, slug: &Slug) -> ShowsResult<Option<Artist>>;

    /// Resolve a free-text name to an existing artist (normalized match)
    async fn find_by_name(&self, normalized_name: &str) -> ShowsResult<Option<Artist>>;

    async fn exists_by_slug(&self, slug: &Slug) -> ShowsResult<bool>;

    async fn update(&self, artist: &Artist) -> ShowsResult<()>;

    /// Name search for typeahead (ILIKE, capped)
    async fn search(&self, query: &str, limit: i64) -> ShowsResult<Vec<Artist>>;
}

/// Venue repository trait
#[trait_variant::make(VenueRepository: Send)]
pub trait LocalVenueRepository {
    async fn create(&self, venue: &Venue) -> ShowsResult<()>;

    async fn find_by_id(&self, venue_id: &VenueId) -> ShowsResult<Option<Venue>>;

    async fn find_by_slug(&self, slug: &Slug) -> ShowsResult<Option<Venue>>;

    /// Resolve a free-text name to existing venues (normalized match,
    /// may span cities)
    async fn find_by_name(&self, normalized_name: &str) -> ShowsResult<Vec<Venue>>;

    async fn exists_by_slug(&self, slug: &Slug) -> ShowsResult<bool>;

    async fn update(&self, venue: &Venue) -> ShowsResult<()>;

    async fn search(&self, query: &str, limit: i64) -> ShowsResult<Vec<Venue>>;

    /// Unverified venues for the admin queue, oldest first
    async fn list_unverified(&self, page: Page) -> ShowsResult<PageResult<Venue>>;
}

/// Show repository trait
#[trait_variant::make(ShowRepository: Send)]
pub trait LocalShowRepository {
    /// Guarded insert: advisory lock on (venue, date), duplicate scan,
    /// then insert show + lineup - or report the duplicate
    async fn submit(
        &self,
        show: &Show,
        lineup: &[ArtistId],
        headliner_name: &str,
        window_days: i64,
    ) -> ShowsResult<SubmitOutcome>;

    async fn find_by_id(&self, show_id: &ShowId) -> ShowsResult<Option<Show>>;

    /// Show with venue and lineup resolved
    async fn find_details(&self, show_id: &ShowId) -> ShowsResult<Option<ShowDetails>>;

    /// Public listing with filters, search, pagination
    async fn list(&self, query: &ShowQuery, page: Page) -> ShowsResult<PageResult<ShowDetails>>;

    /// Pending shows for the admin queue, oldest first
    async fn list_pending(&self, page: Page) -> ShowsResult<PageResult<ShowDetails>>;

    /// Persist status / review fields
    async fn update_status(&self, show: &Show) -> ShowsResult<()>;
}

/// Saved shows / favorite artists repository trait
#[trait_variant::make(SavedRepository: Send)]
pub trait LocalSavedRepository {
    /// Idempotent save
    async fn save_show(&self, saved: &SavedShow) -> ShowsResult<()>;

    async fn unsave_show(&self, user_public_id: &str, show_id: &ShowId) -> ShowsResult<bool>;

    /// The user's saved upcoming shows
    async fn list_saved(
        &self,
        user_public_id: &str,
        from: NaiveDate,
        page: Page,
    ) -> ShowsResult<PageResult<ShowDetails>>;

    /// Idempotent favorite
    async fn favorite_artist(&self, favorite: &FavoriteArtist) -> ShowsResult<()>;

    async fn unfavorite_artist(
        &self,
        user_public_id: &str,
        artist_id: &ArtistId,
    ) -> ShowsResult<bool>;

    async fn list_favorites(&self, user_public_id: &str) -> ShowsResult<Vec<Artist>>;
}

/// Venue edit repository trait
#[trait_variant::make(VenueEditRepository: Send)]
pub trait LocalVenueEditRepository {
    async fn create(&self, edit: &VenueEdit) -> ShowsResult<()>;

    async fn find_by_id(&self, edit_id: &VenueEditId) -> ShowsResult<Option<VenueEdit>>;

    /// Pending edits for the admin queue, oldest first
    async fn list_pending(&self, page: Page) -> ShowsResult<PageResult<VenueEdit>>;

    /// Persist a resolved edit; when `venue` is given the edit was
    /// approved and the venue update happens in the same transaction
    async fn resolve(&self, edit: &VenueEdit, venue: Option<&Venue>) -> ShowsResult<()>;
}

/// Rate limit repository trait
#[trait_variant::make(RateLimitRepository: Send)]
pub trait LocalRateLimitRepository {
    /// Check and increment the counter for a scope key
    async fn check_rate(&self, key: &str, config: &RateLimitConfig) -> ShowsResult<bool>;
}

/// Everything the shows presentation layer needs from one store
pub trait ShowsRepo:
    ArtistRepository
    + VenueRepository
    + ShowRepository
    + SavedRepository
    + VenueEditRepository
    + RateLimitRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ShowsRepo for T where
    T: ArtistRepository
        + VenueRepository
        + ShowRepository
        + SavedRepository
        + VenueEditRepository
        + RateLimitRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamping() {
        let page = Page::new(0, 500, 100);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);

        let page = Page::new(3, 0, 100);
        assert_eq!(page.per_page, 1);
    }

    #[test]
    fn test_page_offsets() {
        let page = Page::new(1, 25, 100);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 25);

        let page = Page::new(3, 25, 100);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_total_pages() {
        let result: PageResult<i32> = PageResult {
            items: vec![],
            total: 51,
            page: 1,
            per_page: 25,
        };
        assert_eq!(result.total_pages(), 3);

        let empty: PageResult<i32> = PageResult {
            items: vec![],
            total: 0,
            page: 1,
            per_page: 25,
        };
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_submit_outcome() {
        let id = ShowId::new();
        assert!(!SubmitOutcome::Created(id).is_duplicate());
        assert!(SubmitOutcome::Duplicate(id).is_duplicate());
        assert_eq!(SubmitOutcome::Duplicate(id).show_id(), id);
    }
}
