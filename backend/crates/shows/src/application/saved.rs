//! Saved Shows and Favorite Artists Use Cases

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{ArtistId, ShowId};
use uuid::Uuid;

use crate::application::config::ShowsConfig;
use crate::application::listing::Viewer;
use crate::domain::entity::artist::Artist;
use crate::domain::entity::saved::{FavoriteArtist, SavedShow};
use crate::domain::entity::show::ShowDetails;
use crate::domain::repository::{
    ArtistRepository, Page, PageResult, SavedRepository, ShowRepository,
};
use crate::error::{ShowsError, ShowsResult};

/// Saved shows / favorites use case
pub struct SavedUseCase<R>
where
    R: ShowRepository + ArtistRepository + SavedRepository,
{
    repo: Arc<R>,
    config: Arc<ShowsConfig>,
}

impl<R> SavedUseCase<R>
where
    R: ShowRepository + ArtistRepository + SavedRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ShowsConfig>) -> Self {
        Self { repo, config }
    }

    /// Save a show the viewer can see
    pub async fn save_show(&self, show_id: Uuid, viewer: &Viewer) -> ShowsResult<()> {
        let user = viewer
            .public_id
            .as_deref()
            .ok_or(ShowsError::Unauthenticated)?;

        let id = ShowId::from_uuid(show_id);
        let details = self
            .repo
            .find_details(&id)
            .await?
            .ok_or(ShowsError::ShowNotFound)?;

        if !details.show.visible_to(Some(user), viewer.is_staff) {
            return Err(ShowsError::ShowNotFound);
        }

        let saved = SavedShow::new(user.to_string(), id);
        self.repo.save_show(&saved).await?;

        tracing::debug!(show_id = %id, "Show saved");
        Ok(())
    }

    /// Remove a saved show; Ok(false) when it wasn't saved
    pub async fn unsave_show(&self, show_id: Uuid, viewer: &Viewer) -> ShowsResult<bool> {
        let user = viewer
            .public_id
            .as_deref()
            .ok_or(ShowsError::Unauthenticated)?;

        self.repo
            .unsave_show(user, &ShowId::from_uuid(show_id))
            .await
    }

    /// The viewer's saved upcoming shows
    pub async fn list_saved(
        &self,
        viewer: &Viewer,
        page: u32,
    ) -> ShowsResult<PageResult<ShowDetails>> {
        let user = viewer
            .public_id
            .as_deref()
            .ok_or(ShowsError::Unauthenticated)?;

        let page = Page::new(page, self.config.default_page_size, self.config.max_page_size);
        self.repo
            .list_saved(user, Utc::now().date_naive(), page)
            .await
    }

    /// Favorite an artist
    pub async fn favorite_artist(&self, artist_id: Uuid, viewer: &Viewer) -> ShowsResult<()> {
        let user = viewer
            .public_id
            .as_deref()
            .ok_or(ShowsError::Unauthenticated)?;

        let id = ArtistId::from_uuid(artist_id);
        ArtistRepository::find_by_id(self.repo.as_ref(), &id)
            .await?
            .ok_or(ShowsError::ArtistNotFound)?;

        let favorite = FavoriteArtist::new(user.to_string(), id);
        self.repo.favorite_artist(&favorite).await?;

        Ok(())
    }

    /// Remove a favorite; Ok(false) when it wasn't favorited
    pub async fn unfavorite_artist(&self, artist_id: Uuid, viewer: &Viewer) -> ShowsResult<bool> {
        let user = viewer
            .public_id
            .as_deref()
            .ok_or(ShowsError::Unauthenticated)?;

        self.repo
            .unfavorite_artist(user, &ArtistId::from_uuid(artist_id))
            .await
    }

    /// The viewer's favorite artists
    pub async fn list_favorites(&self, viewer: &Viewer) -> ShowsResult<Vec<Artist>> {
        let user = viewer
            .public_id
            .as_deref()
            .ok_or(ShowsError::Unauthenticated)?;

        self.repo.list_favorites(user).await
    }
}
