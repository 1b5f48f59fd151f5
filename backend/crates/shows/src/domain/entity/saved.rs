//! Saved Shows and Favorite Artists

use chrono::{DateTime, Utc};
use kernel::id::{ArtistId, ShowId};

/// A show saved by a user
#[derive(Debug, Clone)]
pub struct SavedShow {
    /// Public id of the user
    pub user_public_id: String,
    pub show_id: ShowId,
    pub saved_at: DateTime<Utc>,
}

impl SavedShow {
    pub fn new(user_public_id: String, show_id: ShowId) -> Self {
        Self {
            user_public_id,
            show_id,
            saved_at: Utc::now(),
        }
    }
}

/// An artist favorited by a user
#[derive(Debug, Clone)]
pub struct FavoriteArtist {
    /// Public id of the user
    pub user_public_id: String,
    pub artist_id: ArtistId,
    pub favorited_at: DateTime<Utc>,
}

impl FavoriteArtist {
    pub fn new(user_public_id: String, artist_id: ArtistId) -> Self {
        Self {
            user_public_id,
            artist_id,
            favorited_at: Utc::now(),
        }
    }
}
