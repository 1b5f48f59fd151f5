//! Shows Backend Module
//!
//! The show-listing core of Psychic Homily: artists, venues, shows,
//! and everything around getting a submitted show onto the calendar.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, duplicate matcher, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Public listings with filters, search and pagination
//! - Authenticated show submission with duplicate detection
//!   (advisory-locked, fuzzy headliner match)
//! - Moderation workflow: pending -> approved | rejected, private toggle
//! - Venue verification and proposed venue edits
//! - Saved shows and favorite artists
//! - Admin bulk import (discovery tool endpoint)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ShowsConfig;
pub use error::{ShowsError, ShowsResult};
pub use infra::postgres::PgShowRepository;
pub use presentation::router::{admin_router, artists_router, me_router, shows_router, venues_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::PgShowRepository as ShowStore;
}
