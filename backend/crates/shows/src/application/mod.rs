//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod import;
pub mod listing;
pub mod review;
pub mod saved;
pub mod submit_show;

// Re-exports
pub use config::ShowsConfig;
pub use import::{ImportEvent, ImportReport, ImportShowsUseCase};
pub use listing::{ListingUseCase, Viewer};
pub use review::ReviewUseCase;
pub use saved::SavedUseCase;
pub use submit_show::{
    ArtistInput, SubmitShowInput, SubmitShowOutput, SubmitShowUseCase, VenueInput,
};
