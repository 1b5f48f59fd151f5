//! Presentation Layer
//!
//! HTTP handlers, DTOs, and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ShowsAppState;
pub use router::{admin_router, artists_router, me_router, shows_router, venues_router};
