//! Show Routers
//!
//! Separate routers per URL prefix; all share one state.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use auth::application::config::AuthConfig;
use notify::NotifyHandle;

use crate::application::config::ShowsConfig;
use crate::infra::postgres::PgShowRepository;
use crate::presentation::handlers::{self, ShowsAppState};

fn app_state(
    repo: PgShowRepository,
    config: ShowsConfig,
    auth_config: Arc<AuthConfig>,
    notify: NotifyHandle,
) -> ShowsAppState<PgShowRepository> {
    ShowsAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        auth_config,
        notify,
    }
}

/// /api/shows
pub fn shows_router(
    repo: PgShowRepository,
    config: ShowsConfig,
    auth_config: Arc<AuthConfig>,
    notify: NotifyHandle,
) -> Router {
    let state = app_state(repo, config, auth_config, notify);

    Router::new()
        .route("/", get(handlers::list_shows::<PgShowRepository>))
        .route("/", post(handlers::submit_show::<PgShowRepository>))
        .route("/{show_id}", get(handlers::get_show::<PgShowRepository>))
        .route(
            "/{show_id}/visibility",
            post(handlers::set_show_visibility::<PgShowRepository>),
        )
        .with_state(state)
}

/// /api/artists
pub fn artists_router(
    repo: PgShowRepository,
    config: ShowsConfig,
    auth_config: Arc<AuthConfig>,
    notify: NotifyHandle,
) -> Router {
    let state = app_state(repo, config, auth_config, notify);

    Router::new()
        .route("/search", get(handlers::search_artists::<PgShowRepository>))
        .route("/{slug}", get(handlers::artist_detail::<PgShowRepository>))
        .with_state(state)
}

/// /api/venues
pub fn venues_router(
    repo: PgShowRepository,
    config: ShowsConfig,
    auth_config: Arc<AuthConfig>,
    notify: NotifyHandle,
) -> Router {
    let state = app_state(repo, config, auth_config, notify);

    Router::new()
        .route("/search", get(handlers::search_venues::<PgShowRepository>))
        .route("/{slug}", get(handlers::venue_detail::<PgShowRepository>))
        .route(
            "/{venue_id}/edits",
            post(handlers::propose_venue_edit::<PgShowRepository>),
        )
        .with_state(state)
}

/// /api/me (saved shows, favorite artists)
pub fn me_router(
    repo: PgShowRepository,
    config: ShowsConfig,
    auth_config: Arc<AuthConfig>,
    notify: NotifyHandle,
) -> Router {
    let state = app_state(repo, config, auth_config, notify);

    Router::new()
        .route(
            "/saved-shows",
            get(handlers::list_saved_shows::<PgShowRepository>),
        )
        .route(
            "/saved-shows/{show_id}",
            put(handlers::save_show::<PgShowRepository>),
        )
        .route(
            "/saved-shows/{show_id}",
            delete(handlers::unsave_show::<PgShowRepository>),
        )
        .route(
            "/favorite-artists",
            get(handlers::list_favorite_artists::<PgShowRepository>),
        )
        .route(
            "/favorite-artists/{artist_id}",
            put(handlers::favorite_artist::<PgShowRepository>),
        )
        .route(
            "/favorite-artists/{artist_id}",
            delete(handlers::unfavorite_artist::<PgShowRepository>),
        )
        .with_state(state)
}

/// /api/admin (review queues, verification, import)
pub fn admin_router(
    repo: PgShowRepository,
    config: ShowsConfig,
    auth_config: Arc<AuthConfig>,
    notify: NotifyHandle,
) -> Router {
    let state = app_state(repo, config, auth_config, notify);

    Router::new()
        .route(
            "/shows/pending",
            get(handlers::pending_shows::<PgShowRepository>),
        )
        .route(
            "/shows/{show_id}/approve",
            post(handlers::approve_show::<PgShowRepository>),
        )
        .route(
            "/shows/{show_id}/reject",
            post(handlers::reject_show::<PgShowRepository>),
        )
        .route(
            "/shows/import",
            post(handlers::import_shows::<PgShowRepository>),
        )
        .route(
            "/venues/unverified",
            get(handlers::unverified_venues::<PgShowRepository>),
        )
        .route(
            "/venues/{venue_id}/verify",
            post(handlers::verify_venue::<PgShowRepository>),
        )
        .route(
            "/venue-edits/pending",
            get(handlers::pending_venue_edits::<PgShowRepository>),
        )
        .route(
            "/venue-edits/{edit_id}/approve",
            post(handlers::approve_venue_edit::<PgShowRepository>),
        )
        .route(
            "/venue-edits/{edit_id}/reject",
            post(handlers::reject_venue_edit::<PgShowRepository>),
        )
        .with_state(state)
}
