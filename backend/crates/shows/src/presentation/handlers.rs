//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use auth::application::config::AuthConfig;
use auth::domain::value_object::user_role::UserRole;
use auth::handlers::extract_claims;
use platform::client::{extract_client_ip, extract_fingerprint};

use crate::application::config::ShowsConfig;
use crate::application::listing::Viewer;
use crate::application::{
    ArtistInput, ImportShowsUseCase, ListingUseCase, ReviewUseCase, SavedUseCase,
    SubmitShowInput, SubmitShowUseCase, VenueInput,
};
use crate::domain::repository::{Page, ShowQuery, ShowsRepo};
use crate::error::{ShowsError, ShowsResult};
use crate::presentation::dto::{
    ArtistDetailResponse, ArtistResponse, ImportRequest, ImportResponse, PageParams,
    SearchParams, ShowListParams, ShowListResponse, ShowResponse, SubmitShowRequest,
    SubmitShowResponse, VenueDetailResponse, VenueEditListResponse, VenueEditRequest,
    VenueEditResponse, VenueListResponse, VenueResponse, VisibilityRequest,
};
use notify::NotifyHandle;

/// Shared state for show handlers
#[derive(Clone)]
pub struct ShowsAppState<R>
where
    R: ShowsRepo,
{
    pub repo: Arc<R>,
    pub config: Arc<ShowsConfig>,
    pub auth_config: Arc<AuthConfig>,
    pub notify: NotifyHandle,
}

// ============================================================================
// Public listing
// ============================================================================

/// GET /api/shows
pub async fn list_shows<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Query(params): Query<ShowListParams>,
) -> ShowsResult<Json<ShowListResponse>>
where
    R: ShowsRepo,
{
    let viewer = viewer_from(&headers, &state.auth_config);

    let query = ShowQuery {
        city: params.city,
        venue_slug: params.venue,
        artist_slug: params.artist,
        date_from: params.from,
        date_to: params.to,
        search: params.q,
        ..Default::default()
    };

    let use_case = ListingUseCase::new(state.repo.clone(), state.config.clone());
    let result = use_case
        .list_shows(query, &viewer, params.page, params.per_page)
        .await?;

    Ok(Json(result.into()))
}

/// GET /api/shows/{show_id}
pub async fn get_show<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(show_id): Path<Uuid>,
) -> ShowsResult<Json<ShowResponse>>
where
    R: ShowsRepo,
{
    let viewer = viewer_from(&headers, &state.auth_config);

    let use_case = ListingUseCase::new(state.repo.clone(), state.config.clone());
    let details = use_case.get_show(show_id, &viewer).await?;

    Ok(Json(details.into()))
}

// ============================================================================
// Submission
// ============================================================================

/// POST /api/shows (authenticated)
pub async fn submit_show<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SubmitShowRequest>,
) -> ShowsResult<(StatusCode, Json<SubmitShowResponse>)>
where
    R: ShowsRepo,
{
    let (public_id, role) = require_viewer(&headers, &state.auth_config)?;

    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint =
        extract_fingerprint(&headers, client_ip).map_err(auth::AuthError::from)?;

    let venue = match (req.venue_id, req.venue_name) {
        (Some(id), _) => VenueInput::Id(id),
        (None, Some(name)) => VenueInput::Name {
            name,
            city: req.venue_city.unwrap_or_default(),
        },
        (None, None) => {
            return Err(ShowsError::Validation(
                "Either venueId or venueName is required".to_string(),
            ));
        }
    };

    let artists = req
        .artists
        .into_iter()
        .map(|a| match (a.artist_id, a.name) {
            (Some(id), _) => Ok(ArtistInput::Id(id)),
            (None, Some(name)) => Ok(ArtistInput::Name(name)),
            (None, None) => Err(ShowsError::InvalidLineup(
                "Each artist needs an artistId or a name".to_string(),
            )),
        })
        .collect::<ShowsResult<Vec<_>>>()?;

    let input = SubmitShowInput {
        date: req.date,
        venue,
        artists,
        title: req.title,
        description: req.description,
        price: req.price,
        ticket_url: req.ticket_url,
        age_restriction: req.age_restriction,
    };

    let use_case = SubmitShowUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.notify.clone(),
    );
    let output = use_case
        .execute(
            input,
            &public_id,
            role.is_moderator_or_higher(),
            Some(&fingerprint),
        )
        .await?;

    let status = if output.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(SubmitShowResponse {
            show_id: output.show_id,
            duplicate: output.duplicate,
            status: output.status.code().to_string(),
        }),
    ))
}

/// POST /api/shows/{show_id}/visibility (owner or staff)
pub async fn set_show_visibility<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(show_id): Path<Uuid>,
    Json(req): Json<VisibilityRequest>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let (public_id, role) = require_viewer(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    use_case
        .set_show_private(
            show_id,
            &public_id,
            role.is_moderator_or_higher(),
            req.private,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Artists
// ============================================================================

/// GET /api/artists/search?q=
pub async fn search_artists<R>(
    State(state): State<ShowsAppState<R>>,
    Query(params): Query<SearchParams>,
) -> ShowsResult<Json<Vec<ArtistResponse>>>
where
    R: ShowsRepo,
{
    let use_case = ListingUseCase::new(state.repo.clone(), state.config.clone());
    let artists = use_case.search_artists(&params.q).await?;

    Ok(Json(artists.into_iter().map(ArtistResponse::from).collect()))
}

/// GET /api/artists/{slug}
pub async fn artist_detail<R>(
    State(state): State<ShowsAppState<R>>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> ShowsResult<Json<ArtistDetailResponse>>
where
    R: ShowsRepo,
{
    let use_case = ListingUseCase::new(state.repo.clone(), state.config.clone());
    let (artist, shows) = use_case.artist_detail(&slug, params.page).await?;

    Ok(Json(ArtistDetailResponse {
        artist: artist.into(),
        upcoming_shows: shows.into(),
    }))
}

// ============================================================================
// Venues
// ============================================================================

/// GET /api/venues/search?q=
pub async fn search_venues<R>(
    State(state): State<ShowsAppState<R>>,
    Query(params): Query<SearchParams>,
) -> ShowsResult<Json<Vec<VenueResponse>>>
where
    R: ShowsRepo,
{
    let use_case = ListingUseCase::new(state.repo.clone(), state.config.clone());
    let venues = use_case.search_venues(&params.q).await?;

    Ok(Json(venues.into_iter().map(VenueResponse::from).collect()))
}

/// GET /api/venues/{slug}
pub async fn venue_detail<R>(
    State(state): State<ShowsAppState<R>>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> ShowsResult<Json<VenueDetailResponse>>
where
    R: ShowsRepo,
{
    let use_case = ListingUseCase::new(state.repo.clone(), state.config.clone());
    let (venue, shows) = use_case.venue_detail(&slug, params.page).await?;

    Ok(Json(VenueDetailResponse {
        venue: venue.into(),
        upcoming_shows: shows.into(),
    }))
}

/// POST /api/venues/{venue_id}/edits (authenticated)
pub async fn propose_venue_edit<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(venue_id): Path<Uuid>,
    Json(req): Json<VenueEditRequest>,
) -> ShowsResult<(StatusCode, Json<VenueEditResponse>)>
where
    R: ShowsRepo,
{
    let (public_id, _role) = require_viewer(&headers, &state.auth_config)?;

    let (fields, note) = req.into_fields();

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    let edit_id = use_case
        .propose_venue_edit(venue_id, fields, note, &public_id)
        .await?;

    Ok((StatusCode::CREATED, Json(VenueEditResponse { edit_id })))
}

// ============================================================================
// Saved shows / favorites
// ============================================================================

/// GET /api/me/saved-shows
pub async fn list_saved_shows<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> ShowsResult<Json<ShowListResponse>>
where
    R: ShowsRepo,
{
    let viewer = require_viewer_struct(&headers, &state.auth_config)?;

    let use_case = SavedUseCase::new(state.repo.clone(), state.config.clone());
    let result = use_case.list_saved(&viewer, params.page).await?;

    Ok(Json(result.into()))
}

/// PUT /api/me/saved-shows/{show_id}
pub async fn save_show<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(show_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let viewer = require_viewer_struct(&headers, &state.auth_config)?;

    let use_case = SavedUseCase::new(state.repo.clone(), state.config.clone());
    use_case.save_show(show_id, &viewer).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/me/saved-shows/{show_id}
pub async fn unsave_show<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(show_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let viewer = require_viewer_struct(&headers, &state.auth_config)?;

    let use_case = SavedUseCase::new(state.repo.clone(), state.config.clone());
    let removed = use_case.unsave_show(show_id, &viewer).await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ShowsError::ShowNotFound)
    }
}

/// GET /api/me/favorite-artists
pub async fn list_favorite_artists<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
) -> ShowsResult<Json<Vec<ArtistResponse>>>
where
    R: ShowsRepo,
{
    let viewer = require_viewer_struct(&headers, &state.auth_config)?;

    let use_case = SavedUseCase::new(state.repo.clone(), state.config.clone());
    let artists = use_case.list_favorites(&viewer).await?;

    Ok(Json(artists.into_iter().map(ArtistResponse::from).collect()))
}

/// PUT /api/me/favorite-artists/{artist_id}
pub async fn favorite_artist<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(artist_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let viewer = require_viewer_struct(&headers, &state.auth_config)?;

    let use_case = SavedUseCase::new(state.repo.clone(), state.config.clone());
    use_case.favorite_artist(artist_id, &viewer).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/me/favorite-artists/{artist_id}
pub async fn unfavorite_artist<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(artist_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let viewer = require_viewer_struct(&headers, &state.auth_config)?;

    let use_case = SavedUseCase::new(state.repo.clone(), state.config.clone());
    let removed = use_case.unfavorite_artist(artist_id, &viewer).await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ShowsError::ArtistNotFound)
    }
}

// ============================================================================
// Admin / moderation
// ============================================================================

/// GET /api/admin/shows/pending (staff)
pub async fn pending_shows<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> ShowsResult<Json<ShowListResponse>>
where
    R: ShowsRepo,
{
    require_staff(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    let page = Page::new(params.page, state.config.default_page_size, state.config.max_page_size);
    let result = use_case.pending_shows(page).await?;

    Ok(Json(result.into()))
}

/// POST /api/admin/shows/{show_id}/approve (staff)
pub async fn approve_show<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(show_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let (public_id, _) = require_staff(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    use_case.approve_show(show_id, &public_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/shows/{show_id}/reject (staff)
pub async fn reject_show<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(show_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let (public_id, _) = require_staff(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    use_case.reject_show(show_id, &public_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/venues/unverified (admin)
pub async fn unverified_venues<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> ShowsResult<Json<VenueListResponse>>
where
    R: ShowsRepo,
{
    require_admin(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    let page = Page::new(params.page, state.config.default_page_size, state.config.max_page_size);
    let result = use_case.unverified_venues(page).await?;

    Ok(Json(result.into()))
}

/// POST /api/admin/venues/{venue_id}/verify (admin)
pub async fn verify_venue<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(venue_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    require_admin(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    use_case.verify_venue(venue_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/venue-edits/pending (staff)
pub async fn pending_venue_edits<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> ShowsResult<Json<VenueEditListResponse>>
where
    R: ShowsRepo,
{
    require_staff(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    let page = Page::new(params.page, state.config.default_page_size, state.config.max_page_size);
    let result = use_case.pending_venue_edits(page).await?;

    Ok(Json(result.into()))
}

/// POST /api/admin/venue-edits/{edit_id}/approve (staff)
pub async fn approve_venue_edit<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(edit_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let (public_id, _) = require_staff(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    use_case.approve_venue_edit(edit_id, &public_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/venue-edits/{edit_id}/reject (staff)
pub async fn reject_venue_edit<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Path(edit_id): Path<Uuid>,
) -> ShowsResult<StatusCode>
where
    R: ShowsRepo,
{
    let (public_id, _) = require_staff(&headers, &state.auth_config)?;

    let use_case = ReviewUseCase::new(state.repo.clone(), state.notify.clone());
    use_case.reject_venue_edit(edit_id, &public_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/shows/import (admin)
pub async fn import_shows<R>(
    State(state): State<ShowsAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<ImportRequest>,
) -> ShowsResult<Json<ImportResponse>>
where
    R: ShowsRepo,
{
    let (public_id, _) = require_admin(&headers, &state.auth_config)?;

    let events = req.events.into_iter().map(Into::into).collect();

    let use_case = ImportShowsUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.notify.clone(),
    );
    let report = use_case.execute(events, &public_id).await?;

    Ok(Json(report.into()))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Best-effort viewer: anonymous when there is no valid access token
pub fn viewer_from(headers: &HeaderMap, auth_config: &AuthConfig) -> Viewer {
    match extract_claims(headers, auth_config) {
        Ok(claims) => Viewer {
            public_id: Some(claims.sub.clone()),
            is_staff: claims.user_role().is_moderator_or_higher(),
        },
        Err(_) => Viewer::anonymous(),
    }
}

/// Authenticated caller: public id + role
fn require_viewer(
    headers: &HeaderMap,
    auth_config: &AuthConfig,
) -> ShowsResult<(String, UserRole)> {
    let claims = extract_claims(headers, auth_config).map_err(|_| ShowsError::Unauthenticated)?;
    Ok((claims.sub.clone(), claims.user_role()))
}

fn require_viewer_struct(headers: &HeaderMap, auth_config: &AuthConfig) -> ShowsResult<Viewer> {
    let (public_id, role) = require_viewer(headers, auth_config)?;
    Ok(Viewer {
        public_id: Some(public_id),
        is_staff: role.is_moderator_or_higher(),
    })
}

fn require_staff(
    headers: &HeaderMap,
    auth_config: &AuthConfig,
) -> ShowsResult<(String, UserRole)> {
    let (public_id, role) = require_viewer(headers, auth_config)?;
    if !role.is_moderator_or_higher() {
        return Err(ShowsError::Forbidden);
    }
    Ok((public_id, role))
}

fn require_admin(
    headers: &HeaderMap,
    auth_config: &AuthConfig,
) -> ShowsResult<(String, UserRole)> {
    let (public_id, role) = require_viewer(headers, auth_config)?;
    if !role.is_admin() {
        return Err(ShowsError::Forbidden);
    }
    Ok((public_id, role))
}
