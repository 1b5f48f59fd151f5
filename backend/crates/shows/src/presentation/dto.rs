//! API DTOs (Data Transfer Objects)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::import::{ImportEvent, ImportFailure, ImportReport};
use crate::domain::entity::{
    artist::Artist,
    show::ShowDetails,
    venue::Venue,
    venue_edit::{VenueEdit, VenueEditFields},
};
use crate::domain::repository::PageResult;

// ============================================================================
// Listing
// ============================================================================

/// Query parameters for the show listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowListParams {
    pub city: Option<String>,
    /// Venue slug
    pub venue: Option<String>,
    /// Artist slug
    pub artist: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Free-text search
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    pub per_page: Option<u32>,
}

fn default_page() -> u32 {
    1
}

/// Pagination query for simple paged endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Typeahead query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: String,
}

// ============================================================================
// Shows
// ============================================================================

/// Artist slot in a show response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupItem {
    pub artist_id: Uuid,
    pub slug: String,
    pub name: String,
    pub position: i16,
}

/// Venue summary in a show response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummary {
    pub venue_id: Uuid,
    pub slug: String,
    pub name: String,
    pub city: String,
}

/// Show response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowResponse {
    pub show_id: Uuid,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub ticket_url: Option<String>,
    pub age_restriction: Option<String>,
    pub status: String,
    pub venue: VenueSummary,
    pub lineup: Vec<LineupItem>,
    pub submitted_by: String,
    pub created_at: i64,
}

impl From<ShowDetails> for ShowResponse {
    fn from(details: ShowDetails) -> Self {
        let show = details.show;
        Self {
            show_id: show.show_id.into_uuid(),
            date: show.date,
            title: show.title,
            description: show.description,
            price: show.price,
            ticket_url: show.ticket_url,
            age_restriction: show.age_restriction,
            status: show.status.code().to_string(),
            venue: VenueSummary {
                venue_id: details.venue.venue_id.into_uuid(),
                slug: details.venue.slug,
                name: details.venue.name,
                city: details.venue.city,
            },
            lineup: details
                .lineup
                .into_iter()
                .map(|a| LineupItem {
                    artist_id: a.artist_id.into_uuid(),
                    slug: a.slug,
                    name: a.name,
                    position: a.position,
                })
                .collect(),
            submitted_by: show.submitted_by,
            created_at: show.created_at.timestamp_millis(),
        }
    }
}

/// Paged show listing response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowListResponse {
    pub shows: Vec<ShowResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
}

impl From<PageResult<ShowDetails>> for ShowListResponse {
    fn from(result: PageResult<ShowDetails>) -> Self {
        let total_pages = result.total_pages();
        Self {
            shows: result.items.into_iter().map(ShowResponse::from).collect(),
            total: result.total,
            page: result.page,
            per_page: result.per_page,
            total_pages,
        }
    }
}

// ============================================================================
// Submission
// ============================================================================

/// One artist reference in a submission (id or free text)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRefRequest {
    pub artist_id: Option<Uuid>,
    pub name: Option<String>,
}

/// Show submission request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitShowRequest {
    pub date: NaiveDate,
    /// Existing venue by id...
    pub venue_id: Option<Uuid>,
    /// ...or free text venue
    pub venue_name: Option<String>,
    pub venue_city: Option<String>,
    /// Billing order; first entry is the headliner
    pub artists: Vec<ArtistRefRequest>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub ticket_url: Option<String>,
    pub age_restriction: Option<String>,
}

/// Show submission response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitShowResponse {
    pub show_id: Uuid,
    /// True when the submission matched an existing show
    pub duplicate: bool,
    pub status: String,
}

/// Owner visibility toggle
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub private: bool,
}

// ============================================================================
// Artists / Venues
// ============================================================================

/// Artist response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    pub artist_id: Uuid,
    pub slug: String,
    pub name: String,
    pub hometown: Option<String>,
    pub website: Option<String>,
}

impl From<Artist> for ArtistResponse {
    fn from(artist: Artist) -> Self {
        Self {
            artist_id: artist.artist_id.into_uuid(),
            slug: artist.slug.as_str().to_string(),
            name: artist.name,
            hometown: artist.hometown,
            website: artist.website,
        }
    }
}

/// Venue response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    pub venue_id: Uuid,
    pub slug: String,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub website: Option<String>,
    pub age_policy: Option<String>,
    pub status: String,
}

impl From<Venue> for VenueResponse {
    fn from(venue: Venue) -> Self {
        Self {
            venue_id: venue.venue_id.into_uuid(),
            slug: venue.slug.as_str().to_string(),
            name: venue.name,
            city: venue.city,
            address: venue.address,
            website: venue.website,
            age_policy: venue.age_policy,
            status: venue.status.code().to_string(),
        }
    }
}

/// Artist page response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetailResponse {
    pub artist: ArtistResponse,
    pub upcoming_shows: ShowListResponse,
}

/// Venue page response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueDetailResponse {
    pub venue: VenueResponse,
    pub upcoming_shows: ShowListResponse,
}

/// Paged venue list (admin queue)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueListResponse {
    pub venues: Vec<VenueResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl From<PageResult<Venue>> for VenueListResponse {
    fn from(result: PageResult<Venue>) -> Self {
        Self {
            venues: result.items.into_iter().map(VenueResponse::from).collect(),
            total: result.total,
            page: result.page,
            per_page: result.per_page,
        }
    }
}

// ============================================================================
// Venue Edits
// ============================================================================

/// Venue edit proposal request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueEditRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub age_policy: Option<String>,
    pub note: Option<String>,
}

impl VenueEditRequest {
    pub fn into_fields(self) -> (VenueEditFields, Option<String>) {
        (
            VenueEditFields {
                name: self.name,
                city: self.city,
                address: self.address,
                website: self.website,
                age_policy: self.age_policy,
            },
            self.note,
        )
    }
}

/// Venue edit proposal response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueEditResponse {
    pub edit_id: Uuid,
}

/// Venue edit in the admin queue
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueEditItem {
    pub edit_id: Uuid,
    pub venue_id: Uuid,
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub age_policy: Option<String>,
    pub note: Option<String>,
    pub status: String,
    pub proposed_by: String,
    pub created_at: i64,
}

impl From<VenueEdit> for VenueEditItem {
    fn from(edit: VenueEdit) -> Self {
        Self {
            edit_id: edit.edit_id.into_uuid(),
            venue_id: edit.venue_id.into_uuid(),
            name: edit.fields.name,
            city: edit.fields.city,
            address: edit.fields.address,
            website: edit.fields.website,
            age_policy: edit.fields.age_policy,
            note: edit.note,
            status: edit.status.code().to_string(),
            proposed_by: edit.proposed_by,
            created_at: edit.created_at.timestamp_millis(),
        }
    }
}

/// Paged venue edit list (admin queue)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueEditListResponse {
    pub edits: Vec<VenueEditItem>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl From<PageResult<VenueEdit>> for VenueEditListResponse {
    fn from(result: PageResult<VenueEdit>) -> Self {
        Self {
            edits: result.items.into_iter().map(VenueEditItem::from).collect(),
            total: result.total,
            page: result.page,
            per_page: result.per_page,
        }
    }
}

// ============================================================================
// Import
// ============================================================================

/// One scraped event in an import batch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEventRequest {
    pub venue_name: String,
    pub city: String,
    pub date: NaiveDate,
    pub artists: Vec<String>,
    pub ticket_url: Option<String>,
    pub price: Option<String>,
}

impl From<ImportEventRequest> for ImportEvent {
    fn from(req: ImportEventRequest) -> Self {
        Self {
            venue_name: req.venue_name,
            city: req.city,
            date: req.date,
            artists: req.artists,
            ticket_url: req.ticket_url,
            price: req.price,
        }
    }
}

/// Import batch request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub events: Vec<ImportEventRequest>,
}

/// Per-row import failure
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailureItem {
    pub index: usize,
    pub error: String,
}

impl From<ImportFailure> for ImportFailureItem {
    fn from(failure: ImportFailure) -> Self {
        Self {
            index: failure.index,
            error: failure.error,
        }
    }
}

/// Import batch response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub created: usize,
    pub duplicates: usize,
    pub failures: Vec<ImportFailureItem>,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            created: report.created,
            duplicates: report.duplicates,
            failures: report
                .failures
                .into_iter()
                .map(ImportFailureItem::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params: ShowListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert!(params.per_page.is_none());
        assert!(params.city.is_none());
    }

    #[test]
    fn test_submit_request_date_format() {
        let json = r#"{
            "date": "2026-09-12",
            "venueName": "The Trunk Space",
            "venueCity": "Phoenix",
            "artists": [{"name": "Gay Kiss"}]
        }"#;
        let req: SubmitShowRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2026, 9, 12).unwrap());
        assert_eq!(req.artists.len(), 1);
        assert!(req.venue_id.is_none());
    }

    #[test]
    fn test_show_response_camel_case() {
        let json = serde_json::to_string(&SubmitShowResponse {
            show_id: Uuid::nil(),
            duplicate: true,
            status: "approved".to_string(),
        })
        .unwrap();
        assert!(json.contains("showId"));
        assert!(json.contains(r#""duplicate":true"#));
    }

    #[test]
    fn test_venue_edit_request_into_fields() {
        let req = VenueEditRequest {
            name: None,
            city: None,
            address: Some("1124 N 3rd St".to_string()),
            website: None,
            age_policy: Some("all ages".to_string()),
            note: Some("door moved".to_string()),
        };
        let (fields, note) = req.into_fields();
        assert_eq!(fields.address.as_deref(), Some("1124 N 3rd St"));
        assert!(!fields.is_empty());
        assert_eq!(note.as_deref(), Some("door moved"));
    }
}
