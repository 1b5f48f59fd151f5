//! PostgreSQL Repository Implementations
//!
//! The duplicate-guarded submit is the one operation here that is more
//! than plain CRUD: it serializes per (venue, date) slot with a
//! transaction-scoped advisory lock before the read-then-write.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use kernel::id::{ArtistId, ShowId, VenueEditId, VenueId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::dedup::{DedupCandidate, advisory_lock_key, find_duplicate, normalize_artist_name};
use crate::domain::entity::{
    artist::Artist,
    saved::{FavoriteArtist, SavedShow},
    show::{ArtistRef, Show, ShowDetails, VenueRef},
    venue::Venue,
    venue_edit::{VenueEdit, VenueEditFields},
};
use crate::domain::repository::{
    ArtistRepository, Page, PageResult, RateLimitRepository, SavedRepository, ShowQuery,
    ShowRepository, SubmitOutcome, VenueEditRepository, VenueRepository,
};
use crate::domain::value_object::{
    edit_status::EditStatus, show_status::ShowStatus, slug::Slug, venue_status::VenueStatus,
};
use crate::error::{ShowsError, ShowsResult};
use platform::rate_limit::RateLimitConfig;

/// PostgreSQL-backed show repository
#[derive(Clone)]
pub struct PgShowRepository {
    pool: PgPool,
}

impl PgShowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load lineups for a set of shows, keyed by show id
    async fn load_lineups(
        &self,
        show_ids: &[Uuid],
    ) -> ShowsResult<HashMap<Uuid, Vec<ArtistRef>>> {
        if show_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, LineupRow>(
            r#"
            SELECT
                sa.show_id,
                sa.position,
                a.artist_id,
                a.slug,
                a.name
            FROM show_artists sa
            JOIN artists a ON a.artist_id = sa.artist_id
            WHERE sa.show_id = ANY($1)
            ORDER BY sa.show_id, sa.position
            "#,
        )
        .bind(show_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut lineups: HashMap<Uuid, Vec<ArtistRef>> = HashMap::new();
        for row in rows {
            lineups.entry(row.show_id).or_default().push(ArtistRef {
                artist_id: ArtistId::from_uuid(row.artist_id),
                slug: row.slug,
                name: row.name,
                position: row.position,
            });
        }

        Ok(lineups)
    }

    /// Assemble ShowDetails for a page of show+venue rows
    async fn assemble_details(&self, rows: Vec<ShowVenueRow>) -> ShowsResult<Vec<ShowDetails>> {
        let show_ids: Vec<Uuid> = rows.iter().map(|r| r.show_id).collect();
        let mut lineups = self.load_lineups(&show_ids).await?;

        rows.into_iter()
            .map(|row| {
                let lineup = lineups.remove(&row.show_id).unwrap_or_default();
                row.into_details(lineup)
            })
            .collect()
    }
}

// ============================================================================
// Artist Repository Implementation
// ============================================================================

impl ArtistRepository for PgShowRepository {
    async fn create(&self, artist: &Artist) -> ShowsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO artists (
                artist_id,
                slug,
                name,
                name_normalized,
                hometown,
                website,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(artist.artist_id.as_uuid())
        .bind(artist.slug.as_str())
        .bind(&artist.name)
        .bind(normalize_artist_name(&artist.name))
        .bind(&artist.hometown)
        .bind(&artist.website)
        .bind(artist.created_at)
        .bind(artist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, artist_id: &ArtistId) -> ShowsResult<Option<Artist>> {
        let row = sqlx::query_as::<_, ArtistRow>(
            "SELECT artist_id, slug, name, hometown, website, created_at, updated_at
             FROM artists WHERE artist_id = $1",
        )
        .bind(artist_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_artist()))
    }

    async fn find_by_slug(&self, slug: &Slug) -> ShowsResult<Option<Artist>> {
        let row = sqlx::query_as::<_, ArtistRow>(
            "SELECT artist_id, slug, name, hometown, website, created_at, updated_at
             FROM artists WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_artist()))
    }

    async fn find_by_name(&self, normalized_name: &str) -> ShowsResult<Option<Artist>> {
        let row = sqlx::query_as::<_, ArtistRow>(
            "SELECT artist_id, slug, name, hometown, website, created_at, updated_at
             FROM artists WHERE name_normalized = $1",
        )
        .bind(normalized_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_artist()))
    }

    async fn exists_by_slug(&self, slug: &Slug) -> ShowsResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM artists WHERE slug = $1)",
        )
        .bind(slug.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, artist: &Artist) -> ShowsResult<()> {
        sqlx::query(
            r#"
            UPDATE artists SET
                slug = $2,
                name = $3,
                name_normalized = $4,
                hometown = $5,
                website = $6,
                updated_at = $7
            WHERE artist_id = $1
            "#,
        )
        .bind(artist.artist_id.as_uuid())
        .bind(artist.slug.as_str())
        .bind(&artist.name)
        .bind(normalize_artist_name(&artist.name))
        .bind(&artist.hometown)
        .bind(&artist.website)
        .bind(artist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn search(&self, query: &str, limit: i64) -> ShowsResult<Vec<Artist>> {
        let rows = sqlx::query_as::<_, ArtistRow>(
            r#"
            SELECT artist_id, slug, name, hometown, website, created_at, updated_at
            FROM artists
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_artist()).collect())
    }
}

// ============================================================================
// Venue Repository Implementation
// ============================================================================

impl VenueRepository for PgShowRepository {
    async fn create(&self, venue: &Venue) -> ShowsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO venues (
                venue_id,
                slug,
                name,
                name_normalized,
                city,
                address,
                website,
                age_policy,
                venue_status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(venue.venue_id.as_uuid())
        .bind(venue.slug.as_str())
        .bind(&venue.name)
        .bind(normalize_artist_name(&venue.name))
        .bind(&venue.city)
        .bind(&venue.address)
        .bind(&venue.website)
        .bind(&venue.age_policy)
        .bind(venue.status.id())
        .bind(venue.created_at)
        .bind(venue.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, venue_id: &VenueId) -> ShowsResult<Option<Venue>> {
        let row = sqlx::query_as::<_, VenueRow>(
            "SELECT venue_id, slug, name, city, address, website, age_policy, venue_status,
                    created_at, updated_at
             FROM venues WHERE venue_id = $1",
        )
        .bind(venue_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_venue()).transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> ShowsResult<Option<Venue>> {
        let row = sqlx::query_as::<_, VenueRow>(
            "SELECT venue_id, slug, name, city, address, website, age_policy, venue_status,
                    created_at, updated_at
             FROM venues WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_venue()).transpose()
    }

    async fn find_by_name(&self, normalized_name: &str) -> ShowsResult<Vec<Venue>> {
        let rows = sqlx::query_as::<_, VenueRow>(
            "SELECT venue_id, slug, name, city, address, website, age_policy, venue_status,
                    created_at, updated_at
             FROM venues WHERE name_normalized = $1",
        )
        .bind(normalized_name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_venue()).collect()
    }

    async fn exists_by_slug(&self, slug: &Slug) -> ShowsResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM venues WHERE slug = $1)",
        )
        .bind(slug.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, venue: &Venue) -> ShowsResult<()> {
        sqlx::query(
            r#"
            UPDATE venues SET
                slug = $2,
                name = $3,
                name_normalized = $4,
                city = $5,
                address = $6,
                website = $7,
                age_policy = $8,
                venue_status = $9,
                updated_at = $10
            WHERE venue_id = $1
            "#,
        )
        .bind(venue.venue_id.as_uuid())
        .bind(venue.slug.as_str())
        .bind(&venue.name)
        .bind(normalize_artist_name(&venue.name))
        .bind(&venue.city)
        .bind(&venue.address)
        .bind(&venue.website)
        .bind(&venue.age_policy)
        .bind(venue.status.id())
        .bind(venue.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn search(&self, query: &str, limit: i64) -> ShowsResult<Vec<Venue>> {
        let rows = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT venue_id, slug, name, city, address, website, age_policy, venue_status,
                   created_at, updated_at
            FROM venues
            WHERE name ILIKE '%' || $1 || '%' OR city ILIKE '%' || $1 || '%'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_venue()).collect()
    }

    async fn list_unverified(&self, page: Page) -> ShowsResult<PageResult<Venue>> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM venues WHERE venue_status = $1",
        )
        .bind(VenueStatus::Unverified.id())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT venue_id, slug, name, city, address, website, age_policy, venue_status,
                   created_at, updated_at
            FROM venues
            WHERE venue_status = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(VenueStatus::Unverified.id())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|r| r.into_venue())
            .collect::<ShowsResult<Vec<_>>>()?;

        Ok(PageResult {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }
}

// ============================================================================
// Show Repository Implementation
// ============================================================================

impl ShowRepository for PgShowRepository {
    async fn submit(
        &self,
        show: &Show,
        lineup: &[ArtistId],
        headliner_name: &str,
        window_days: i64,
    ) -> ShowsResult<SubmitOutcome> {
        let mut tx = self.pool.begin().await?;

        // Serialize submissions for this (venue, date) slot. The lock is
        // transaction-scoped and released on commit/rollback.
        let lock_key = advisory_lock_key(&show.venue_id, show.date);
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(lock_key)
            .execute(&mut *tx)
            .await?;

        // Candidate shows at this venue within the date window.
        // Rejected rows don't block resubmission.
        let window_from = show.date - Duration::days(window_days);
        let window_to = show.date + Duration::days(window_days);

        let candidate_rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT s.show_id, s.date, a.name AS headliner
            FROM shows s
            JOIN show_artists sa ON sa.show_id = s.show_id AND sa.position = 0
            JOIN artists a ON a.artist_id = sa.artist_id
            WHERE s.venue_id = $1
              AND s.date BETWEEN $2 AND $3
              AND s.status != $4
            "#,
        )
        .bind(show.venue_id.as_uuid())
        .bind(window_from)
        .bind(window_to)
        .bind(ShowStatus::Rejected.id())
        .fetch_all(&mut *tx)
        .await?;

        let candidates: Vec<DedupCandidate> = candidate_rows
            .into_iter()
            .map(|r| DedupCandidate {
                show_id: ShowId::from_uuid(r.show_id),
                date: r.date,
                headliner: r.headliner,
            })
            .collect();

        if let Some(existing) = find_duplicate(headliner_name, &candidates) {
            let existing_id = existing.show_id;
            tx.commit().await?;
            return Ok(SubmitOutcome::Duplicate(existing_id));
        }

        sqlx::query(
            r#"
            INSERT INTO shows (
                show_id,
                date,
                venue_id,
                title,
                description,
                price,
                ticket_url,
                age_restriction,
                status,
                submitted_by,
                duplicate_of,
                reviewed_by,
                reviewed_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(show.show_id.as_uuid())
        .bind(show.date)
        .bind(show.venue_id.as_uuid())
        .bind(&show.title)
        .bind(&show.description)
        .bind(&show.price)
        .bind(&show.ticket_url)
        .bind(&show.age_restriction)
        .bind(show.status.id())
        .bind(&show.submitted_by)
        .bind(show.duplicate_of.map(|id| id.into_uuid()))
        .bind(&show.reviewed_by)
        .bind(show.reviewed_at)
        .bind(show.created_at)
        .bind(show.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, artist_id) in lineup.iter().enumerate() {
            sqlx::query(
                "INSERT INTO show_artists (show_id, artist_id, position) VALUES ($1, $2, $3)",
            )
            .bind(show.show_id.as_uuid())
            .bind(artist_id.as_uuid())
            .bind(position as i16)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(SubmitOutcome::Created(show.show_id))
    }

    async fn find_by_id(&self, show_id: &ShowId) -> ShowsResult<Option<Show>> {
        let row = sqlx::query_as::<_, ShowRow>(
            r#"
            SELECT show_id, date, venue_id, title, description, price, ticket_url,
                   age_restriction, status, submitted_by, duplicate_of,
                   reviewed_by, reviewed_at, created_at, updated_at
            FROM shows
            WHERE show_id = $1
            "#,
        )
        .bind(show_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_show()).transpose()
    }

    async fn find_details(&self, show_id: &ShowId) -> ShowsResult<Option<ShowDetails>> {
        let row = sqlx::query_as::<_, ShowVenueRow>(&format!(
            "{SHOW_VENUE_SELECT} WHERE s.show_id = $1"
        ))
        .bind(show_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut details = self.assemble_details(vec![row]).await?;
        Ok(details.pop())
    }

    async fn list(&self, query: &ShowQuery, page: Page) -> ShowsResult<PageResult<ShowDetails>> {
        // Optional filters are pushed into the SQL as null-guarded
        // parameters so one prepared statement serves every combination
        let filter = r#"
            WHERE ($1::text IS NULL OR lower(v.city) = lower($1))
              AND ($2::text IS NULL OR v.slug = $2)
              AND ($3::text IS NULL OR EXISTS (
                    SELECT 1 FROM show_artists fa
                    JOIN artists fart ON fart.artist_id = fa.artist_id
                    WHERE fa.show_id = s.show_id AND fart.slug = $3))
              AND ($4::date IS NULL OR s.date >= $4)
              AND ($5::date IS NULL OR s.date <= $5)
              AND ($6::text IS NULL
                   OR s.title ILIKE '%' || $6 || '%'
                   OR v.name ILIKE '%' || $6 || '%'
                   OR EXISTS (
                        SELECT 1 FROM show_artists qa
                        JOIN artists qart ON qart.artist_id = qa.artist_id
                        WHERE qa.show_id = s.show_id
                          AND qart.name ILIKE '%' || $6 || '%'))
              AND (s.status = $7
                   OR $8
                   OR ($9::text IS NOT NULL AND s.submitted_by = $9))
        "#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM shows s JOIN venues v ON v.venue_id = s.venue_id {filter}"
        ))
        .bind(&query.city)
        .bind(&query.venue_slug)
        .bind(&query.artist_slug)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&query.search)
        .bind(ShowStatus::Approved.id())
        .bind(query.viewer_is_staff)
        .bind(&query.viewer_public_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ShowVenueRow>(&format!(
            "{SHOW_VENUE_SELECT} {filter} ORDER BY s.date, s.created_at LIMIT $10 OFFSET $11"
        ))
        .bind(&query.city)
        .bind(&query.venue_slug)
        .bind(&query.artist_slug)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&query.search)
        .bind(ShowStatus::Approved.id())
        .bind(query.viewer_is_staff)
        .bind(&query.viewer_public_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = self.assemble_details(rows).await?;

        Ok(PageResult {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn list_pending(&self, page: Page) -> ShowsResult<PageResult<ShowDetails>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shows WHERE status = $1")
            .bind(ShowStatus::Pending.id())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ShowVenueRow>(&format!(
            "{SHOW_VENUE_SELECT} WHERE s.status = $1 ORDER BY s.created_at LIMIT $2 OFFSET $3"
        ))
        .bind(ShowStatus::Pending.id())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = self.assemble_details(rows).await?;

        Ok(PageResult {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn update_status(&self, show: &Show) -> ShowsResult<()> {
        sqlx::query(
            r#"
            UPDATE shows SET
                status = $2,
                reviewed_by = $3,
                reviewed_at = $4,
                updated_at = $5
            WHERE show_id = $1
            "#,
        )
        .bind(show.show_id.as_uuid())
        .bind(show.status.id())
        .bind(&show.reviewed_by)
        .bind(show.reviewed_at)
        .bind(show.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Saved Repository Implementation
// ============================================================================

impl SavedRepository for PgShowRepository {
    async fn save_show(&self, saved: &SavedShow) -> ShowsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO saved_shows (user_public_id, show_id, saved_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_public_id, show_id) DO NOTHING
            "#,
        )
        .bind(&saved.user_public_id)
        .bind(saved.show_id.as_uuid())
        .bind(saved.saved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unsave_show(&self, user_public_id: &str, show_id: &ShowId) -> ShowsResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM saved_shows WHERE user_public_id = $1 AND show_id = $2",
        )
        .bind(user_public_id)
        .bind(show_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_saved(
        &self,
        user_public_id: &str,
        from: NaiveDate,
        page: Page,
    ) -> ShowsResult<PageResult<ShowDetails>> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM saved_shows ss
            JOIN shows s ON s.show_id = ss.show_id
            WHERE ss.user_public_id = $1 AND s.date >= $2
            "#,
        )
        .bind(user_public_id)
        .bind(from)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ShowVenueRow>(&format!(
            r#"
            {SHOW_VENUE_SELECT}
            JOIN saved_shows ss ON ss.show_id = s.show_id
            WHERE ss.user_public_id = $1 AND s.date >= $2
            ORDER BY s.date, s.created_at
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_public_id)
        .bind(from)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = self.assemble_details(rows).await?;

        Ok(PageResult {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn favorite_artist(&self, favorite: &FavoriteArtist) -> ShowsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favorite_artists (user_public_id, artist_id, favorited_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_public_id, artist_id) DO NOTHING
            "#,
        )
        .bind(&favorite.user_public_id)
        .bind(favorite.artist_id.as_uuid())
        .bind(favorite.favorited_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unfavorite_artist(
        &self,
        user_public_id: &str,
        artist_id: &ArtistId,
    ) -> ShowsResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM favorite_artists WHERE user_public_id = $1 AND artist_id = $2",
        )
        .bind(user_public_id)
        .bind(artist_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_favorites(&self, user_public_id: &str) -> ShowsResult<Vec<Artist>> {
        let rows = sqlx::query_as::<_, ArtistRow>(
            r#"
            SELECT a.artist_id, a.slug, a.name, a.hometown, a.website, a.created_at, a.updated_at
            FROM favorite_artists fa
            JOIN artists a ON a.artist_id = fa.artist_id
            WHERE fa.user_public_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(user_public_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_artist()).collect())
    }
}

// ============================================================================
// Venue Edit Repository Implementation
// ============================================================================

impl VenueEditRepository for PgShowRepository {
    async fn create(&self, edit: &VenueEdit) -> ShowsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO venue_edits (
                edit_id,
                venue_id,
                new_name,
                new_city,
                new_address,
                new_website,
                new_age_policy,
                note,
                edit_status,
                proposed_by,
                reviewed_by,
                reviewed_at,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(edit.edit_id.as_uuid())
        .bind(edit.venue_id.as_uuid())
        .bind(&edit.fields.name)
        .bind(&edit.fields.city)
        .bind(&edit.fields.address)
        .bind(&edit.fields.website)
        .bind(&edit.fields.age_policy)
        .bind(&edit.note)
        .bind(edit.status.id())
        .bind(&edit.proposed_by)
        .bind(&edit.reviewed_by)
        .bind(edit.reviewed_at)
        .bind(edit.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, edit_id: &VenueEditId) -> ShowsResult<Option<VenueEdit>> {
        let row = sqlx::query_as::<_, VenueEditRow>(
            r#"
            SELECT edit_id, venue_id, new_name, new_city, new_address, new_website,
                   new_age_policy, note, edit_status, proposed_by, reviewed_by,
                   reviewed_at, created_at
            FROM venue_edits
            WHERE edit_id = $1
            "#,
        )
        .bind(edit_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_edit()).transpose()
    }

    async fn list_pending(&self, page: Page) -> ShowsResult<PageResult<VenueEdit>> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM venue_edits WHERE edit_status = $1")
                .bind(EditStatus::Pending.id())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, VenueEditRow>(
            r#"
            SELECT edit_id, venue_id, new_name, new_city, new_address, new_website,
                   new_age_policy, note, edit_status, proposed_by, reviewed_by,
                   reviewed_at, created_at
            FROM venue_edits
            WHERE edit_status = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(EditStatus::Pending.id())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|r| r.into_edit())
            .collect::<ShowsResult<Vec<_>>>()?;

        Ok(PageResult {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn resolve(&self, edit: &VenueEdit, venue: Option<&Venue>) -> ShowsResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE venue_edits SET
                edit_status = $2,
                reviewed_by = $3,
                reviewed_at = $4
            WHERE edit_id = $1
            "#,
        )
        .bind(edit.edit_id.as_uuid())
        .bind(edit.status.id())
        .bind(&edit.reviewed_by)
        .bind(edit.reviewed_at)
        .execute(&mut *tx)
        .await?;

        // Approved edits apply to the venue in the same transaction
        if let Some(venue) = venue {
            sqlx::query(
                r#"
                UPDATE venues SET
                    name = $2,
                    name_normalized = $3,
                    city = $4,
                    address = $5,
                    website = $6,
                    age_policy = $7,
                    updated_at = $8
                WHERE venue_id = $1
                "#,
            )
            .bind(venue.venue_id.as_uuid())
            .bind(&venue.name)
            .bind(normalize_artist_name(&venue.name))
            .bind(&venue.city)
            .bind(&venue.address)
            .bind(&venue.website)
            .bind(&venue.age_policy)
            .bind(venue.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Rate Limit Repository Implementation
// ============================================================================

impl RateLimitRepository for PgShowRepository {
    async fn check_rate(&self, key: &str, config: &RateLimitConfig) -> ShowsResult<bool> {
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = config.window_ms();
        let window_start = (now_ms / window_ms) * window_ms;

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO rate_limits (scope, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (scope, window_start_ms)
            DO UPDATE SET request_count = rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;
        let allowed = count <= config.max_requests;

        if !allowed {
            tracing::warn!(scope = %key, count = count, max = config.max_requests, "Rate limit exceeded");
        }

        Ok(allowed)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

/// Shared SELECT for show + venue projections
const SHOW_VENUE_SELECT: &str = r#"
    SELECT
        s.show_id, s.date, s.venue_id, s.title, s.description, s.price,
        s.ticket_url, s.age_restriction, s.status, s.submitted_by,
        s.duplicate_of, s.reviewed_by, s.reviewed_at, s.created_at, s.updated_at,
        v.slug AS venue_slug, v.name AS venue_name, v.city AS venue_city
    FROM shows s
    JOIN venues v ON v.venue_id = s.venue_id
"#;

#[derive(sqlx::FromRow)]
struct ShowRow {
    show_id: Uuid,
    date: NaiveDate,
    venue_id: Uuid,
    title: Option<String>,
    description: Option<String>,
    price: Option<String>,
    ticket_url: Option<String>,
    age_restriction: Option<String>,
    status: i16,
    submitted_by: String,
    duplicate_of: Option<Uuid>,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShowRow {
    fn into_show(self) -> ShowsResult<Show> {
        let status = ShowStatus::from_id(self.status)
            .ok_or_else(|| ShowsError::Internal(format!("Invalid show status: {}", self.status)))?;

        Ok(Show {
            show_id: ShowId::from_uuid(self.show_id),
            date: self.date,
            venue_id: VenueId::from_uuid(self.venue_id),
            title: self.title,
            description: self.description,
            price: self.price,
            ticket_url: self.ticket_url,
            age_restriction: self.age_restriction,
            status,
            submitted_by: self.submitted_by,
            duplicate_of: self.duplicate_of.map(ShowId::from_uuid),
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ShowVenueRow {
    show_id: Uuid,
    date: NaiveDate,
    venue_id: Uuid,
    title: Option<String>,
    description: Option<String>,
    price: Option<String>,
    ticket_url: Option<String>,
    age_restriction: Option<String>,
    status: i16,
    submitted_by: String,
    duplicate_of: Option<Uuid>,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    venue_slug: String,
    venue_name: String,
    venue_city: String,
}

impl ShowVenueRow {
    fn into_details(self, lineup: Vec<ArtistRef>) -> ShowsResult<ShowDetails> {
        let venue = VenueRef {
            venue_id: VenueId::from_uuid(self.venue_id),
            slug: self.venue_slug.clone(),
            name: self.venue_name.clone(),
            city: self.venue_city.clone(),
        };

        let show_row = ShowRow {
            show_id: self.show_id,
            date: self.date,
            venue_id: self.venue_id,
            title: self.title,
            description: self.description,
            price: self.price,
            ticket_url: self.ticket_url,
            age_restriction: self.age_restriction,
            status: self.status,
            submitted_by: self.submitted_by,
            duplicate_of: self.duplicate_of,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        Ok(ShowDetails {
            show: show_row.into_show()?,
            venue,
            lineup,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CandidateRow {
    show_id: Uuid,
    date: NaiveDate,
    headliner: String,
}

#[derive(sqlx::FromRow)]
struct LineupRow {
    show_id: Uuid,
    position: i16,
    artist_id: Uuid,
    slug: String,
    name: String,
}

#[derive(sqlx::FromRow)]
struct ArtistRow {
    artist_id: Uuid,
    slug: String,
    name: String,
    hometown: Option<String>,
    website: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ArtistRow {
    fn into_artist(self) -> Artist {
        Artist {
            artist_id: ArtistId::from_uuid(self.artist_id),
            slug: Slug::from_db(self.slug),
            name: self.name,
            hometown: self.hometown,
            website: self.website,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VenueRow {
    venue_id: Uuid,
    slug: String,
    name: String,
    city: String,
    address: Option<String>,
    website: Option<String>,
    age_policy: Option<String>,
    venue_status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VenueRow {
    fn into_venue(self) -> ShowsResult<Venue> {
        let status = VenueStatus::from_id(self.venue_status).ok_or_else(|| {
            ShowsError::Internal(format!("Invalid venue status: {}", self.venue_status))
        })?;

        Ok(Venue {
            venue_id: VenueId::from_uuid(self.venue_id),
            slug: Slug::from_db(self.slug),
            name: self.name,
            city: self.city,
            address: self.address,
            website: self.website,
            age_policy: self.age_policy,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VenueEditRow {
    edit_id: Uuid,
    venue_id: Uuid,
    new_name: Option<String>,
    new_city: Option<String>,
    new_address: Option<String>,
    new_website: Option<String>,
    new_age_policy: Option<String>,
    note: Option<String>,
    edit_status: i16,
    proposed_by: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl VenueEditRow {
    fn into_edit(self) -> ShowsResult<VenueEdit> {
        let status = EditStatus::from_id(self.edit_status).ok_or_else(|| {
            ShowsError::Internal(format!("Invalid edit status: {}", self.edit_status))
        })?;

        Ok(VenueEdit {
            edit_id: VenueEditId::from_uuid(self.edit_id),
            venue_id: VenueId::from_uuid(self.venue_id),
            fields: VenueEditFields {
                name: self.new_name,
                city: self.new_city,
                address: self.new_address,
                website: self.new_website,
                age_policy: self.new_age_policy,
            },
            note: self.note,
            status,
            proposed_by: self.proposed_by,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at,
            created_at: self.created_at,
        })
    }
}
