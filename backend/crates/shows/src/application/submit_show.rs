//! Submit Show Use Case
//!
//! Resolves the venue and lineup (creating unverified venues and new
//! artist rows from free text), then runs the duplicate-guarded insert.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use kernel::id::{ArtistId, VenueId};
use uuid::Uuid;

use crate::application::config::ShowsConfig;
use crate::domain::dedup::normalize_artist_name;
use crate::domain::entity::{artist::Artist, show::Show, venue::Venue};
use crate::domain::repository::{
    ArtistRepository, RateLimitRepository, ShowRepository, SubmitOutcome, VenueRepository,
};
use crate::domain::value_object::{show_status::ShowStatus, slug::Slug};
use crate::error::{ShowsError, ShowsResult};
use notify::{NotifyEvent, NotifyHandle};
use platform::client::ClientFingerprint;

/// Venue reference in a submission
#[derive(Debug, Clone)]
pub enum VenueInput {
    /// Existing venue by id
    Id(Uuid),
    /// Free text; resolved by normalized name or created unverified
    Name { name: String, city: String },
}

/// Artist reference in a submission
#[derive(Debug, Clone)]
pub enum ArtistInput {
    Id(Uuid),
    Name(String),
}

/// Show submission input
#[derive(Debug, Clone)]
pub struct SubmitShowInput {
    pub date: NaiveDate,
    pub venue: VenueInput,
    /// Billing order; first entry is the headliner
    pub artists: Vec<ArtistInput>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub ticket_url: Option<String>,
    pub age_restriction: Option<String>,
}

/// Show submission output
#[derive(Debug, Clone)]
pub struct SubmitShowOutput {
    pub show_id: Uuid,
    pub duplicate: bool,
    pub status: ShowStatus,
}

/// Submit show use case
pub struct SubmitShowUseCase<R>
where
    R: ArtistRepository + VenueRepository + ShowRepository + RateLimitRepository,
{
    repo: Arc<R>,
    config: Arc<ShowsConfig>,
    notify: NotifyHandle,
}

impl<R> SubmitShowUseCase<R>
where
    R: ArtistRepository + VenueRepository + ShowRepository + RateLimitRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ShowsConfig>, notify: NotifyHandle) -> Self {
        Self {
            repo,
            config,
            notify,
        }
    }

    /// Submit a show on behalf of an authenticated user
    ///
    /// Staff submissions skip the rate limit and go live immediately.
    pub async fn execute(
        &self,
        input: SubmitShowInput,
        submitted_by: &str,
        is_staff: bool,
        fingerprint: Option<&ClientFingerprint>,
    ) -> ShowsResult<SubmitShowOutput> {
        if !is_staff {
            if let Some(fp) = fingerprint {
                let rate_key = format!("shows:submit:{}", fp.rate_key());
                if !self.repo.check_rate(&rate_key, &self.config.submit_rate).await? {
                    return Err(ShowsError::RateLimitExceeded);
                }
            }

            // Fans submit upcoming shows; staff may backfill history
            if input.date < Utc::now().date_naive() {
                return Err(ShowsError::Validation(
                    "Show date is in the past".to_string(),
                ));
            }
        }

        if input.artists.is_empty() {
            return Err(ShowsError::InvalidLineup("Lineup is empty".to_string()));
        }
        if input.artists.len() > self.config.max_lineup {
            return Err(ShowsError::InvalidLineup(format!(
                "Lineup is limited to {} artists",
                self.config.max_lineup
            )));
        }

        let venue = self.resolve_venue(&input.venue).await?;
        let (lineup, headliner_name) = self.resolve_lineup(&input.artists).await?;

        let mut show = Show::new(input.date, venue.venue_id, submitted_by.to_string());
        show.title = clean_opt(input.title);
        show.description = clean_opt(input.description);
        show.price = clean_opt(input.price);
        show.ticket_url = clean_opt(input.ticket_url);
        show.age_restriction = clean_opt(input.age_restriction);

        if is_staff {
            show.status = ShowStatus::Approved;
            show.reviewed_by = Some(submitted_by.to_string());
            show.reviewed_at = Some(Utc::now());
        }

        let outcome = self
            .repo
            .submit(
                &show,
                &lineup,
                &headliner_name,
                self.config.dedup_window_days,
            )
            .await?;

        match outcome {
            SubmitOutcome::Created(show_id) => {
                tracing::info!(
                    show_id = %show_id,
                    venue = %venue.name,
                    date = %input.date,
                    status = %show.status,
                    "Show submitted"
                );

                if show.status == ShowStatus::Pending {
                    self.notify.emit(NotifyEvent::ShowSubmitted {
                        show_id: show_id.to_string(),
                        headliner: headliner_name.clone(),
                        venue: venue.name.clone(),
                        city: venue.city.clone(),
                        date: input.date,
                        submitted_by: submitted_by.to_string(),
                    });
                }

                Ok(SubmitShowOutput {
                    show_id: show_id.into_uuid(),
                    duplicate: false,
                    status: show.status,
                })
            }
            SubmitOutcome::Duplicate(existing_id) => {
                tracing::info!(
                    existing_show_id = %existing_id,
                    venue = %venue.name,
                    date = %input.date,
                    "Duplicate show submission"
                );

                Ok(SubmitShowOutput {
                    show_id: existing_id.into_uuid(),
                    duplicate: true,
                    status: show.status,
                })
            }
        }
    }

    /// Resolve a venue reference, creating an unverified venue from
    /// free text when nothing matches
    pub(crate) async fn resolve_venue(&self, input: &VenueInput) -> ShowsResult<Venue> {
        match input {
            VenueInput::Id(id) => {
                let venue_id = VenueId::from_uuid(*id);
                VenueRepository::find_by_id(self.repo.as_ref(), &venue_id)
                    .await?
                    .ok_or(ShowsError::VenueNotFound)
            }
            VenueInput::Name { name, city } => {
                let normalized = normalize_artist_name(name);
                if normalized.is_empty() {
                    return Err(ShowsError::Validation("Venue name cannot be empty".to_string()));
                }

                let matches = VenueRepository::find_by_name(self.repo.as_ref(), &normalized).await?;

                // Prefer a match in the same city, else any single match
                let city_normalized = normalize_artist_name(city);
                if let Some(venue) = matches
                    .iter()
                    .find(|v| normalize_artist_name(&v.city) == city_normalized)
                    .or(if matches.len() == 1 { matches.first() } else { None })
                {
                    return Ok(venue.clone());
                }

                let mut venue = Venue::from_name(name, city)?;
                venue.slug = self.unique_venue_slug(venue.slug).await?;
                VenueRepository::create(self.repo.as_ref(), &venue).await?;

                tracing::info!(venue = %venue.name, city = %venue.city, "Unverified venue created");
                Ok(venue)
            }
        }
    }

    /// Resolve the lineup in billing order; returns ids + headliner name
    pub(crate) async fn resolve_lineup(
        &self,
        inputs: &[ArtistInput],
    ) -> ShowsResult<(Vec<ArtistId>, String)> {
        let mut lineup = Vec::with_capacity(inputs.len());
        let mut headliner_name = String::new();

        for (position, input) in inputs.iter().enumerate() {
            let artist = match input {
                ArtistInput::Id(id) => {
                    let artist_id = ArtistId::from_uuid(*id);
                    ArtistRepository::find_by_id(self.repo.as_ref(), &artist_id)
                        .await?
                        .ok_or(ShowsError::ArtistNotFound)?
                }
                ArtistInput::Name(name) => {
                    let normalized = normalize_artist_name(name);
                    if normalized.is_empty() {
                        return Err(ShowsError::InvalidLineup(
                            "Artist name cannot be empty".to_string(),
                        ));
                    }

                    match ArtistRepository::find_by_name(self.repo.as_ref(), &normalized).await? {
                        Some(existing) => existing,
                        None => {
                            let mut artist = Artist::from_name(name)?;
                            artist.slug = self.unique_artist_slug(artist.slug).await?;
                            ArtistRepository::create(self.repo.as_ref(), &artist).await?;
                            artist
                        }
                    }
                }
            };

            if lineup.contains(&artist.artist_id) {
                return Err(ShowsError::InvalidLineup(format!(
                    "{} appears twice in the lineup",
                    artist.name
                )));
            }

            if position == 0 {
                headliner_name = artist.name.clone();
            }
            lineup.push(artist.artist_id);
        }

        Ok((lineup, headliner_name))
    }

    async fn unique_artist_slug(&self, base: Slug) -> ShowsResult<Slug> {
        if !ArtistRepository::exists_by_slug(self.repo.as_ref(), &base).await? {
            return Ok(base);
        }
        for n in 2..100 {
            let candidate = base.with_suffix(n);
            if !ArtistRepository::exists_by_slug(self.repo.as_ref(), &candidate).await? {
                return Ok(candidate);
            }
        }
        Err(ShowsError::SlugTaken(base.as_str().to_string()))
    }

    async fn unique_venue_slug(&self, base: Slug) -> ShowsResult<Slug> {
        if !VenueRepository::exists_by_slug(self.repo.as_ref(), &base).await? {
            return Ok(base);
        }
        for n in 2..100 {
            let candidate = base.with_suffix(n);
            if !VenueRepository::exists_by_slug(self.repo.as_ref(), &candidate).await? {
                return Ok(candidate);
            }
        }
        Err(ShowsError::SlugTaken(base.as_str().to_string()))
    }
}

/// Trim optional free-text fields; empty strings become None
fn clean_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_opt() {
        assert_eq!(clean_opt(None), None);
        assert_eq!(clean_opt(Some("".to_string())), None);
        assert_eq!(clean_opt(Some("   ".to_string())), None);
        assert_eq!(clean_opt(Some("  $10  ".to_string())), Some("$10".to_string()));
    }
}
