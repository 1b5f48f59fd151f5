//! Admin Import Use Case
//!
//! Bulk endpoint the discovery tool posts scraped venue calendars to.
//! Each event runs through the same resolve-and-dedup pipeline as a
//! user submission; one bad row does not abort the batch.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::config::ShowsConfig;
use crate::application::submit_show::{
    ArtistInput, SubmitShowInput, SubmitShowUseCase, VenueInput,
};
use crate::domain::repository::{
    ArtistRepository, RateLimitRepository, ShowRepository, VenueRepository,
};
use crate::error::{ShowsError, ShowsResult};
use notify::{NotifyEvent, NotifyHandle};

/// One scraped event
#[derive(Debug, Clone)]
pub struct ImportEvent {
    pub venue_name: String,
    pub city: String,
    pub date: NaiveDate,
    /// Billing order; first entry is the headliner
    pub artists: Vec<String>,
    pub ticket_url: Option<String>,
    pub price: Option<String>,
}

/// Per-row failure
#[derive(Debug, Clone)]
pub struct ImportFailure {
    pub index: usize,
    pub error: String,
}

/// Batch outcome
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub created: usize,
    pub duplicates: usize,
    pub failures: Vec<ImportFailure>,
}

/// Import use case (admin only; role is checked in the handler)
pub struct ImportShowsUseCase<R>
where
    R: ArtistRepository + VenueRepository + ShowRepository + RateLimitRepository,
{
    submit: SubmitShowUseCase<R>,
    config: Arc<ShowsConfig>,
    notify: NotifyHandle,
}

impl<R> ImportShowsUseCase<R>
where
    R: ArtistRepository + VenueRepository + ShowRepository + RateLimitRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ShowsConfig>, notify: NotifyHandle) -> Self {
        Self {
            // Imported shows skip the review queue; the notifier handle
            // for per-show events is not needed here
            submit: SubmitShowUseCase::new(repo, config.clone(), NotifyHandle::disabled()),
            config,
            notify,
        }
    }

    pub async fn execute(
        &self,
        events: Vec<ImportEvent>,
        imported_by: &str,
    ) -> ShowsResult<ImportReport> {
        if events.len() > self.config.max_import_batch {
            return Err(ShowsError::Validation(format!(
                "Import batch is limited to {} events",
                self.config.max_import_batch
            )));
        }

        let mut report = ImportReport::default();

        for (index, event) in events.into_iter().enumerate() {
            let input = SubmitShowInput {
                date: event.date,
                venue: VenueInput::Name {
                    name: event.venue_name,
                    city: event.city,
                },
                artists: event.artists.into_iter().map(ArtistInput::Name).collect(),
                title: None,
                description: None,
                price: event.price,
                ticket_url: event.ticket_url,
                age_restriction: None,
            };

            // Imports run as staff: no rate limit, immediate approval
            match self.submit.execute(input, imported_by, true, None).await {
                Ok(output) if output.duplicate => report.duplicates += 1,
                Ok(_) => report.created += 1,
                Err(e) => {
                    tracing::warn!(index = index, error = %e, "Import row failed");
                    report.failures.push(ImportFailure {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            created = report.created,
            duplicates = report.duplicates,
            failures = report.failures.len(),
            "Import completed"
        );

        self.notify.emit(NotifyEvent::ImportCompleted {
            created: report.created,
            duplicates: report.duplicates,
            failures: report.failures.len(),
        });

        Ok(report)
    }
}
