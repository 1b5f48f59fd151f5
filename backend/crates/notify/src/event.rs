//! Notification Events
//!
//! Moderation-relevant happenings, rendered as compact Discord embeds.

use chrono::NaiveDate;
use serde_json::{Value, json};

/// Events fanned out to the review channel
#[derive(Debug, Clone)]
pub enum NotifyEvent {
    /// A user submitted a show for review
    ShowSubmitted {
        show_id: String,
        headliner: String,
        venue: String,
        city: String,
        date: NaiveDate,
        submitted_by: String,
    },
    /// Staff approved a show
    ShowApproved {
        show_id: String,
        headliner: String,
        venue: String,
        date: NaiveDate,
        reviewed_by: String,
    },
    /// Staff rejected a show
    ShowRejected {
        show_id: String,
        headliner: String,
        venue: String,
        date: NaiveDate,
        reviewed_by: String,
    },
    /// A user proposed a venue edit
    VenueEditProposed {
        edit_id: String,
        venue: String,
        proposed_by: String,
    },
    /// An admin import finished
    ImportCompleted {
        created: usize,
        duplicates: usize,
        failures: usize,
    },
}

/// Embed colors (Discord decimal RGB)
const COLOR_BLUE: u32 = 0x3b82f6;
const COLOR_GREEN: u32 = 0x22c55e;
const COLOR_RED: u32 = 0xef4444;
const COLOR_YELLOW: u32 = 0xeab308;

impl NotifyEvent {
    /// Short event code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            NotifyEvent::ShowSubmitted { .. } => "show.submitted",
            NotifyEvent::ShowApproved { .. } => "show.approved",
            NotifyEvent::ShowRejected { .. } => "show.rejected",
            NotifyEvent::VenueEditProposed { .. } => "venue_edit.proposed",
            NotifyEvent::ImportCompleted { .. } => "import.completed",
        }
    }

    /// Render the Discord webhook payload
    pub fn to_discord_payload(&self) -> Value {
        let embed = match self {
            NotifyEvent::ShowSubmitted {
                show_id,
                headliner,
                venue,
                city,
                date,
                submitted_by,
            } => json!({
                "title": "New show submission",
                "description": format!("**{headliner}** at {venue} ({city}) on {date}"),
                "color": COLOR_BLUE,
                "fields": [
                    {"name": "Show", "value": show_id, "inline": true},
                    {"name": "Submitted by", "value": submitted_by, "inline": true},
                ],
            }),
            NotifyEvent::ShowApproved {
                show_id,
                headliner,
                venue,
                date,
                reviewed_by,
            } => json!({
                "title": "Show approved",
                "description": format!("**{headliner}** at {venue} on {date}"),
                "color": COLOR_GREEN,
                "fields": [
                    {"name": "Show", "value": show_id, "inline": true},
                    {"name": "Reviewed by", "value": reviewed_by, "inline": true},
                ],
            }),
            NotifyEvent::ShowRejected {
                show_id,
                headliner,
                venue,
                date,
                reviewed_by,
            } => json!({
                "title": "Show rejected",
                "description": format!("**{headliner}** at {venue} on {date}"),
                "color": COLOR_RED,
                "fields": [
                    {"name": "Show", "value": show_id, "inline": true},
                    {"name": "Reviewed by", "value": reviewed_by, "inline": true},
                ],
            }),
            NotifyEvent::VenueEditProposed {
                edit_id,
                venue,
                proposed_by,
            } => json!({
                "title": "Venue edit proposed",
                "description": format!("Edit for **{venue}**"),
                "color": COLOR_YELLOW,
                "fields": [
                    {"name": "Edit", "value": edit_id, "inline": true},
                    {"name": "Proposed by", "value": proposed_by, "inline": true},
                ],
            }),
            NotifyEvent::ImportCompleted {
                created,
                duplicates,
                failures,
            } => json!({
                "title": "Import completed",
                "description": format!(
                    "{created} created, {duplicates} duplicates, {failures} failed"
                ),
                "color": if *failures == 0 { COLOR_GREEN } else { COLOR_YELLOW },
            }),
        };

        json!({ "embeds": [embed] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let event = NotifyEvent::ShowSubmitted {
            show_id: "abc".to_string(),
            headliner: "Gay Kiss".to_string(),
            venue: "The Trunk Space".to_string(),
            city: "Phoenix".to_string(),
            date: date(),
            submitted_by: "fanpubid0000000000000".to_string(),
        };

        let payload = event.to_discord_payload();
        let embeds = payload["embeds"].as_array().unwrap();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0]["title"], "New show submission");
        assert!(embeds[0]["description"]
            .as_str()
            .unwrap()
            .contains("Gay Kiss"));
    }

    #[test]
    fn test_event_codes() {
        let event = NotifyEvent::ImportCompleted {
            created: 3,
            duplicates: 1,
            failures: 0,
        };
        assert_eq!(event.code(), "import.completed");
        assert_eq!(event.to_discord_payload()["embeds"][0]["color"], COLOR_GREEN);
    }
}
