//! Discord Webhook Notifier

use std::time::Duration;

use crate::event::NotifyEvent;
use crate::{Notifier, NotifyError, NotifyResult};

/// Delivers events to a Discord webhook URL
#[derive(Clone)]
pub struct DiscordNotifier {
    http: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client builder with static config");

        Self { http, webhook_url }
    }
}

impl Notifier for DiscordNotifier {
    async fn send(&self, event: &NotifyEvent) -> NotifyResult<()> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&event.to_discord_payload())
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        tracing::debug!(event = event.code(), "Notification delivered");
        Ok(())
    }
}

/// No-op notifier (webhook not configured, tests)
#[derive(Clone, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    async fn send(&self, event: &NotifyEvent) -> NotifyResult<()> {
        tracing::debug!(event = event.code(), "Notification dropped (no webhook configured)");
        Ok(())
    }
}

/// Runtime-selected notifier backend
#[derive(Clone)]
pub enum AnyNotifier {
    Discord(DiscordNotifier),
    Null(NullNotifier),
}

impl Notifier for AnyNotifier {
    async fn send(&self, event: &NotifyEvent) -> NotifyResult<()> {
        match self {
            AnyNotifier::Discord(n) => n.send(event).await,
            AnyNotifier::Null(n) => n.send(event).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_notifier() {
        let notifier = NullNotifier;
        let event = NotifyEvent::ImportCompleted {
            created: 0,
            duplicates: 0,
            failures: 0,
        };
        assert!(notifier.send(&event).await.is_ok());
    }
}
