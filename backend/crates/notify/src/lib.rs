//! Notify Crate - Event Fan-Out
//!
//! Fire-and-forget notifications for moderation events. Events are
//! queued on an in-process channel and delivered to Discord by a
//! background worker; delivery failures never propagate to request
//! handlers.

pub mod discord;
pub mod event;
pub mod worker;

pub use discord::{AnyNotifier, DiscordNotifier, NullNotifier};
pub use event::NotifyEvent;
pub use worker::{NotifyHandle, spawn_worker};

use thiserror::Error;

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Request(String),

    #[error("Webhook returned status {0}")]
    Status(u16),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

/// Trait for notification backends
#[trait_variant::make(Notifier: Send)]
pub trait LocalNotifier {
    /// Deliver one event
    async fn send(&self, event: &NotifyEvent) -> NotifyResult<()>;
}
