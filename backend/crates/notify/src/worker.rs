//! Notification Worker
//!
//! Events are queued on an unbounded channel; a background task drains
//! it and delivers each event, retrying once after a short backoff.
//! Handlers only ever enqueue.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::discord::AnyNotifier;
use crate::event::NotifyEvent;
use crate::{Notifier, NullNotifier};

/// Delay before the single redelivery attempt
const RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Cheap cloneable handle for enqueueing events
#[derive(Clone)]
pub struct NotifyHandle {
    tx: Option<mpsc::UnboundedSender<NotifyEvent>>,
}

impl NotifyHandle {
    /// Handle that drops every event (tests, notifications disabled)
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Enqueue an event; never blocks, never fails the caller
    pub fn emit(&self, event: NotifyEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(event).is_err() {
            tracing::warn!("Notification worker is gone, event dropped");
        }
    }
}

/// Spawn the delivery worker, returning the enqueue handle
pub fn spawn_worker(notifier: AnyNotifier) -> NotifyHandle {
    // A disabled backend needs no worker task
    if matches!(notifier, AnyNotifier::Null(NullNotifier)) {
        return NotifyHandle::disabled();
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<NotifyEvent>();

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(first) = notifier.send(&event).await {
                tracing::warn!(
                    event = event.code(),
                    error = %first,
                    "Notification delivery failed, retrying"
                );

                tokio::time::sleep(RETRY_BACKOFF).await;

                if let Err(second) = notifier.send(&event).await {
                    tracing::error!(
                        event = event.code(),
                        error = %second,
                        "Notification delivery failed permanently"
                    );
                }
            }
        }
    });

    NotifyHandle { tx: Some(tx) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_handle_emit() {
        let handle = NotifyHandle::disabled();
        // Must be a silent no-op
        handle.emit(NotifyEvent::ImportCompleted {
            created: 1,
            duplicates: 0,
            failures: 0,
        });
    }
}
