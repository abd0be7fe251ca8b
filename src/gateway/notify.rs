//! Best-effort notification queue.
//!
//! Work that must not block or fail a request (contact-list sync, flip-book
//! deletes) is queued here and delivered by a background task with a few
//! retries. Exhausted work is logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::{ContactsClient, FlipbookClient};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Work items the queue understands.
#[derive(Debug, Clone)]
pub enum Notification {
    /// Mirror a registration into the marketing contact list.
    ContactSync {
        email: String,
        first_name: Option<String>,
    },
    /// Remove a rendered flip-book after its magazine is deleted.
    FlipbookDelete { id: String },
}

impl Notification {
    fn describe(&self) -> String {
        match self {
            Notification::ContactSync { email, .. } => format!("contact sync for {}", email),
            Notification::FlipbookDelete { id } => format!("flip-book delete of {}", id),
        }
    }
}

/// Cloneable handle for queueing work from request handlers.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Start the delivery task and hand back the queue handle.
    pub fn spawn(contacts: Arc<ContactsClient>, flipbook: Arc<FlipbookClient>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                deliver_with_retry(&contacts, &flipbook, notification).await;
            }
        });

        Self { tx }
    }

    /// Queue a work item. A closed queue is logged, never propagated.
    pub fn enqueue(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            tracing::warn!("Notification queue is closed, dropping {}", e.0.describe());
        }
    }
}

async fn deliver_with_retry(
    contacts: &ContactsClient,
    flipbook: &FlipbookClient,
    notification: Notification,
) {
    let mut backoff = INITIAL_BACKOFF;
    for attempt in 1..=MAX_ATTEMPTS {
        let result = match &notification {
            Notification::ContactSync { email, first_name } => {
                contacts.sync(email, first_name.as_deref()).await
            }
            Notification::FlipbookDelete { id } => flipbook.delete(id).await,
        };

        match result {
            Ok(()) => return,
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::debug!(
                    "Attempt {} at {} failed: {}",
                    attempt,
                    notification.describe(),
                    e
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    notification.describe(),
                    MAX_ATTEMPTS,
                    e
                );
            }
        }
    }
}
