use async_trait::async_trait;
use mailsentry_core::AppResult;
use mailsentry_domain::EmailLogEntry;
use tokio::sync::broadcast;

/// Read port over the sent-email log store.
///
/// The store is written by the external sender system; implementations
/// only ever read it.
#[async_trait]
pub trait EmailLogRepository: Send + Sync {
    /// Lists the most recent entries, newest first.
    async fn list_recent(&self, limit: usize) -> AppResult<Vec<EmailLogEntry>>;
}

/// Fan-out of newly observed log entries to dashboard subscribers.
///
/// Subscriptions live until the receiver is dropped; slow subscribers
/// may observe lagged gaps, never stale duplicates.
#[derive(Debug, Clone)]
pub struct EmailLogBroadcaster {
    sender: broadcast::Sender<EmailLogEntry>,
}

impl EmailLogBroadcaster {
    /// Creates a broadcaster with a bounded per-subscriber buffer.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes one entry to all current subscribers.
    pub fn publish(&self, entry: EmailLogEntry) {
        // Send only errs while nobody is subscribed.
        let _ = self.sender.send(entry);
    }

    /// Opens a subscription over future entries.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EmailLogEntry> {
        self.sender.subscribe()
    }
}
