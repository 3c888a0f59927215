use std::time::Duration;

use mailsentry_application::EmailLogBroadcaster;
use tracing::{debug, warn};

use crate::postgres_email_log_repository::PostgresEmailLogRepository;

/// Rows fetched per poll tick.
const POLL_BATCH_LIMIT: usize = 200;

/// Publishes fresh `email_logs` inserts to the dashboard feed.
///
/// The table is written by the external sender system, so inserts are
/// observed with an id watermark on a bounded poll loop rather than a
/// storage-side hook.
pub struct PostgresEmailLogPoller {
    repository: PostgresEmailLogRepository,
    broadcaster: EmailLogBroadcaster,
    poll_interval: Duration,
}

impl PostgresEmailLogPoller {
    /// Creates a poller over the given repository and feed.
    #[must_use]
    pub fn new(
        repository: PostgresEmailLogRepository,
        broadcaster: EmailLogBroadcaster,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repository,
            broadcaster,
            poll_interval,
        }
    }

    /// Runs the poll loop until the task is dropped.
    ///
    /// Entries existing at startup are skipped; only inserts observed
    /// after the initial watermark are published.
    pub async fn run(self) {
        let mut watermark = match self.repository.latest_id().await {
            Ok(latest) => latest,
            Err(error) => {
                warn!(%error, "email log poller starting from an empty watermark");
                0
            }
        };

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;

            match self.repository.list_after(watermark, POLL_BATCH_LIMIT).await {
                Ok(entries) => {
                    for entry in entries {
                        watermark = watermark.max(entry.id);
                        debug!(entry_id = entry.id, "publishing fresh email log entry");
                        self.broadcaster.publish(entry);
                    }
                }
                Err(error) => warn!(%error, "email log poll failed"),
            }
        }
    }
}
