use std::sync::Arc;

use mailsentry_core::AppResult;
use mailsentry_domain::EmailLogEntry;
use tokio::sync::broadcast;

use crate::email_log_ports::{EmailLogBroadcaster, EmailLogRepository};

/// Upper bound on log entries served to the dashboard per request.
pub const EMAIL_LOG_LIST_LIMIT: usize = 50;

/// Read service over the sent-email log.
#[derive(Clone)]
pub struct EmailLogService {
    repository: Arc<dyn EmailLogRepository>,
    broadcaster: EmailLogBroadcaster,
}

impl EmailLogService {
    /// Creates a service over a repository and the insert feed.
    #[must_use]
    pub fn new(repository: Arc<dyn EmailLogRepository>, broadcaster: EmailLogBroadcaster) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// Lists the most recent entries, newest first, bounded to
    /// [`EMAIL_LOG_LIST_LIMIT`].
    pub async fn list_recent(&self, limit: Option<usize>) -> AppResult<Vec<EmailLogEntry>> {
        let limit = limit
            .unwrap_or(EMAIL_LOG_LIST_LIMIT)
            .clamp(1, EMAIL_LOG_LIST_LIMIT);
        self.repository.list_recent(limit).await
    }

    /// Opens a live subscription over newly observed entries.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EmailLogEntry> {
        self.broadcaster.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tokio::sync::Mutex;

    use mailsentry_core::AppResult;
    use mailsentry_domain::EmailLogEntry;

    use super::{EMAIL_LOG_LIST_LIMIT, EmailLogBroadcaster, EmailLogRepository, EmailLogService};

    #[derive(Default)]
    struct LimitRecordingRepository {
        requested_limits: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl EmailLogRepository for LimitRecordingRepository {
        async fn list_recent(&self, limit: usize) -> AppResult<Vec<EmailLogEntry>> {
            self.requested_limits.lock().await.push(limit);
            Ok(Vec::new())
        }
    }

    fn entry(id: i64) -> EmailLogEntry {
        EmailLogEntry {
            id,
            recipient: format!("user-{id}@example.com"),
            email_type: None,
            subject: None,
            body: None,
            variables: None,
            target_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
            status: "sent".to_owned(),
            note: None,
            sent_at: Utc.timestamp_opt(1_717_200_000 + id, 0).single().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn list_limit_is_clamped_to_the_dashboard_bound() {
        let repository = Arc::new(LimitRecordingRepository::default());
        let service = EmailLogService::new(repository.clone(), EmailLogBroadcaster::new(16));

        assert!(service.list_recent(None).await.is_ok());
        assert!(service.list_recent(Some(500)).await.is_ok());
        assert!(service.list_recent(Some(0)).await.is_ok());
        assert!(service.list_recent(Some(10)).await.is_ok());

        let limits = repository.requested_limits.lock().await.clone();
        assert_eq!(limits, vec![EMAIL_LOG_LIST_LIMIT, EMAIL_LOG_LIST_LIMIT, 1, 10]);
    }

    #[tokio::test]
    async fn subscribers_receive_published_entries_in_order() {
        let broadcaster = EmailLogBroadcaster::new(16);
        let service = EmailLogService::new(
            Arc::new(LimitRecordingRepository::default()),
            broadcaster.clone(),
        );

        let mut receiver = service.subscribe();
        broadcaster.publish(entry(1));
        broadcaster.publish(entry(2));
        broadcaster.publish(entry(3));

        for expected in 1..=3 {
            let received = receiver.recv().await;
            assert_eq!(received.ok().map(|entry| entry.id), Some(expected));
        }
    }
}
