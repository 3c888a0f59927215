use async_trait::async_trait;
use mailsentry_application::{EmailLogBroadcaster, EmailLogRepository};
use mailsentry_core::AppResult;
use mailsentry_domain::EmailLogEntry;
use tokio::sync::Mutex;

/// In-memory email log store for development and tests.
pub struct InMemoryEmailLogStore {
    entries: Mutex<Vec<EmailLogEntry>>,
    broadcaster: EmailLogBroadcaster,
}

impl InMemoryEmailLogStore {
    /// Creates an empty store publishing appends to `broadcaster`.
    #[must_use]
    pub fn new(broadcaster: EmailLogBroadcaster) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            broadcaster,
        }
    }

    /// Appends one entry and publishes it to subscribers.
    pub async fn append(&self, entry: EmailLogEntry) {
        self.entries.lock().await.push(entry.clone());
        self.broadcaster.publish(entry);
    }
}

#[async_trait]
impl EmailLogRepository for InMemoryEmailLogStore {
    async fn list_recent(&self, limit: usize) -> AppResult<Vec<EmailLogEntry>> {
        let entries = self.entries.lock().await;
        let mut recent: Vec<EmailLogEntry> = entries.clone();
        recent.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        recent.truncate(limit);
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use mailsentry_application::{EmailLogBroadcaster, EmailLogRepository};
    use mailsentry_domain::EmailLogEntry;

    use super::InMemoryEmailLogStore;

    fn entry(id: i64, sent_offset_secs: i64) -> EmailLogEntry {
        EmailLogEntry {
            id,
            recipient: format!("user-{id}@example.com"),
            email_type: Some("reminder".to_owned()),
            subject: Some("Upcoming deadline".to_owned()),
            body: None,
            variables: None,
            target_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
            status: "sent".to_owned(),
            note: None,
            sent_at: Utc
                .timestamp_opt(1_717_200_000 + sent_offset_secs, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn list_recent_returns_newest_first_and_bounded() {
        let store = InMemoryEmailLogStore::new(EmailLogBroadcaster::new(16));
        for id in 1..=5 {
            store.append(entry(id, id * 60)).await;
        }

        let listed = store.list_recent(3).await;
        let ids: Option<Vec<i64>> =
            listed.ok().map(|entries| entries.iter().map(|entry| entry.id).collect());
        assert_eq!(ids, Some(vec![5, 4, 3]));
    }

    #[tokio::test]
    async fn append_publishes_to_subscribers() {
        let broadcaster = EmailLogBroadcaster::new(16);
        let store = InMemoryEmailLogStore::new(broadcaster.clone());

        let mut receiver = broadcaster.subscribe();
        store.append(entry(9, 0)).await;

        let received = receiver.recv().await;
        assert_eq!(received.ok().map(|entry| entry.id), Some(9));
    }
}
