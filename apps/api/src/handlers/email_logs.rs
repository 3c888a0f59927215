use std::convert::Infallible;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use mailsentry_domain::EmailLogEntry;
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::dto::EmailLogEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailLogListQueryRequest {
    pub limit: Option<usize>,
}

/// Returns the most recent log entries, newest first.
pub async fn list_email_logs_handler(
    State(state): State<AppState>,
    Query(query): Query<EmailLogListQueryRequest>,
) -> ApiResult<Json<Vec<EmailLogEntryResponse>>> {
    let entries = state
        .email_log_service
        .list_recent(query.limit)
        .await?
        .into_iter()
        .map(EmailLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

/// Streams newly observed log entries as server-sent events.
pub async fn stream_email_logs_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.email_log_service.subscribe();
    Sse::new(email_log_event_stream(receiver)).keep_alive(KeepAlive::default())
}

fn email_log_event_stream(
    receiver: broadcast::Receiver<EmailLogEntry>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(entry) => {
                    let event = Event::default()
                        .event("email_log")
                        .json_data(EmailLogEntryResponse::from(entry));
                    match event {
                        Ok(event) => return Some((Ok(event), receiver)),
                        // An unserializable entry drops the event, not the stream.
                        Err(_) => continue,
                    }
                }
                // Lagged subscribers skip ahead instead of disconnecting.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use futures::StreamExt;
    use mailsentry_application::EmailLogBroadcaster;
    use mailsentry_domain::EmailLogEntry;

    use super::email_log_event_stream;

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
    async fn stream_yields_published_entries_and_ends_when_closed() {
        let broadcaster = EmailLogBroadcaster::new(16);
        let mut stream = Box::pin(email_log_event_stream(broadcaster.subscribe()));

        broadcaster.publish(entry(1));
        broadcaster.publish(entry(2));
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_some());

        drop(broadcaster);
        assert!(stream.next().await.is_none());
    }
}
