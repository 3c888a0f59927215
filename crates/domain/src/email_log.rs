use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One sent-email log entry produced by the external sender system.
///
/// Entries are created by the automation pipeline and only ever read
/// here; the dashboard never mutates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    /// Monotonic row identifier assigned by the log store.
    pub id: i64,
    /// Recipient address.
    pub recipient: String,
    /// Sender-defined category, when provided.
    pub email_type: Option<String>,
    /// Subject line, when captured.
    pub subject: Option<String>,
    /// Rendered body, when captured.
    pub body: Option<String>,
    /// Template variables captured at send time.
    pub variables: Option<Value>,
    /// Date the email refers to.
    pub target_date: NaiveDate,
    /// Delivery status reported by the sender.
    pub status: String,
    /// Free-form operator note.
    pub note: Option<String>,
    /// Moment the email was sent.
    pub sent_at: DateTime<Utc>,
}
