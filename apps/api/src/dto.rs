use mailsentry_domain::EmailLogEntry;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One sent-email log entry shaped for the dashboard.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/email-log-entry-response.ts"
)]
pub struct EmailLogEntryResponse {
    pub id: i64,
    pub recipient: String,
    pub email_type: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    #[ts(type = "Record<string, unknown> | null")]
    pub variables: Option<Value>,
    /// ISO 8601 date the email refers to.
    pub target_date: String,
    pub status: String,
    pub note: Option<String>,
    /// RFC 3339 send timestamp.
    pub sent_at: String,
}

impl From<EmailLogEntry> for EmailLogEntryResponse {
    fn from(entry: EmailLogEntry) -> Self {
        Self {
            id: entry.id,
            recipient: entry.recipient,
            email_type: entry.email_type,
            subject: entry.subject,
            body: entry.body,
            variables: entry.variables,
            target_date: entry.target_date.to_string(),
            status: entry.status,
            note: entry.note,
            sent_at: entry.sent_at.to_rfc3339(),
        }
    }
}
