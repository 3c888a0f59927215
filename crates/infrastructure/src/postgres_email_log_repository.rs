use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mailsentry_application::EmailLogRepository;
use mailsentry_core::{AppError, AppResult};
use mailsentry_domain::EmailLogEntry;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed read model over the `email_logs` table.
///
/// The table is owned and written by the external sender system; this
/// repository never writes to it.
#[derive(Clone)]
pub struct PostgresEmailLogRepository {
    pool: PgPool,
}

impl PostgresEmailLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the highest row id, or zero for an empty table.
    pub async fn latest_id(&self) -> AppResult<i64> {
        let (latest,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(id), 0) FROM email_logs")
                .fetch_one(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to read email log watermark: {error}"))
                })?;

        Ok(latest)
    }

    /// Lists entries inserted after `id`, oldest first, bounded by `limit`.
    pub async fn list_after(&self, id: i64, limit: usize) -> AppResult<Vec<EmailLogEntry>> {
        let rows = sqlx::query_as::<_, EmailLogRow>(
            r#"
            SELECT id, recipient, email_type, subject, body, variables,
                   target_date, status, note, sent_at
            FROM email_logs
            WHERE id > $1
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list fresh email log entries: {error}"))
        })?;

        Ok(rows.into_iter().map(EmailLogEntry::from).collect())
    }
}

#[derive(Debug, FromRow)]
struct EmailLogRow {
    id: i64,
    recipient: String,
    email_type: Option<String>,
    subject: Option<String>,
    body: Option<String>,
    variables: Option<serde_json::Value>,
    target_date: NaiveDate,
    status: String,
    note: Option<String>,
    sent_at: DateTime<Utc>,
}

impl From<EmailLogRow> for EmailLogEntry {
    fn from(row: EmailLogRow) -> Self {
        Self {
            id: row.id,
            recipient: row.recipient,
            email_type: row.email_type,
            subject: row.subject,
            body: row.body,
            variables: row.variables,
            target_date: row.target_date,
            status: row.status,
            note: row.note,
            sent_at: row.sent_at,
        }
    }
}

#[async_trait]
impl EmailLogRepository for PostgresEmailLogRepository {
    async fn list_recent(&self, limit: usize) -> AppResult<Vec<EmailLogEntry>> {
        let capped_limit = limit.clamp(1, 200) as i64;
        let rows = sqlx::query_as::<_, EmailLogRow>(
            r#"
            SELECT id, recipient, email_type, subject, body, variables,
                   target_date, status, note, sent_at
            FROM email_logs
            ORDER BY sent_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(capped_limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list email log entries: {error}"))
        })?;

        Ok(rows.into_iter().map(EmailLogEntry::from).collect())
    }
}
