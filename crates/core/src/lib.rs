//! Shared primitives for all Rust crates in Mailsentry.

#![forbid(unsafe_code)]

use serde::Serialize;
use thiserror::Error;

/// Result type used across Mailsentry crates.
pub type AppResult<T> = Result<T, AppError>;

/// Upper bound on upstream response excerpts carried in error payloads.
pub const UPSTREAM_DETAILS_MAX_CHARS: usize = 500;

/// Presence flags for the required workflow engine settings.
///
/// Serialized into configuration error payloads under the environment
/// variable names. Carries booleans only, never the values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineConfigPresence {
    /// Whether `ENGINE_BASE_URL` was set and non-blank.
    #[serde(rename = "ENGINE_BASE_URL")]
    pub base_url: bool,

    /// Whether `ENGINE_API_KEY` was set and non-blank.
    #[serde(rename = "ENGINE_API_KEY")]
    pub api_key: bool,

    /// Whether `ENGINE_WORKFLOW_ID` was set and non-blank.
    #[serde(rename = "ENGINE_WORKFLOW_ID")]
    pub workflow_id: bool,
}

impl EngineConfigPresence {
    /// Returns true when every required setting is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.base_url && self.api_key && self.workflow_id
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Required workflow engine settings are missing.
    #[error("missing workflow engine configuration")]
    Configuration(EngineConfigPresence),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Engine returned a non-success status on every attempted endpoint.
    #[error("workflow engine returned {status}")]
    UpstreamStatus {
        /// HTTP status code of the failing engine response.
        status: u16,
        /// Engine response body, bounded by [`UPSTREAM_DETAILS_MAX_CHARS`].
        details: String,
        /// URL of the attempt that produced the terminal failure.
        url: String,
        /// HTTP method of the failing attempt.
        method: String,
    },

    /// Engine answered with a success status but a non-JSON body.
    #[error("workflow engine returned a non-JSON response")]
    UpstreamFormat {
        /// Engine response body, bounded by [`UPSTREAM_DETAILS_MAX_CHARS`].
        details: String,
        /// URL of the attempt that produced the malformed payload.
        url: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an upstream status error with bounded details.
    #[must_use]
    pub fn upstream_status(
        status: u16,
        body: &str,
        url: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self::UpstreamStatus {
            status,
            details: truncate_details(body),
            url: url.into(),
            method: method.into(),
        }
    }

    /// Builds an upstream format error with bounded details.
    #[must_use]
    pub fn upstream_format(body: &str, url: impl Into<String>) -> Self {
        Self::UpstreamFormat {
            details: truncate_details(body),
            url: url.into(),
        }
    }
}

/// Truncates an upstream response excerpt to the bounded payload size.
#[must_use]
pub fn truncate_details(details: &str) -> String {
    details.chars().take(UPSTREAM_DETAILS_MAX_CHARS).collect()
}
