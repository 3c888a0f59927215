use async_trait::async_trait;
use mailsentry_core::AppResult;
use mailsentry_domain::EngineCall;

/// Outcome of one engine call as seen by the bridge.
#[derive(Debug, Clone)]
pub struct EngineCallOutcome {
    /// HTTP status code returned by the engine.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl EngineCallOutcome {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport port executing planned engine calls.
///
/// Implementations inject the engine credentials and bound each call
/// with the configured timeout. Transport-level failures (connection,
/// timeout) surface as `AppError::Internal`; non-success statuses are a
/// regular outcome for the bridge to interpret.
#[async_trait]
pub trait EngineTransport: Send + Sync {
    /// Executes one planned call and returns the raw outcome.
    async fn execute(&self, call: &EngineCall) -> AppResult<EngineCallOutcome>;
}
