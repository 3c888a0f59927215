use std::sync::Arc;

use mailsentry_core::{AppError, AppResult};
use mailsentry_domain::{EngineCall, EngineConfig, WorkflowAction};
use serde_json::Value;

use crate::bridge_ports::{EngineCallOutcome, EngineTransport};

/// Policy for interpreting the inbound bridge request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionParseMode {
    /// Empty, malformed, or action-less bodies mean an implicit status
    /// check, so clients can probe with a bare GET.
    #[default]
    Permissive,
    /// The body must be valid JSON carrying a recognized action.
    Strict,
}

impl ActionParseMode {
    /// Parses the configured mode name.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(AppError::Validation(format!(
                "BRIDGE_ACTION_PARSING must be either 'permissive' or 'strict', got '{other}'"
            ))),
        }
    }
}

/// Parsed bridge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowActionRequest {
    action: WorkflowAction,
}

impl WorkflowActionRequest {
    /// Interprets a raw request body according to the parse mode.
    ///
    /// A present but unrecognized `action` value is rejected in both
    /// modes; permissiveness only covers absent or unparseable input.
    pub fn parse(body: &[u8], mode: ActionParseMode) -> AppResult<Self> {
        let parsed: Result<Value, _> = serde_json::from_slice(body);

        let raw_action = match (mode, parsed) {
            (ActionParseMode::Permissive, Ok(value)) => value
                .get("action")
                .and_then(Value::as_str)
                .map(str::to_owned),
            (ActionParseMode::Permissive, Err(_)) => None,
            (ActionParseMode::Strict, Ok(value)) => Some(
                value
                    .get("action")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        AppError::Validation(
                            "request body requires string field 'action'".to_owned(),
                        )
                    })?,
            ),
            (ActionParseMode::Strict, Err(error)) => {
                return Err(AppError::Validation(format!(
                    "invalid JSON in request body: {error}"
                )));
            }
        };

        let action = match raw_action {
            Some(raw) => WorkflowAction::parse(&raw)?,
            None => WorkflowAction::Status,
        };

        Ok(Self { action })
    }

    /// Returns the requested action.
    #[must_use]
    pub fn action(&self) -> WorkflowAction {
        self.action
    }
}

/// Bridge between abstract dashboard actions and the engine's REST API.
///
/// Stateless across invocations: every call independently plans the
/// probe/primary/fallback sequence from the immutable configuration.
#[derive(Clone)]
pub struct WorkflowBridgeService {
    config: EngineConfig,
    transport: Arc<dyn EngineTransport>,
}

impl WorkflowBridgeService {
    /// Creates a bridge over a resolved configuration and transport.
    #[must_use]
    pub fn new(config: EngineConfig, transport: Arc<dyn EngineTransport>) -> Self {
        Self { config, transport }
    }

    /// Executes one abstract action and returns the engine's JSON payload.
    ///
    /// Attempt sequence: optional canonical-id probe, then the primary
    /// endpoint, then at most one fallback attempt. Upstream failures on
    /// the last attempt are terminal; transport failures never trigger
    /// the fallback.
    pub async fn execute(&self, action: WorkflowAction) -> AppResult<Value> {
        let dialect = self.config.dialect();
        let primary = dialect.primary_call(&self.config, action);
        let fallback = self.plan_fallback(action).await;

        let outcome = self.transport.execute(&primary).await?;
        if outcome.is_success() {
            return payload_from(&outcome, &primary);
        }

        let Some(fallback) = fallback else {
            return Err(upstream_error(&outcome, &primary));
        };

        let retried = self.transport.execute(&fallback).await?;
        if retried.is_success() {
            return payload_from(&retried, &fallback);
        }

        Err(upstream_error(&retried, &fallback))
    }

    /// Plans the fallback attempt before the primary call is issued.
    ///
    /// Toggles on a dialect with a fallback shape first probe the engine
    /// for its canonical workflow id; the configured id stands in when
    /// the probe yields nothing.
    async fn plan_fallback(&self, action: WorkflowAction) -> Option<EngineCall> {
        let dialect = self.config.dialect();
        if !dialect.has_fallback() {
            return None;
        }

        let canonical_id = if action.is_mutation() {
            self.probe_canonical_id()
                .await
                .unwrap_or_else(|| self.config.workflow_id().to_owned())
        } else {
            self.config.workflow_id().to_owned()
        };

        dialect.fallback_call(&self.config, action, &canonical_id)
    }

    /// Best-effort read of the engine's canonical workflow id.
    ///
    /// Every failure is swallowed; the id feeds fallback URL
    /// construction only and never affects correctness.
    async fn probe_canonical_id(&self) -> Option<String> {
        let call = self
            .config
            .dialect()
            .primary_call(&self.config, WorkflowAction::Status);
        let outcome = self.transport.execute(&call).await.ok()?;
        if !outcome.is_success() {
            return None;
        }

        let payload: Value = serde_json::from_str(&outcome.body).ok()?;
        match payload.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

fn payload_from(outcome: &EngineCallOutcome, call: &EngineCall) -> AppResult<Value> {
    serde_json::from_str(&outcome.body)
        .map_err(|_| AppError::upstream_format(&outcome.body, call.url.clone()))
}

fn upstream_error(outcome: &EngineCallOutcome, call: &EngineCall) -> AppError {
    AppError::upstream_status(
        outcome.status,
        &outcome.body,
        call.url.clone(),
        call.method.as_str(),
    )
}
