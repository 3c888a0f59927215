use mailsentry_application::{ActionParseMode, EmailLogService, WorkflowBridgeService};
use mailsentry_core::EngineConfigPresence;

/// Bridge availability, resolved once at startup.
///
/// Incomplete engine settings keep the process alive; the bridge route
/// reports which keys are missing instead of the server crashing.
#[derive(Clone)]
pub enum WorkflowBridge {
    /// Engine settings were complete; the bridge is operational.
    Ready(WorkflowBridgeService),
    /// Required engine settings were missing.
    Unconfigured(EngineConfigPresence),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub workflow_bridge: WorkflowBridge,
    pub action_parse_mode: ActionParseMode,
    pub email_log_service: EmailLogService,
}
