//! Application services and ports.

#![forbid(unsafe_code)]

mod bridge_ports;
mod bridge_service;
mod email_log_ports;
mod email_log_service;

pub use bridge_ports::{EngineCallOutcome, EngineTransport};
pub use bridge_service::{ActionParseMode, WorkflowActionRequest, WorkflowBridgeService};
pub use email_log_ports::{EmailLogBroadcaster, EmailLogRepository};
pub use email_log_service::{EMAIL_LOG_LIST_LIMIT, EmailLogService};
