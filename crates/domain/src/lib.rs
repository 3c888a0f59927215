//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod email_log;
mod engine;
mod workflow;

pub use email_log::EmailLogEntry;
pub use engine::{
    ENGINE_API_KEY_VAR, ENGINE_BASE_URL_VAR, ENGINE_WORKFLOW_ID_VAR, EngineCall, EngineConfig,
    EngineDialect, EngineMethod,
};
pub use workflow::WorkflowAction;
