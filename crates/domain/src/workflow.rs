use mailsentry_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Abstract control action accepted by the workflow bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowAction {
    /// Pure read of the workflow's active state.
    Status,
    /// Turns the workflow on.
    Activate,
    /// Turns the workflow off.
    Deactivate,
}

impl WorkflowAction {
    /// Parses the wire value of the `action` field.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "status" => Ok(Self::Status),
            "activate" => Ok(Self::Activate),
            "deactivate" => Ok(Self::Deactivate),
            other => Err(AppError::Validation(format!(
                "action must be one of 'status', 'activate', 'deactivate', got '{other}'"
            ))),
        }
    }

    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }

    /// Returns true for actions that change engine state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Status)
    }
}
