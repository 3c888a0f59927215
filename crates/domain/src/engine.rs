use mailsentry_core::{AppError, AppResult, EngineConfigPresence};
use serde_json::{Value, json};

use crate::workflow::WorkflowAction;

/// Environment variable naming the engine's base URL.
pub const ENGINE_BASE_URL_VAR: &str = "ENGINE_BASE_URL";

/// Environment variable naming the engine API key.
pub const ENGINE_API_KEY_VAR: &str = "ENGINE_API_KEY";

/// Environment variable naming the bridged workflow identifier.
pub const ENGINE_WORKFLOW_ID_VAR: &str = "ENGINE_WORKFLOW_ID";

/// HTTP verb of a planned engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMethod {
    /// Read without side effects.
    Get,
    /// Invoke a dedicated action endpoint.
    Post,
    /// Replace workflow fields on the legacy single-endpoint shape.
    Put,
}

impl EngineMethod {
    /// Returns the canonical method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

/// One planned outbound request against the automation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    /// HTTP method.
    pub method: EngineMethod,
    /// Absolute target URL.
    pub url: String,
    /// Optional JSON body.
    pub body: Option<Value>,
}

/// Versioned endpoint shape of the engine's REST API.
///
/// The engine's contract changed across versions; the dialect describes
/// which endpoint templates and verbs carry each action, so deployments
/// against either version are served by the same bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineDialect {
    /// Current API: dedicated activate/deactivate endpoints plus a
    /// legacy REST-style fallback shape.
    #[default]
    V1,
    /// Older single-endpoint shape toggled through PUT; no fallback.
    LegacyPut,
}

impl EngineDialect {
    /// Parses the configured dialect name.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "v1" => Ok(Self::V1),
            "legacy-put" => Ok(Self::LegacyPut),
            other => Err(AppError::Validation(format!(
                "ENGINE_API_DIALECT must be either 'v1' or 'legacy-put', got '{other}'"
            ))),
        }
    }

    /// Plans the primary call for one action.
    #[must_use]
    pub fn primary_call(&self, config: &EngineConfig, action: WorkflowAction) -> EngineCall {
        let base = config.base_url();
        let id = config.workflow_id();
        match (self, action) {
            (_, WorkflowAction::Status) => EngineCall {
                method: EngineMethod::Get,
                url: format!("{base}/api/v1/workflows/{id}"),
                body: None,
            },
            (Self::V1, toggle) => EngineCall {
                method: EngineMethod::Post,
                url: format!("{base}/api/v1/workflows/{id}/{}", toggle.as_str()),
                body: None,
            },
            (Self::LegacyPut, toggle) => EngineCall {
                method: EngineMethod::Put,
                url: format!("{base}/api/v1/workflows/{id}"),
                body: Some(json!({ "active": toggle == WorkflowAction::Activate })),
            },
        }
    }

    /// Plans the single fallback attempt, when the dialect has one.
    ///
    /// `canonical_id` is the engine's own identifier for the workflow,
    /// resolved best-effort by the caller; toggles address the legacy
    /// shape through it, while status reads keep the configured id.
    #[must_use]
    pub fn fallback_call(
        &self,
        config: &EngineConfig,
        action: WorkflowAction,
        canonical_id: &str,
    ) -> Option<EngineCall> {
        let base = config.base_url();
        match (self, action) {
            (Self::LegacyPut, _) => None,
            (Self::V1, WorkflowAction::Status) => Some(EngineCall {
                method: EngineMethod::Get,
                url: format!("{base}/rest/workflows/{}", config.workflow_id()),
                body: None,
            }),
            (Self::V1, toggle) => Some(EngineCall {
                method: EngineMethod::Post,
                url: format!("{base}/rest/workflows/{canonical_id}/{}", toggle.as_str()),
                body: None,
            }),
        }
    }

    /// Returns true when the dialect defines a fallback shape.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        matches!(self, Self::V1)
    }
}

/// Immutable engine connection settings, resolved once at process start.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    base_url: String,
    api_key: String,
    workflow_id: String,
    dialect: EngineDialect,
}

impl EngineConfig {
    /// Creates a config from already-validated parts.
    ///
    /// The base URL is normalized by stripping trailing slashes so path
    /// concatenation never produces doubled separators.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        workflow_id: impl Into<String>,
        dialect: EngineDialect,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_key: api_key.into(),
            workflow_id: workflow_id.into(),
            dialect,
        }
    }

    /// Resolves the three required settings through `lookup`.
    ///
    /// Blank values count as absent. On failure the presence flags
    /// describe exactly which settings were found; values never leak.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        dialect: EngineDialect,
    ) -> Result<Self, EngineConfigPresence> {
        let base_url = non_blank(lookup(ENGINE_BASE_URL_VAR));
        let api_key = non_blank(lookup(ENGINE_API_KEY_VAR));
        let workflow_id = non_blank(lookup(ENGINE_WORKFLOW_ID_VAR));

        let presence = EngineConfigPresence {
            base_url: base_url.is_some(),
            api_key: api_key.is_some(),
            workflow_id: workflow_id.is_some(),
        };

        match (base_url, api_key, workflow_id) {
            (Some(base_url), Some(api_key), Some(workflow_id)) => {
                Ok(Self::new(base_url, api_key, workflow_id, dialect))
            }
            _ => Err(presence),
        }
    }

    /// Returns the normalized base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns the engine API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    /// Returns the configured workflow identifier.
    #[must_use]
    pub fn workflow_id(&self) -> &str {
        self.workflow_id.as_str()
    }

    /// Returns the configured endpoint-shape dialect.
    #[must_use]
    pub fn dialect(&self) -> EngineDialect {
        self.dialect
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_owned()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
