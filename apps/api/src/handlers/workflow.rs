use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use mailsentry_application::WorkflowActionRequest;
use mailsentry_core::AppError;
use serde_json::Value;

use crate::error::ApiResult;
use crate::state::{AppState, WorkflowBridge};

/// Bridge entry point.
///
/// Accepts any method; the body optionally selects the action and an
/// absent body is an implicit status check under permissive parsing.
/// The engine's JSON payload is passed through verbatim on success.
pub async fn workflow_action_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let bridge = match &state.workflow_bridge {
        WorkflowBridge::Ready(bridge) => bridge,
        WorkflowBridge::Unconfigured(presence) => {
            return Err(AppError::Configuration(*presence).into());
        }
    };

    let request = WorkflowActionRequest::parse(&body, state.action_parse_mode)?;
    let payload = bridge.execute(request.action()).await?;

    Ok(Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use mailsentry_application::{ActionParseMode, EmailLogBroadcaster, EmailLogService};
    use mailsentry_core::EngineConfigPresence;
    use mailsentry_infrastructure::InMemoryEmailLogStore;

    use super::workflow_action_handler;
    use crate::state::{AppState, WorkflowBridge};

    fn unconfigured_state() -> AppState {
        let broadcaster = EmailLogBroadcaster::new(16);
        AppState {
            workflow_bridge: WorkflowBridge::Unconfigured(EngineConfigPresence {
                base_url: false,
                api_key: true,
                workflow_id: false,
            }),
            action_parse_mode: ActionParseMode::Permissive,
            email_log_service: EmailLogService::new(
                Arc::new(InMemoryEmailLogStore::new(broadcaster.clone())),
                broadcaster,
            ),
        }
    }

    #[tokio::test]
    async fn unconfigured_bridge_reports_missing_settings() {
        let result =
            workflow_action_handler(State(unconfigured_state()), Bytes::from_static(b"")).await;

        let response = match result {
            Err(error) => error.into_response(),
            Ok(_) => panic!("bridge without settings should fail"),
        };
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await;
        let payload: Option<serde_json::Value> =
            bytes.ok().and_then(|bytes| serde_json::from_slice(&bytes).ok());
        match payload {
            Some(payload) => {
                assert_eq!(payload["details"]["ENGINE_BASE_URL"], false);
                assert_eq!(payload["details"]["ENGINE_API_KEY"], true);
                assert_eq!(payload["details"]["ENGINE_WORKFLOW_ID"], false);
            }
            None => panic!("error payload should be JSON"),
        }
    }
}
