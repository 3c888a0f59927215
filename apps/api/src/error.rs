use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mailsentry_core::AppError;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown | null", optional)]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    method: Option<String>,
}

impl ErrorResponse {
    fn message(error: &AppError) -> Self {
        Self {
            error: error.to_string(),
            details: None,
            url: None,
            method: None,
        }
    }
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = ErrorResponse::message(&self.0);

        let (status, payload) = match self.0 {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::Configuration(presence) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    details: Some(serde_json::to_value(presence).unwrap_or(Value::Null)),
                    ..message
                },
            ),
            AppError::UpstreamStatus {
                ref details,
                ref url,
                ref method,
                ..
            } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    details: Some(Value::String(details.clone())),
                    url: Some(url.clone()),
                    method: Some(method.clone()),
                    ..message
                },
            ),
            AppError::UpstreamFormat {
                ref details,
                ref url,
            } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    details: Some(Value::String(details.clone())),
                    url: Some(url.clone()),
                    ..message
                },
            ),
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use mailsentry_core::{AppError, EngineConfigPresence};

    use super::ApiError;

    fn status_for(error: AppError) -> StatusCode {
        ApiError(error).into_response().status()
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(
            status_for(AppError::Validation("bad input".to_owned())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn configuration_errors_are_internal() {
        let presence = EngineConfigPresence {
            base_url: false,
            api_key: true,
            workflow_id: true,
        };
        assert_eq!(
            status_for(AppError::Configuration(presence)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_failures_are_bad_gateways() {
        assert_eq!(
            status_for(AppError::upstream_status(500, "down", "http://e", "POST")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(AppError::upstream_format("<html>", "http://e")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn configuration_payload_carries_presence_booleans() {
        let presence = EngineConfigPresence {
            base_url: true,
            api_key: false,
            workflow_id: true,
        };
        let response = ApiError(AppError::Configuration(presence)).into_response();

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await;
        let payload: Option<serde_json::Value> =
            bytes.ok().and_then(|bytes| serde_json::from_slice(&bytes).ok());

        match payload {
            Some(payload) => {
                assert_eq!(payload["details"]["ENGINE_BASE_URL"], true);
                assert_eq!(payload["details"]["ENGINE_API_KEY"], false);
                assert_eq!(payload["details"]["ENGINE_WORKFLOW_ID"], true);
            }
            None => panic!("error payload should be JSON"),
        }
    }
}
