use async_trait::async_trait;
use mailsentry_application::{EngineCallOutcome, EngineTransport};
use mailsentry_core::{AppError, AppResult};
use mailsentry_domain::{EngineCall, EngineMethod};
use tracing::debug;

/// Vendor header carrying the engine API key.
const ENGINE_API_KEY_HEADER: &str = "X-Automation-Api-Key";

/// HTTP transport executing planned engine calls.
///
/// The API key rides on both the vendor header and a bearer token,
/// covering the auth schemes accepted across engine deployments.
#[derive(Clone)]
pub struct HttpEngineTransport {
    http_client: reqwest::Client,
    api_key: String,
}

impl HttpEngineTransport {
    /// Creates a transport around a prebuilt client.
    ///
    /// The client's timeout bounds every call; the bridge sets no
    /// per-request deadline of its own.
    #[must_use]
    pub fn new(http_client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
        }
    }

    fn request_builder(&self, call: &EngineCall) -> reqwest::RequestBuilder {
        let method = match call.method {
            EngineMethod::Get => reqwest::Method::GET,
            EngineMethod::Post => reqwest::Method::POST,
            EngineMethod::Put => reqwest::Method::PUT,
        };

        let mut builder = self
            .http_client
            .request(method, call.url.as_str())
            .header(ENGINE_API_KEY_HEADER, self.api_key.as_str())
            .bearer_auth(self.api_key.as_str());

        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        builder
    }
}

#[async_trait]
impl EngineTransport for HttpEngineTransport {
    async fn execute(&self, call: &EngineCall) -> AppResult<EngineCallOutcome> {
        let response = self.request_builder(call).send().await.map_err(|error| {
            AppError::Internal(format!("engine request to {} failed: {error}", call.url))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read engine response from {}: {error}",
                call.url
            ))
        })?;

        debug!(
            url = %call.url,
            method = call.method.as_str(),
            status,
            "engine call completed"
        );

        Ok(EngineCallOutcome { status, body })
    }
}
