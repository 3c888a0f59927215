//! Mailsentry API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{any, get};
use mailsentry_application::{
    ActionParseMode, EmailLogBroadcaster, EmailLogRepository, EmailLogService,
    WorkflowBridgeService,
};
use mailsentry_core::AppError;
use mailsentry_domain::{EngineConfig, EngineDialect};
use mailsentry_infrastructure::{
    HttpEngineTransport, InMemoryEmailLogStore, PostgresEmailLogPoller, PostgresEmailLogRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::state::{AppState, WorkflowBridge};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let action_parse_mode = match env::var("BRIDGE_ACTION_PARSING") {
        Ok(value) => ActionParseMode::parse(&value)?,
        Err(_) => ActionParseMode::default(),
    };
    let dialect = match env::var("ENGINE_API_DIALECT") {
        Ok(value) => EngineDialect::parse(&value)?,
        Err(_) => EngineDialect::default(),
    };
    let engine_timeout_secs = env::var("ENGINE_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(15);

    let workflow_bridge = build_workflow_bridge(dialect, engine_timeout_secs)?;

    let broadcaster = EmailLogBroadcaster::new(256);
    let email_log_repository = build_email_log_repository(&broadcaster).await?;
    let email_log_service = EmailLogService::new(email_log_repository, broadcaster);

    let app_state = AppState {
        workflow_bridge,
        action_parse_mode,
        email_log_service,
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-automation-api-key"),
        ]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/workflow",
            any(handlers::workflow::workflow_action_handler),
        )
        .route(
            "/api/email-logs",
            get(handlers::email_logs::list_email_logs_handler),
        )
        .route(
            "/api/email-logs/stream",
            get(handlers::email_logs::stream_email_logs_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "mailsentry-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

/// Resolves the engine settings and builds the bridge.
///
/// Incomplete settings are kept as data so the bridge route can answer
/// with the missing keys instead of the process refusing to start.
fn build_workflow_bridge(
    dialect: EngineDialect,
    timeout_secs: u64,
) -> Result<WorkflowBridge, AppError> {
    match EngineConfig::resolve(|name| env::var(name).ok(), dialect) {
        Ok(config) => {
            Url::parse(config.base_url()).map_err(|error| {
                AppError::Validation(format!("invalid ENGINE_BASE_URL: {error}"))
            })?;

            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            let transport = Arc::new(HttpEngineTransport::new(http_client, config.api_key()));

            Ok(WorkflowBridge::Ready(WorkflowBridgeService::new(
                config, transport,
            )))
        }
        Err(presence) => {
            warn!(
                ?presence,
                "engine settings incomplete; bridge requests will report the missing keys"
            );
            Ok(WorkflowBridge::Unconfigured(presence))
        }
    }
}

/// Builds the configured email log store and starts its insert feed.
async fn build_email_log_repository(
    broadcaster: &EmailLogBroadcaster,
) -> Result<Arc<dyn EmailLogRepository>, AppError> {
    let store_mode = env::var("EMAIL_LOG_STORE").unwrap_or_else(|_| "postgres".to_owned());

    match store_mode.as_str() {
        "postgres" => {
            let database_url = required_env("DATABASE_URL")?;
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            let repository = PostgresEmailLogRepository::new(pool);
            let poll_interval_ms = env::var("EMAIL_LOG_POLL_INTERVAL_MS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(2_000);
            let poller = PostgresEmailLogPoller::new(
                repository.clone(),
                broadcaster.clone(),
                Duration::from_millis(poll_interval_ms),
            );
            tokio::spawn(poller.run());

            Ok(Arc::new(repository))
        }
        "memory" => Ok(Arc::new(InMemoryEmailLogStore::new(broadcaster.clone()))),
        other => Err(AppError::Validation(format!(
            "EMAIL_LOG_STORE must be either 'postgres' or 'memory', got '{other}'"
        ))),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
