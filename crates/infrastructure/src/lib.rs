//! Infrastructure adapters for Mailsentry's external collaborators.

#![forbid(unsafe_code)]

mod http_engine_transport;
mod in_memory_email_log_store;
mod postgres_email_log_poller;
mod postgres_email_log_repository;

pub use http_engine_transport::HttpEngineTransport;
pub use in_memory_email_log_store::InMemoryEmailLogStore;
pub use postgres_email_log_poller::PostgresEmailLogPoller;
pub use postgres_email_log_repository::PostgresEmailLogRepository;
