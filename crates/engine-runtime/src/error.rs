use connectors::{error::AdapterError, http::error::TransmitError};
use engine_config::error::SettingsError;
use engine_core::error::{SinkError, SourceError, StateStoreError};
use planner::error::QueryBuildError;
use thiserror::Error;

/// Why a single tick did not complete. None of these stop the loop.
#[derive(Debug, Error)]
pub enum TickError {
    /// The query could not be assembled. Retried unchanged on the next tick.
    #[error("Configuration error: {0}")]
    Configuration(#[from] QueryBuildError),

    /// Connecting or querying failed. Cursor and backoff are untouched.
    #[error("Data source error: {0}")]
    DataSource(#[from] SourceError),

    /// The payload never reached the collector.
    #[error("Delivery error: {0}")]
    Delivery(#[from] SinkError),

    #[error("Collector answered with status {status}")]
    Rejected { status: u16 },

    /// Delivery succeeded but the cursor could not be written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StateStoreError),
}

/// Errors raised while assembling or driving the forwarder.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Collector setup failed: {0}")]
    Transmit(#[from] TransmitError),

    #[error("Cursor store error: {0}")]
    State(#[from] StateStoreError),

    /// Usually means a runtime task was cancelled or panicked.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Mailbox closed")]
    MailboxClosed,

    #[error("Mailbox full")]
    MailboxFull,
}
