use connectors::{error::AdapterError, sql::base::error::DbError};
use engine_config::error::SettingsError;
use engine_core::error::StateStoreError;
use engine_runtime::error::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load options: {0}")]
    Settings(#[from] SettingsError),

    #[error("Forwarder failed: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Cursor store error: {0}")]
    State(#[from] StateStoreError),

    #[error("Connection failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}
