use connectors::{
    error::AdapterError, http::error::TransmitError, sql::base::error::DbError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Cursor file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cursor database error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Persisted cursor is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    Connect(#[from] AdapterError),

    #[error("Query failed: {0}")]
    Query(#[from] DbError),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Transmit failed: {0}")]
    Transmit(#[from] TransmitError),
}
