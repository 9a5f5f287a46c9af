use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("Collector base address is not set")]
    MissingBaseAddress,

    #[error("Invalid collector header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
