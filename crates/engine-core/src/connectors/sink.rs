use crate::error::SinkError;
use async_trait::async_trait;
use connectors::http::collector::HttpCollector;

/// Delivers one formatted payload and reports the response status.
///
/// Only transport faults are errors; a non-success status is returned as is.
#[async_trait]
pub trait Transmitter: Send + Sync {
    async fn send(&self, payload: String) -> Result<u16, SinkError>;
}

#[async_trait]
impl Transmitter for HttpCollector {
    async fn send(&self, payload: String) -> Result<u16, SinkError> {
        let status = HttpCollector::send(self, payload).await?;
        Ok(status.as_u16())
    }
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
