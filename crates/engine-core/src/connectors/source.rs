use crate::error::SourceError;
use async_trait::async_trait;
use connectors::sql::base::source::SqlSource;
use model::records::batch::ExtractionBatch;

/// Where extraction queries run.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Re-establishes the connection if it was lost. Returns `true` on reconnect.
    async fn ensure_connected(&self) -> Result<bool, SourceError>;

    async fn execute_query(&self, sql: &str) -> Result<ExtractionBatch, SourceError>;
}

#[async_trait]
impl DataSource for SqlSource {
    async fn ensure_connected(&self) -> Result<bool, SourceError> {
        Ok(SqlSource::ensure_connected(self).await?)
    }

    async fn execute_query(&self, sql: &str) -> Result<ExtractionBatch, SourceError> {
        Ok(self.fetch(sql).await?)
    }
}
