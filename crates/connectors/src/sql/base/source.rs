use crate::{
    adapter::Adapter,
    error::AdapterError,
    sql::base::{adapter::DatabaseKind, error::DbError},
};
use model::records::batch::ExtractionBatch;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// A single shared database handle reused across ticks.
///
/// The handle is re-established lazily: `ensure_connected` replaces it when it
/// is missing or reported closed, and is the only place a reconnect happens.
pub struct SqlSource {
    kind: DatabaseKind,
    conn_str: String,
    adapter: RwLock<Option<Adapter>>,
}

impl SqlSource {
    /// Creates a source that connects on first use.
    pub fn new(kind: DatabaseKind, conn_str: impl Into<String>) -> Self {
        SqlSource {
            kind,
            conn_str: conn_str.into(),
            adapter: RwLock::new(None),
        }
    }

    pub async fn connect(kind: DatabaseKind, conn_str: impl Into<String>) -> Result<Self, AdapterError> {
        let source = SqlSource::new(kind, conn_str);
        source.ensure_connected().await?;
        Ok(source)
    }

    /// Opens a new connection when there is none or the current one is closed.
    /// Returns `true` when a new connection was made.
    pub async fn ensure_connected(&self) -> Result<bool, AdapterError> {
        {
            let guard = self.adapter.read().await;
            if let Some(adapter) = guard.as_ref() {
                if !adapter.get_sql().is_closed() {
                    return Ok(false);
                }
            }
        }

        let mut guard = self.adapter.write().await;
        if let Some(adapter) = guard.as_ref() {
            if !adapter.get_sql().is_closed() {
                return Ok(false);
            }
            warn!(kind = %self.kind, "Database connection closed, reconnecting");
        }

        let adapter = Adapter::sql(self.kind, &self.conn_str).await?;
        *guard = Some(adapter);
        info!(kind = %self.kind, "Database connection established");
        Ok(true)
    }

    pub async fn fetch(&self, sql: &str) -> Result<ExtractionBatch, DbError> {
        let guard = self.adapter.read().await;
        let adapter = guard.as_ref().ok_or(DbError::Closed)?;
        let rows = adapter.get_sql().query_rows(sql).await?;
        Ok(ExtractionBatch::new(rows))
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        let guard = self.adapter.read().await;
        let adapter = guard.as_ref().ok_or(DbError::Closed)?;
        adapter.get_sql().ping().await
    }
}
