use crate::sql::base::{
    adapter::SqlAdapter,
    error::{ConnectorError, DbError},
    row::DbRow,
};
use async_trait::async_trait;
use model::records::row::RowData;
use mysql_async::{Opts, Pool, Row, prelude::Queryable};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::warn;

#[derive(Clone)]
pub struct MySqlAdapter {
    pool: Pool,
    closed: Arc<AtomicBool>,
}

impl MySqlAdapter {
    fn observe(&self, err: mysql_async::Error) -> DbError {
        // io and driver faults leave the pooled connection unusable
        if matches!(err, mysql_async::Error::Io(_) | mysql_async::Error::Driver(_)) {
            warn!(%err, "MySQL connection marked closed");
            self.closed.store(true, Ordering::SeqCst);
        }
        DbError::MySql(err)
    }
}

#[async_trait]
impl SqlAdapter for MySqlAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let opts = Opts::from_url(url).map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        let pool = Pool::new(opts);

        // fail fast on bad credentials instead of on the first tick
        let conn = pool.get_conn().await?;
        drop(conn);

        Ok(MySqlAdapter {
            pool,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    async fn query_rows(&self, sql: &str) -> Result<Vec<RowData>, DbError> {
        if self.is_closed() {
            return Err(DbError::Closed);
        }

        let mut conn = self.pool.get_conn().await.map_err(|e| self.observe(e))?;
        let rows: Vec<Row> = conn.query(sql).await.map_err(|e| self.observe(e))?;

        Ok(rows
            .iter()
            .map(|row| DbRow::MySqlRow(row).to_row_data())
            .collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get_conn().await.map_err(|e| self.observe(e))?;
        conn.ping().await.map_err(|e| self.observe(e))?;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
