use crate::sql::{
    base::{
        adapter::SqlAdapter,
        error::{ConnectorError, DbError},
        row::DbRow,
    },
    postgres::utils::connect_client,
};
use async_trait::async_trait;
use model::records::row::RowData;
use std::sync::Arc;
use tokio_postgres::Client;

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<Client>,
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = Arc::new(connect_client(url).await?);
        Ok(PgAdapter { client })
    }

    async fn query_rows(&self, sql: &str) -> Result<Vec<RowData>, DbError> {
        if self.client.is_closed() {
            return Err(DbError::Closed);
        }

        let rows = self.client.query(sql, &[]).await?;
        Ok(rows
            .iter()
            .map(|row| DbRow::PostgresRow(row).to_row_data())
            .collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        let row = self.client.query_one("SELECT 1", &[]).await?;
        let val: i32 = row.try_get(0)?;
        if val != 1 {
            return Err(DbError::Unknown(format!(
                "Ping returned unexpected result: {val}"
            )));
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.client.is_closed()
    }
}
