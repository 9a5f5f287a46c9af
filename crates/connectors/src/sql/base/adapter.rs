use crate::sql::base::error::{ConnectorError, DbError};
use async_trait::async_trait;
use model::records::row::RowData;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[serde(alias = "mariadb")]
    MySql,
    #[default]
    #[serde(alias = "pg", alias = "postgresql")]
    Postgres,
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseKind::MySql),
            "pg" | "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            other => Err(format!("Unknown database kind: {other}")),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::MySql => write!(f, "MySQL"),
            DatabaseKind::Postgres => write!(f, "Postgres"),
        }
    }
}

#[async_trait]
pub trait SqlAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError>
    where
        Self: Sized;

    /// Runs a plain-text query and returns its rows in result order.
    async fn query_rows(&self, sql: &str) -> Result<Vec<RowData>, DbError>;

    /// Round-trips a trivial statement to prove the connection is usable.
    async fn ping(&self) -> Result<(), DbError>;

    /// True once the underlying connection is known to be unusable.
    fn is_closed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_database_kind_aliases() {
        assert_eq!("MariaDB".parse::<DatabaseKind>(), Ok(DatabaseKind::MySql));
        assert_eq!("pg".parse::<DatabaseKind>(), Ok(DatabaseKind::Postgres));
        assert!("oracle".parse::<DatabaseKind>().is_err());
    }
}
