use crate::sql::mysql::data_type::MySqlColumnDataType;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use model::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use mysql_async::{Row as MySqlRow, prelude::FromValue};
use std::{fmt::Display, str::FromStr};
use tokio_postgres::{
    Row as PgRow,
    types::{FromSql, Json as PgJson},
};
use tracing::warn;
use uuid::Uuid;

pub enum DbRow<'a> {
    MySqlRow(&'a MySqlRow),
    PostgresRow(&'a PgRow),
}

impl DbRow<'_> {
    pub fn to_row_data(&self) -> RowData {
        let field_values = match self {
            DbRow::PostgresRow(row) => row
                .columns()
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let type_name = column.type_().name();
                    let data_type = DataType::from_postgres_type(type_name).unwrap_or_else(|_| {
                        warn!("Unknown column type: {}", type_name);
                        DataType::Custom(type_name.to_string())
                    });
                    let value = pg_value(row, idx, &data_type);
                    field(column.name(), value, data_type)
                })
                .collect(),
            DbRow::MySqlRow(row) => row
                .columns_ref()
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let data_type = DataType::from_mysql_column(column);
                    let value = mysql_value(row, idx, &data_type);
                    field(&column.name_str(), value, data_type)
                })
                .collect(),
        };

        RowData::new(field_values)
    }
}

fn field(name: &str, value: Option<Value>, data_type: DataType) -> FieldValue {
    FieldValue {
        name: name.to_string(),
        value: Some(value.unwrap_or(Value::Null)),
        data_type,
    }
}

/// A column that fails to decode is forwarded as null, with a warning naming it.
fn decoded<T, E: Display>(column: &str, result: Result<Option<T>, E>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(column, %err, "Failed to decode column value, sending null");
            None
        }
    }
}

fn pg_get<'a, T: FromSql<'a>>(row: &'a PgRow, idx: usize) -> Option<T> {
    decoded(row.columns()[idx].name(), row.try_get::<_, Option<T>>(idx))
}

fn pg_value(row: &PgRow, idx: usize, data_type: &DataType) -> Option<Value> {
    match data_type {
        DataType::Short => pg_get::<i16>(row, idx).map(|v| Value::Int(v.into())),
        DataType::Int | DataType::Int4 => pg_get::<i32>(row, idx).map(|v| Value::Int(v.into())),
        DataType::Long => pg_get::<i64>(row, idx).map(Value::Int),
        DataType::IntUnsigned => pg_get::<u32>(row, idx).map(|v| Value::Uint(v.into())),
        DataType::Float => pg_get::<f32>(row, idx).map(|v| Value::Float(v.into())),
        DataType::Double => pg_get::<f64>(row, idx).map(Value::Float),
        DataType::Decimal => pg_get::<rust_decimal::Decimal>(row, idx)
            .and_then(|v| BigDecimal::from_str(&v.to_string()).ok())
            .map(Value::Decimal),
        DataType::Boolean => pg_get::<bool>(row, idx).map(Value::Boolean),
        DataType::Json => pg_get::<PgJson<serde_json::Value>>(row, idx).map(|v| Value::Json(v.0)),
        DataType::Uuid => pg_get::<Uuid>(row, idx).map(Value::Uuid),
        DataType::Bytea => pg_get::<Vec<u8>>(row, idx).map(Value::Bytes),
        DataType::Date => pg_get::<NaiveDate>(row, idx).map(Value::Date),
        DataType::DateTime => pg_get::<NaiveDateTime>(row, idx).map(Value::DateTime),
        DataType::Timestamp => pg_get::<DateTime<Utc>>(row, idx).map(Value::Timestamp),
        DataType::Time => pg_get::<NaiveTime>(row, idx).map(|v| Value::String(v.to_string())),
        _ => pg_get::<String>(row, idx).map(Value::String),
    }
}

fn my_get<T: FromValue>(row: &MySqlRow, idx: usize) -> Option<T> {
    let result = row.get_opt::<Option<T>, usize>(idx)?;
    decoded(&row.columns_ref()[idx].name_str(), result)
}

fn mysql_value(row: &MySqlRow, idx: usize, data_type: &DataType) -> Option<Value> {
    match data_type {
        DataType::Short | DataType::Int | DataType::Int4 | DataType::Long | DataType::Year => {
            my_get::<i64>(row, idx).map(Value::Int)
        }
        DataType::ShortUnsigned | DataType::IntUnsigned | DataType::LongUnsigned => {
            my_get::<u64>(row, idx).map(Value::Uint)
        }
        DataType::Float | DataType::Double => my_get::<f64>(row, idx).map(Value::Float),
        DataType::Decimal => my_get::<BigDecimal>(row, idx).map(Value::Decimal),
        DataType::Boolean => my_get::<bool>(row, idx).map(Value::Boolean),
        DataType::Json => my_get::<String>(row, idx).map(|text| {
            serde_json::from_str(&text)
                .map(Value::Json)
                .unwrap_or(Value::String(text))
        }),
        DataType::Date => my_get::<NaiveDate>(row, idx).map(Value::Date),
        DataType::DateTime | DataType::Timestamp => {
            my_get::<NaiveDateTime>(row, idx).map(Value::DateTime)
        }
        DataType::Blob | DataType::Bytea => my_get::<Vec<u8>>(row, idx).map(Value::Bytes),
        DataType::Null => None,
        _ => my_get::<String>(row, idx).map(Value::String),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn decode_failure_is_logged_with_column_name() {
        let value: Option<i64> = decoded("Id", Err("invalid digit found in string"));

        assert_eq!(value, None);
        assert!(logs_contain("Failed to decode column value"));
        assert!(logs_contain("column=\"Id\""));
        assert!(logs_contain("invalid digit found in string"));
    }

    #[test]
    #[traced_test]
    fn sql_null_is_not_a_decode_failure() {
        let value: Option<i64> = decoded::<_, String>("Id", Ok(None));

        assert_eq!(value, None);
        assert!(!logs_contain("Failed to decode"));
    }

    #[test]
    fn decoded_value_passes_through() {
        assert_eq!(decoded::<_, String>("Id", Ok(Some(42))), Some(42));
    }
}
