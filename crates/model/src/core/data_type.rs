use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Column types the extraction layer knows how to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    Short,
    ShortUnsigned,
    Int,
    Int4,
    IntUnsigned,
    Long,
    LongUnsigned,
    Float,
    Double,
    Decimal,
    Boolean,
    Char,
    VarChar,
    String,
    Enum,
    Json,
    Uuid,
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    Bytea,
    Blob,
    Null,
    Custom(String),
}

lazy_static! {
    static ref MYSQL_TYPE_MAP: HashMap<&'static str, DataType> = build_mysql_type_map();
    static ref POSTGRES_TYPE_MAP: HashMap<&'static str, DataType> = build_postgres_type_map();
}

impl DataType {
    pub fn from_mysql_type(type_name: &str) -> Result<Self, String> {
        let normalized = Self::normalize_type_name(type_name);
        MYSQL_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .ok_or_else(|| format!("Unknown MySQL column type: {type_name}"))
    }

    pub fn from_postgres_type(type_name: &str) -> Result<Self, String> {
        let normalized = Self::normalize_type_name(type_name);
        POSTGRES_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .ok_or_else(|| format!("Unknown Postgres column type: {type_name}"))
    }

    fn normalize_type_name(type_name: &str) -> String {
        type_name.trim().to_uppercase()
    }

    fn name(&self) -> &str {
        match self {
            DataType::Short => "SMALLINT",
            DataType::ShortUnsigned => "SMALLINT UNSIGNED",
            DataType::Int | DataType::Int4 => "INT",
            DataType::IntUnsigned => "INT UNSIGNED",
            DataType::Long => "BIGINT",
            DataType::LongUnsigned => "BIGINT UNSIGNED",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Char => "CHAR",
            DataType::VarChar => "VARCHAR",
            DataType::String => "TEXT",
            DataType::Enum => "ENUM",
            DataType::Json => "JSON",
            DataType::Uuid => "UUID",
            DataType::Date => "DATE",
            DataType::DateTime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Time => "TIME",
            DataType::Year => "YEAR",
            DataType::Bytea => "BYTEA",
            DataType::Blob => "BLOB",
            DataType::Null => "NULL",
            DataType::Custom(name) => name,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn build_mysql_type_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("BOOLEAN", Boolean),
        ("BOOL", Boolean),
        ("TINYINT", Short),
        ("SMALLINT", Short),
        ("TINYINT UNSIGNED", ShortUnsigned),
        ("SMALLINT UNSIGNED", ShortUnsigned),
        ("MEDIUMINT", Int),
        ("MEDIUMINT UNSIGNED", IntUnsigned),
        ("INT", Int),
        ("INTEGER", Int),
        ("INT UNSIGNED", IntUnsigned),
        ("BIGINT", Long),
        ("BIGINT UNSIGNED", LongUnsigned),
        ("FLOAT", Float),
        ("DOUBLE", Double),
        ("DECIMAL", Decimal),
        ("NEWDECIMAL", Decimal),
        ("NULL", Null),
        ("TIMESTAMP", DateTime),
        ("DATETIME", DateTime),
        ("DATE", Date),
        ("TIME", Time),
        ("YEAR", Year),
        ("ENUM", Enum),
        ("SET", String),
        ("JSON", Json),
        ("CHAR", Char),
        ("VARCHAR", VarChar),
        ("VAR_STRING", VarChar),
        ("STRING", Char),
        ("TEXT", String),
        ("BLOB", Blob),
        ("TINYBLOB", Blob),
        ("MEDIUMBLOB", Blob),
        ("LONGBLOB", Blob),
        ("BINARY", Blob),
        ("VARBINARY", Blob),
    ];

    entries.into_iter().collect()
}

fn build_postgres_type_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("BOOL", Boolean),
        ("INT2", Short),
        ("INT4", Int4),
        ("INT8", Long),
        ("OID", IntUnsigned),
        ("FLOAT4", Float),
        ("FLOAT8", Double),
        ("NUMERIC", Decimal),
        ("JSON", Json),
        ("JSONB", Json),
        ("TEXT", String),
        ("NAME", String),
        ("VARCHAR", VarChar),
        ("BPCHAR", Char),
        ("CHAR", Char),
        ("UUID", Uuid),
        ("BYTEA", Bytea),
        ("DATE", Date),
        ("TIME", Time),
        ("TIMESTAMP", DateTime),
        ("TIMESTAMPTZ", Timestamp),
    ];

    entries.into_iter().collect()
}
