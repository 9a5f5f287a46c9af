use model::core::data_type::DataType;
use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType},
};

/// Character set id MySQL reports for binary strings and blobs.
const BINARY_CHARSET: u16 = 63;

pub trait MySqlColumnDataType {
    fn from_mysql_column(column: &Column) -> DataType;
}

impl MySqlColumnDataType for DataType {
    fn from_mysql_column(column: &Column) -> DataType {
        let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);
        let binary = column.character_set() == BINARY_CHARSET;
        let name = mysql_type_name(column.column_type(), unsigned, binary);
        DataType::from_mysql_type(name).unwrap_or_else(|_| DataType::Custom(name.to_string()))
    }
}

/// Maps a wire column type to the SQL type name used by the type map.
///
/// TEXT columns travel as blob types; only the binary charset marks real blobs.
pub fn mysql_type_name(column_type: ColumnType, unsigned: bool, binary: bool) -> &'static str {
    use ColumnType::*;

    match (column_type, unsigned) {
        (MYSQL_TYPE_TINY, false) => "TINYINT",
        (MYSQL_TYPE_TINY, true) => "TINYINT UNSIGNED",
        (MYSQL_TYPE_SHORT, false) => "SMALLINT",
        (MYSQL_TYPE_SHORT, true) => "SMALLINT UNSIGNED",
        (MYSQL_TYPE_INT24, false) => "MEDIUMINT",
        (MYSQL_TYPE_INT24, true) => "MEDIUMINT UNSIGNED",
        (MYSQL_TYPE_LONG, false) => "INT",
        (MYSQL_TYPE_LONG, true) => "INT UNSIGNED",
        (MYSQL_TYPE_LONGLONG, false) => "BIGINT",
        (MYSQL_TYPE_LONGLONG, true) => "BIGINT UNSIGNED",
        (MYSQL_TYPE_FLOAT, _) => "FLOAT",
        (MYSQL_TYPE_DOUBLE, _) => "DOUBLE",
        (MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL, _) => "DECIMAL",
        (MYSQL_TYPE_NULL, _) => "NULL",
        (MYSQL_TYPE_TIMESTAMP | MYSQL_TYPE_TIMESTAMP2, _) => "TIMESTAMP",
        (MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2, _) => "DATETIME",
        (MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE, _) => "DATE",
        (MYSQL_TYPE_TIME | MYSQL_TYPE_TIME2, _) => "TIME",
        (MYSQL_TYPE_YEAR, _) => "YEAR",
        (MYSQL_TYPE_JSON, _) => "JSON",
        (MYSQL_TYPE_ENUM, _) => "ENUM",
        (MYSQL_TYPE_SET, _) => "SET",
        (MYSQL_TYPE_BIT, _) => "BINARY",
        (
            MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB | MYSQL_TYPE_BLOB,
            _,
        ) if binary => "BLOB",
        (
            MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB | MYSQL_TYPE_BLOB,
            _,
        ) => "TEXT",
        (MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_STRING | MYSQL_TYPE_VARCHAR, _) if binary => {
            "VARBINARY"
        }
        (MYSQL_TYPE_STRING, _) => "CHAR",
        _ => "VARCHAR",
    }
}
