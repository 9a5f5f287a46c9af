use crate::core::{
    data_type::DataType,
    datetime::{DatePattern, TimeZoneMode},
};
use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    /// Wall-clock date/time without an offset (`DATETIME`, `timestamp`).
    DateTime(NaiveDateTime),
    /// Absolute instant (`timestamptz`).
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            Value::Int(v) => Some(BigDecimal::from(*v)),
            Value::Uint(v) => Some(BigDecimal::from(*v)),
            Value::Float(v) => BigDecimal::from_f64(*v),
            Value::Decimal(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::Uint(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Decimal(v) => Some(v.normalized().to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(v.to_string()),
            Value::Json(v) => Some(v.to_string()),
            Value::Uuid(v) => Some(v.to_string()),
            Value::Bytes(v) => Some(v.iter().map(|b| format!("{b:02x}")).collect()),
            Value::Date(v) => Some(v.to_string()),
            Value::DateTime(v) => Some(v.to_string()),
            Value::Timestamp(v) => Some(v.to_rfc3339()),
            Value::Null => None,
        }
    }

    /// Renders the value as plain text; date/time values use `pattern` when given.
    pub fn render(&self, pattern: Option<&DatePattern>, zone: TimeZoneMode) -> String {
        match (self, pattern) {
            (Value::Date(d), Some(p)) => match d.and_hms_opt(0, 0, 0) {
                Some(midnight) => p.format_wall_clock(&midnight, zone),
                None => d.to_string(),
            },
            (Value::DateTime(dt), Some(p)) => p.format_wall_clock(dt, zone),
            (Value::Timestamp(ts), Some(p)) => p.format_instant(ts, zone),
            _ => self.as_string().unwrap_or_default(),
        }
    }

    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Uint(a), Uint(b)) => Some(a.cmp(b)),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Uuid(a), Uuid(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Date(a), DateTime(b)) => a.and_hms_opt(0, 0, 0).map(|a| a.cmp(b)),
            (DateTime(a), Date(b)) => b.and_hms_opt(0, 0, 0).map(|b| a.cmp(&b)),
            (a, b) => match (a.as_decimal(), b.as_decimal()) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => None,
            },
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Long,
            Value::Uint(_) => DataType::LongUnsigned,
            Value::Float(_) => DataType::Double,
            Value::Decimal(_) => DataType::Decimal,
            Value::String(_) => DataType::String,
            Value::Boolean(_) => DataType::Boolean,
            Value::Json(_) => DataType::Json,
            Value::Uuid(_) => DataType::Uuid,
            Value::Bytes(_) => DataType::Bytea,
            Value::Date(_) => DataType::Date,
            Value::DateTime(_) => DataType::DateTime,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Null => DataType::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_string() {
            Some(s) => f.write_str(&s),
            None => f.write_str("NULL"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<Value>,
    pub data_type: DataType,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let data_type = value.data_type();
        FieldValue {
            name: name.into(),
            value: Some(value),
            data_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn compares_across_numeric_representations() {
        let dec = Value::Decimal(BigDecimal::from_str("10.5").unwrap());
        assert_eq!(Value::Int(10).compare(&dec), Some(Ordering::Less));
        assert_eq!(Value::Uint(11).compare(&dec), Some(Ordering::Greater));
        assert_eq!(
            Value::Int(3).compare(&Value::Int(3)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn unrelated_types_are_incomparable() {
        assert_eq!(Value::String("a".into()).compare(&Value::Int(1)), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
    }

    #[test]
    fn renders_plain_text_without_sql_quoting() {
        let zone = TimeZoneMode::Utc;
        assert_eq!(Value::String("it's".into()).render(None, zone), "it's");
        assert_eq!(Value::Int(-4).render(None, zone), "-4");
        assert_eq!(Value::Null.render(None, zone), "");
        assert_eq!(
            Value::Decimal(BigDecimal::from_str("12.500").unwrap()).render(None, zone),
            "12.5"
        );
    }

    #[test]
    fn renders_temporal_values_with_pattern() {
        let pattern = DatePattern::new("yyyy-MM-ddTHH:mm:ss").unwrap();
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(
            Value::DateTime(dt).render(Some(&pattern), TimeZoneMode::Utc),
            "2024-01-01T08:30:00"
        );
        // the pattern does not apply to non-temporal values
        assert_eq!(
            Value::Int(100).render(Some(&pattern), TimeZoneMode::Utc),
            "100"
        );
    }
}
