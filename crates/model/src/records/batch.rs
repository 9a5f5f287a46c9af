use crate::{core::value::Value, records::row::RowData};

/// The rows returned by one extraction query. Lives for a single tick.
#[derive(Debug, Clone, Default)]
pub struct ExtractionBatch {
    pub rows: Vec<RowData>,
}

impl ExtractionBatch {
    pub fn new(rows: Vec<RowData>) -> Self {
        ExtractionBatch { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Highest non-null value of `field` across the batch.
    ///
    /// Values the type system cannot order against each other fall back to
    /// comparing their text form.
    pub fn max_value(&self, field: &str) -> Option<Value> {
        self.rows
            .iter()
            .map(|row| row.get_value(field))
            .filter(|value| !value.is_null())
            .max_by(|a, b| {
                a.compare(b)
                    .unwrap_or_else(|| a.as_string().cmp(&b.as_string()))
            })
    }
}

impl From<Vec<RowData>> for ExtractionBatch {
    fn from(rows: Vec<RowData>) -> Self {
        ExtractionBatch::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: Value) -> RowData {
        [("Id".to_string(), id), ("Name".to_string(), Value::String("x".into()))]
            .into_iter()
            .collect()
    }

    #[test]
    fn max_value_ignores_order_and_nulls() {
        let batch = ExtractionBatch::new(vec![
            row(Value::Int(7)),
            row(Value::Null),
            row(Value::Int(42)),
            row(Value::Int(3)),
        ]);
        assert_eq!(batch.max_value("id"), Some(Value::Int(42)));
    }

    #[test]
    fn max_value_orders_date_times() {
        let day = |d| {
            Value::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
        };
        let batch = ExtractionBatch::new(vec![row(day(2)), row(day(9)), row(day(5))]);
        assert_eq!(batch.max_value("Id"), Some(day(9)));
    }

    #[test]
    fn max_value_of_missing_field_is_none() {
        let batch = ExtractionBatch::new(vec![row(Value::Int(1))]);
        assert_eq!(batch.max_value("Missing"), None);
        assert!(ExtractionBatch::default().max_value("Id").is_none());
    }
}
