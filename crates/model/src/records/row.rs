use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// One result row, columns kept in the order the data source returned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowData {
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        RowData { field_values }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }
}

impl FromIterator<(String, Value)> for RowData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        RowData::new(
            iter.into_iter()
                .map(|(name, value)| FieldValue::new(name, value))
                .collect(),
        )
    }
}
