use super::{LAST_SEQUENCE_VALUE, MAX_RECORDS, SEQUENCE_FIELD};
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUERY: &str = "SELECT * FROM events";
pub const DEFAULT_WHERE_CLAUSE: &str =
    " WHERE {{SQLSequenceField}} > '{{LastSQLSequenceFieldValue}}'";
pub const DEFAULT_ORDER_BY_CLAUSE: &str = " ORDER BY {{SQLSequenceField}} ASC";

/// The three text fragments an extraction query is assembled from.
///
/// Fragments are concatenated as written, so the where and order-by
/// templates carry their own leading whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
    #[serde(default = "default_query")]
    pub query: String,

    #[serde(default = "default_where_clause")]
    pub where_clause: String,

    #[serde(default = "default_order_by_clause")]
    pub order_by_clause: String,
}

impl Default for QueryTemplate {
    fn default() -> Self {
        QueryTemplate {
            query: default_query(),
            where_clause: default_where_clause(),
            order_by_clause: default_order_by_clause(),
        }
    }
}

impl QueryTemplate {
    pub fn base(&self, max_records: usize) -> String {
        self.query.replace(MAX_RECORDS, &max_records.to_string())
    }

    pub fn filter(&self, sequence_field: &str, last_value: &str) -> String {
        self.where_clause
            .replace(SEQUENCE_FIELD, sequence_field)
            .replace(LAST_SEQUENCE_VALUE, last_value)
    }

    pub fn ordering(&self, sequence_field: &str) -> String {
        self.order_by_clause.replace(SEQUENCE_FIELD, sequence_field)
    }
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

fn default_where_clause() -> String {
    DEFAULT_WHERE_CLAUSE.to_string()
}

fn default_order_by_clause() -> String {
    DEFAULT_ORDER_BY_CLAUSE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_row_limit_in_base_query() {
        let template = QueryTemplate {
            query: "SELECT TOP {{MaxRecords}} * FROM audit".into(),
            ..Default::default()
        };
        assert_eq!(template.base(250), "SELECT TOP 250 * FROM audit");
        // no placeholder, no change
        assert_eq!(QueryTemplate::default().base(250), DEFAULT_QUERY);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let template: QueryTemplate =
            serde_json::from_str(r#"{ "query": "SELECT * FROM t" }"#).unwrap();
        assert_eq!(template.query, "SELECT * FROM t");
        assert_eq!(template.where_clause, DEFAULT_WHERE_CLAUSE);
        assert_eq!(template.order_by_clause, DEFAULT_ORDER_BY_CLAUSE);
    }
}
