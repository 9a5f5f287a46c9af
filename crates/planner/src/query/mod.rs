pub mod offsets;
pub mod template;

/// Replaced with the configured sequence column name.
pub const SEQUENCE_FIELD: &str = "{{SQLSequenceField}}";

/// Replaced with the (possibly advanced) cursor value.
pub const LAST_SEQUENCE_VALUE: &str = "{{LastSQLSequenceFieldValue}}";

/// Replaced with the configured row limit in the base query.
pub const MAX_RECORDS: &str = "{{MaxRecords}}";
