use crate::{error::QueryBuildError, query::template::QueryTemplate};
use model::pagination::cursor::{Cursor, CursorFormat};
use tracing::debug;

/// Builds the next incremental extraction query from the persisted cursor.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    template: QueryTemplate,
    sequence_field: String,
    max_records: usize,
    cursor_format: CursorFormat,
    increment_ms: i64,
}

impl QueryBuilder {
    pub fn new(template: QueryTemplate, sequence_field: impl Into<String>) -> Self {
        QueryBuilder {
            template,
            sequence_field: sequence_field.into(),
            max_records: 1000,
            cursor_format: CursorFormat::default(),
            increment_ms: 0,
        }
    }

    pub fn max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn cursor_format(mut self, format: CursorFormat) -> Self {
        self.cursor_format = format;
        self
    }

    /// Milliseconds added to a temporal cursor before it is placed in the
    /// where clause. Raw cursors are never adjusted.
    pub fn increment_ms(mut self, increment_ms: i64) -> Self {
        self.increment_ms = increment_ms;
        self
    }

    pub fn sequence_field(&self) -> &str {
        &self.sequence_field
    }

    pub fn format(&self) -> &CursorFormat {
        &self.cursor_format
    }

    /// Assembles `base [+ where] + order by` for the given persisted cursor text.
    pub fn build(&self, cursor_value: &str) -> Result<String, QueryBuildError> {
        if self.template.query.trim().is_empty() {
            return Err(QueryBuildError::EmptyQuery);
        }
        if self.sequence_field.trim().is_empty() {
            return Err(QueryBuildError::EmptySequenceField);
        }

        let mut query = self.template.base(self.max_records);

        let cursor = Cursor::parse(cursor_value, &self.cursor_format).advance(self.increment_ms);
        if !cursor.is_empty() {
            query.push_str(
                &self
                    .template
                    .filter(&self.sequence_field, &cursor.render()),
            );
        }

        query.push_str(&self.template.ordering(&self.sequence_field));

        debug!(sql = %query, cursor = %cursor, "Built extraction query");
        Ok(query)
    }
}
