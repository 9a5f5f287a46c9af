use model::{
    core::{
        datetime::{DatePattern, TimeZoneMode},
        value::Value,
    },
    records::{batch::ExtractionBatch, row::RowData},
};

pub const SOURCE_HOST_FIELD: &str = "SourceHost";
pub const SOURCE_DATA_FIELD: &str = "SourceData";

/// Flattens a batch into one newline-free `field="value"` payload.
///
/// Each row becomes an event block of comma separated pairs followed by the
/// static metadata pairs; blocks are separated by a single space.
#[derive(Debug, Clone, Default)]
pub struct RowFormatter {
    metadata: Vec<(String, String)>,
    timestamp_field: Option<String>,
    timestamp_pattern: Option<DatePattern>,
    zone: TimeZoneMode,
}

impl RowFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a static pair to every event block, in insertion order.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }

    pub fn with_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Renders `field` with `pattern` instead of its native text form.
    pub fn with_timestamp(mut self, field: impl Into<String>, pattern: DatePattern) -> Self {
        self.timestamp_field = Some(field.into());
        self.timestamp_pattern = Some(pattern);
        self
    }

    pub fn with_zone(mut self, zone: TimeZoneMode) -> Self {
        self.zone = zone;
        self
    }

    pub fn format(&self, batch: &ExtractionBatch) -> String {
        batch
            .rows
            .iter()
            .map(|row| self.format_row(row))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn format_row(&self, row: &RowData) -> String {
        let columns = row.field_values.iter().map(|field| {
            let value = field.value.as_ref().unwrap_or(&Value::Null);
            pair(&field.name, &self.render(&field.name, value))
        });
        let metadata = self
            .metadata
            .iter()
            .map(|(name, value)| pair(name, value));

        columns.chain(metadata).collect::<Vec<_>>().join(", ")
    }

    fn render(&self, name: &str, value: &Value) -> String {
        let is_timestamp = self
            .timestamp_field
            .as_deref()
            .is_some_and(|ts| ts.eq_ignore_ascii_case(name));

        if is_timestamp {
            value.render(self.timestamp_pattern.as_ref(), self.zone)
        } else {
            value.render(None, self.zone)
        }
    }
}

fn pair(name: &str, value: &str) -> String {
    format!("{name}=\"{}\"", escape(value))
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}
