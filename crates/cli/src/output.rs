use crate::error::CliError;
use model::pagination::cursor::{Cursor, CursorFormat};
use serde::Serialize;

/// What `show-cursor` prints.
#[derive(Debug, Serialize, PartialEq)]
pub struct CursorReport {
    pub location: String,
    pub value: Option<String>,
    pub temporal: bool,
}

impl CursorReport {
    pub fn new(location: String, value: Option<String>, format: &CursorFormat) -> Self {
        let temporal = value
            .as_deref()
            .is_some_and(|v| Cursor::parse(v, format).is_temporal());
        Self {
            location,
            value,
            temporal,
        }
    }

    pub fn render(&self, as_json: bool) -> Result<String, CliError> {
        if as_json {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        let value = self.value.as_deref().unwrap_or("(none)");
        let kind = match (&self.value, self.temporal) {
            (None, _) => "n/a",
            (Some(_), true) => "date/time",
            (Some(_), false) => "raw",
        };
        Ok(format!(
            "{:<10} {}\n{:<10} {}\n{:<10} {}",
            "Location", self.location, "Cursor", value, "Kind", kind
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::datetime::{DatePattern, TimeZoneMode};

    fn format() -> CursorFormat {
        CursorFormat::new(
            Some(DatePattern::new("yyyy-MM-dd HH:mm:ss").unwrap()),
            TimeZoneMode::Utc,
        )
    }

    #[test]
    fn reports_temporal_cursor_as_json() {
        let report = CursorReport::new(
            "state/audit-Id.txt".into(),
            Some("2024-03-01 12:00:00".into()),
            &format(),
        );
        let json: serde_json::Value = serde_json::from_str(&report.render(true).unwrap()).unwrap();
        assert_eq!(json["value"], "2024-03-01 12:00:00");
        assert_eq!(json["temporal"], true);
    }

    #[test]
    fn plain_text_marks_missing_cursor() {
        let report = CursorReport::new("memory".into(), None, &format());
        let text = report.render(false).unwrap();
        assert!(text.contains("(none)"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn numeric_cursor_is_raw() {
        let report = CursorReport::new("memory".into(), Some("1200".into()), &format());
        assert!(!report.temporal);
        assert!(report.render(false).unwrap().ends_with("raw"));
    }
}
