use crate::error::PatternError;
use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc,
    format::{Item, StrftimeItems},
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// How a wall-clock value without an explicit offset is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Utc,
    Local,
}

/// A date/time pattern as written in configuration.
///
/// Patterns containing `%` are taken as chrono `strftime` notation. Anything
/// else is read as .NET custom date/time notation (`yyyy-MM-ddTHH:mm:ss.fff`)
/// and translated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    strftime: String,
}

impl DatePattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            translate_dotnet(pattern)
        };

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(PatternError::Unsupported {
                pattern: pattern.to_string(),
                strftime,
            });
        }

        Ok(Self { strftime })
    }

    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Parses `value` into a wall-clock time in `zone`.
    ///
    /// Values carrying their own offset are converted into `zone`; date-only
    /// patterns resolve to midnight.
    pub fn parse(&self, value: &str, zone: TimeZoneMode) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(with_offset) = DateTime::parse_from_str(value, &self.strftime) {
            return Some(match zone {
                TimeZoneMode::Utc => with_offset.naive_utc(),
                TimeZoneMode::Local => with_offset.with_timezone(&Local).naive_local(),
            });
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(value, &self.strftime) {
            return Some(naive);
        }

        NaiveDate::parse_from_str(value, &self.strftime)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// Renders a wall-clock time that is already expressed in `zone`.
    pub fn format_wall_clock(&self, at: &NaiveDateTime, zone: TimeZoneMode) -> String {
        match zone {
            TimeZoneMode::Utc => self.render(&Utc.from_utc_datetime(at)),
            TimeZoneMode::Local => match Local.from_local_datetime(at).earliest() {
                Some(local) => self.render(&local),
                // skipped by a DST transition; there is no offset to print
                None => self.render(&Utc.from_utc_datetime(at)),
            },
        }
    }

    /// Renders an absolute instant after converting it into `zone`.
    pub fn format_instant(&self, at: &DateTime<Utc>, zone: TimeZoneMode) -> String {
        match zone {
            TimeZoneMode::Utc => self.render(at),
            TimeZoneMode::Local => self.render(&at.with_timezone(&Local)),
        }
    }

    fn render<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();
        if write!(out, "{}", at.format(&self.strftime)).is_err() {
            return at.naive_local().to_string();
        }
        out
    }
}

fn translate_dotnet(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' || c == '"' {
            i += 1;
            while i < chars.len() && chars[i] != c {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if c == '\\' {
            if let Some(&next) = chars.get(i + 1) {
                push_literal(&mut out, next);
            }
            i += 2;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&n| n == c).count();
        match dotnet_specifier(c, run) {
            Some(spec) => out.push_str(spec),
            None => (0..run).for_each(|_| push_literal(&mut out, c)),
        }
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

// Fractional seconds are widened to chrono's fixed 3/6/9 digit forms.
fn dotnet_specifier(c: char, run: usize) -> Option<&'static str> {
    let spec = match (c, run) {
        ('y', 1 | 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('d', 3) => "%a",
        ('d', _) => "%A",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('f' | 'F', 1..=3) => "%3f",
        ('f' | 'F', 4..=6) => "%6f",
        ('f' | 'F', _) => "%9f",
        ('t', _) => "%p",
        ('z', 1 | 2) => "%z",
        ('z', _) => "%:z",
        ('K', _) => "%:z",
        _ => return None,
    };
    Some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn translates_dotnet_patterns() {
        let pattern = DatePattern::new("yyyy-MM-ddTHH:mm:ss").unwrap();
        assert_eq!(pattern.strftime(), "%Y-%m-%dT%H:%M:%S");

        let pattern = DatePattern::new("yyyy-MM-dd HH:mm:ss.fff").unwrap();
        assert_eq!(pattern.strftime(), "%Y-%m-%d %H:%M:%S.%3f");

        let pattern = DatePattern::new("dd/MM/yyyy 'at' HH").unwrap();
        assert_eq!(pattern.strftime(), "%d/%m/%Y at %H");
    }

    #[test]
    fn strftime_patterns_pass_through() {
        let pattern = DatePattern::new("%Y%m%d").unwrap();
        assert_eq!(pattern.strftime(), "%Y%m%d");
    }

    #[test]
    fn rejects_empty_and_invalid_patterns() {
        assert_eq!(DatePattern::new("  "), Err(PatternError::Empty));
        assert!(matches!(
            DatePattern::new("%Q"),
            Err(PatternError::Unsupported { .. })
        ));
    }

    #[test]
    fn parses_and_formats_wall_clock_values() {
        let pattern = DatePattern::new("yyyy-MM-dd HH:mm:ss.fff").unwrap();
        let at = pattern
            .parse("2024-03-05 10:20:30.250", TimeZoneMode::Utc)
            .unwrap();
        assert_eq!(at, naive("2024-03-05 10:20:30.250"));
        assert_eq!(
            pattern.format_wall_clock(&at, TimeZoneMode::Utc),
            "2024-03-05 10:20:30.250"
        );
    }

    #[test]
    fn date_only_patterns_resolve_to_midnight() {
        let pattern = DatePattern::new("yyyyMMdd").unwrap();
        let at = pattern.parse("20240102", TimeZoneMode::Utc).unwrap();
        assert_eq!(at, naive("2024-01-02 00:00:00"));
    }

    #[test]
    fn values_with_offsets_are_normalised_to_utc() {
        let pattern = DatePattern::new("yyyy-MM-ddTHH:mm:sszzz").unwrap();
        let at = pattern
            .parse("2024-01-01T02:00:00+02:00", TimeZoneMode::Utc)
            .unwrap();
        assert_eq!(at, naive("2024-01-01 00:00:00"));
    }

    #[test]
    fn non_temporal_values_do_not_parse() {
        let pattern = DatePattern::new("yyyy-MM-ddTHH:mm:ss").unwrap();
        assert!(pattern.parse("100", TimeZoneMode::Utc).is_none());
        assert!(pattern.parse("", TimeZoneMode::Utc).is_none());
    }

    #[test]
    fn instants_render_in_utc() {
        let pattern = DatePattern::new("yyyy-MM-ddTHH:mm:ssK").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            pattern.format_instant(&at, TimeZoneMode::Utc),
            "2024-01-01T12:00:00+00:00"
        );
    }
}
