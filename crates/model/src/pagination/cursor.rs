use crate::core::{
    datetime::{DatePattern, TimeZoneMode},
    value::Value,
};
use bigdecimal::BigDecimal;
use chrono::{Local, NaiveDateTime, TimeDelta, TimeZone};
use std::{cmp::Ordering, fmt, str::FromStr};

/// How persisted cursor text is read back and written out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorFormat {
    /// `None` disables temporal handling; every cursor is then opaque.
    pub pattern: Option<DatePattern>,
    pub zone: TimeZoneMode,
}

impl CursorFormat {
    pub fn new(pattern: Option<DatePattern>, zone: TimeZoneMode) -> Self {
        CursorFormat { pattern, zone }
    }
}

/// Last processed position in the sequence field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cursor {
    /// Opaque value used verbatim (integers, strings, anything not matching the pattern).
    Raw(String),

    /// Wall-clock time in the configured zone, rendered back with the same pattern.
    Temporal {
        at: NaiveDateTime,
        format: CursorFormat,
    },
}

impl Cursor {
    /// Reads cursor text. Text matching the configured pattern becomes
    /// `Temporal`; everything else stays `Raw`.
    pub fn parse(value: &str, format: &CursorFormat) -> Self {
        match format
            .pattern
            .as_ref()
            .and_then(|p| p.parse(value, format.zone))
        {
            Some(at) => Cursor::Temporal {
                at,
                format: format.clone(),
            },
            None => Cursor::Raw(value.to_string()),
        }
    }

    /// Builds the cursor for a sequence value observed in a delivered batch.
    pub fn from_value(value: &Value, format: &CursorFormat) -> Self {
        let at = match (value, &format.pattern) {
            (Value::DateTime(dt), Some(_)) => Some(*dt),
            (Value::Date(d), Some(_)) => d.and_hms_opt(0, 0, 0),
            (Value::Timestamp(ts), Some(_)) => Some(match format.zone {
                TimeZoneMode::Utc => ts.naive_utc(),
                TimeZoneMode::Local => ts.with_timezone(&Local).naive_local(),
            }),
            _ => None,
        };

        match at {
            Some(at) => Cursor::Temporal {
                at,
                format: format.clone(),
            },
            None => Cursor::Raw(value.render(None, format.zone)),
        }
    }

    /// Moves a temporal cursor forward by `millis`. Raw cursors are returned unchanged.
    pub fn advance(self, millis: i64) -> Self {
        match self {
            Cursor::Temporal { at, format } if millis != 0 => {
                let at = shift(at, millis, format.zone);
                Cursor::Temporal { at, format }
            }
            other => other,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Cursor::Raw(value) => value.clone(),
            Cursor::Temporal { at, format } => match &format.pattern {
                Some(pattern) => pattern.format_wall_clock(at, format.zone),
                None => at.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cursor::Raw(value) if value.is_empty())
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Cursor::Temporal { .. })
    }

    /// Orders two cursors when they are of the same kind: both temporal, or
    /// both raw and numeric.
    pub fn compare(&self, other: &Cursor) -> Option<Ordering> {
        match (self, other) {
            (Cursor::Temporal { at: a, .. }, Cursor::Temporal { at: b, .. }) => Some(a.cmp(b)),
            (Cursor::Raw(a), Cursor::Raw(b)) => {
                let a = BigDecimal::from_str(a.trim()).ok()?;
                let b = BigDecimal::from_str(b.trim()).ok()?;
                Some(a.cmp(&b))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn shift(at: NaiveDateTime, millis: i64, zone: TimeZoneMode) -> NaiveDateTime {
    let delta = TimeDelta::milliseconds(millis);
    match zone {
        TimeZoneMode::Utc => at.checked_add_signed(delta).unwrap_or(at),
        TimeZoneMode::Local => match Local.from_local_datetime(&at).earliest() {
            Some(local) => local
                .checked_add_signed(delta)
                .map(|moved| moved.naive_local())
                .unwrap_or(at),
            None => at.checked_add_signed(delta).unwrap_or(at),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn iso_format() -> CursorFormat {
        CursorFormat::new(
            Some(DatePattern::new("yyyy-MM-ddTHH:mm:ss").unwrap()),
            TimeZoneMode::Utc,
        )
    }

    #[test]
    fn timestamp_text_becomes_temporal() {
        let cursor = Cursor::parse("2024-01-01T00:00:00", &iso_format());
        assert!(cursor.is_temporal());
        assert_eq!(cursor.render(), "2024-01-01T00:00:00");
    }

    #[test]
    fn advancing_temporal_cursor_rerenders_in_same_format() {
        let cursor = Cursor::parse("2024-01-01T00:00:00", &iso_format()).advance(1000);
        assert_eq!(cursor.render(), "2024-01-01T00:00:01");
    }

    #[test]
    fn numeric_cursor_is_raw_and_never_advanced() {
        let cursor = Cursor::parse("100", &iso_format());
        assert_eq!(cursor, Cursor::Raw("100".into()));
        assert_eq!(cursor.advance(1000).render(), "100");
    }

    #[test]
    fn empty_cursor_is_raw_and_empty() {
        let cursor = Cursor::parse("", &iso_format());
        assert!(cursor.is_empty());
        assert!(!Cursor::Raw("0".into()).is_empty());
    }

    #[test]
    fn without_pattern_everything_is_raw() {
        let cursor = Cursor::parse("2024-01-01T00:00:00", &CursorFormat::default());
        assert_eq!(cursor, Cursor::Raw("2024-01-01T00:00:00".into()));
    }

    #[test]
    fn cursor_from_observed_values() {
        let format = iso_format();
        let dt = NaiveDate::from_ymd_opt(2024, 2, 3)
            .unwrap()
            .and_hms_opt(4, 5, 6)
            .unwrap();
        assert_eq!(
            Cursor::from_value(&Value::DateTime(dt), &format).render(),
            "2024-02-03T04:05:06"
        );
        assert_eq!(
            Cursor::from_value(&Value::Timestamp(dt.and_utc()), &format).render(),
            "2024-02-03T04:05:06"
        );
        assert_eq!(
            Cursor::from_value(&Value::Int(981), &format),
            Cursor::Raw("981".into())
        );
    }

    #[test]
    fn compares_like_kinds_only() {
        let format = iso_format();
        let early = Cursor::parse("2024-01-01T00:00:00", &format);
        let late = Cursor::parse("2024-01-02T00:00:00", &format);
        assert_eq!(early.compare(&late), Some(Ordering::Less));

        assert_eq!(
            Cursor::Raw("99".into()).compare(&Cursor::Raw("100".into())),
            Some(Ordering::Less)
        );
        assert_eq!(Cursor::Raw("abc".into()).compare(&Cursor::Raw("100".into())), None);
        assert_eq!(early.compare(&Cursor::Raw("100".into())), None);
    }

    #[test]
    fn local_zone_round_trips_wall_clock() {
        let format = CursorFormat::new(
            Some(DatePattern::new("yyyy-MM-dd HH:mm:ss").unwrap()),
            TimeZoneMode::Local,
        );
        let now = Utc::now().with_timezone(&Local).naive_local();
        let text = format
            .pattern
            .as_ref()
            .unwrap()
            .format_wall_clock(&now, TimeZoneMode::Local);
        assert_eq!(Cursor::parse(&text, &format).render(), text);
    }
}
