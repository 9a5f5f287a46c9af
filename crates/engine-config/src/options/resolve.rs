use crate::{
    env::EnvManager,
    error::SettingsError,
    options::{CursorStoreKind, Options},
};
use engine_core::{
    backoff::BackoffController,
    format::{RowFormatter, SOURCE_DATA_FIELD, SOURCE_HOST_FIELD},
};
use model::{
    core::datetime::{DatePattern, TimeZoneMode},
    pagination::cursor::CursorFormat,
};
use planner::query::offsets::QueryBuilder;
use std::path::{Path, PathBuf};

impl Options {
    /// Expands `${NAME}` references in the fields that usually carry secrets.
    pub fn resolve_env(&mut self, env: &EnvManager) -> Result<(), SettingsError> {
        self.connection_string = env.interpolate(&self.connection_string)?;
        self.collector.base_address = env.interpolate(&self.collector.base_address)?;
        self.collector.token = env.interpolate(&self.collector.token)?;
        Ok(())
    }

    /// Rejects settings the poll loop cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.sequence_field.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "sequence_field",
                reason: "must not be empty".into(),
            });
        }
        if self.max_records == 0 {
            return Err(SettingsError::Invalid {
                field: "max_records",
                reason: "must be greater than zero".into(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "poll_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        self.cursor_format()?;
        self.event_pattern()?;
        Ok(())
    }

    pub fn zone(&self) -> TimeZoneMode {
        if self.cursor_is_utc {
            TimeZoneMode::Utc
        } else {
            TimeZoneMode::Local
        }
    }

    /// An empty pattern turns temporal cursor handling off.
    pub fn cursor_format(&self) -> Result<CursorFormat, SettingsError> {
        let pattern = if self.cursor_format.trim().is_empty() {
            None
        } else {
            Some(
                DatePattern::new(&self.cursor_format).map_err(|source| SettingsError::Pattern {
                    field: "cursor_format",
                    source,
                })?,
            )
        };
        Ok(CursorFormat::new(pattern, self.zone()))
    }

    fn event_pattern(&self) -> Result<Option<DatePattern>, SettingsError> {
        if self.event_timestamp_format.trim().is_empty() {
            return Ok(None);
        }
        DatePattern::new(&self.event_timestamp_format)
            .map(Some)
            .map_err(|source| SettingsError::Pattern {
                field: "event_timestamp_format",
                source,
            })
    }

    pub fn query_builder(&self) -> Result<QueryBuilder, SettingsError> {
        Ok(
            QueryBuilder::new(self.template.clone(), self.sequence_field.clone())
                .max_records(self.max_records)
                .cursor_format(self.cursor_format()?)
                .increment_ms(self.cursor_increment_ms),
        )
    }

    pub fn formatter(&self) -> Result<RowFormatter, SettingsError> {
        let mut formatter = RowFormatter::new()
            .with_field(SOURCE_HOST_FIELD, self.source_host.clone())
            .with_field(SOURCE_DATA_FIELD, self.source_data.clone())
            .with_fields(self.additional_fields.clone())
            .with_zone(self.zone());

        let field = self
            .timestamp_field
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty());
        if let (Some(field), Some(pattern)) = (field, self.event_pattern()?) {
            formatter = formatter.with_timestamp(field, pattern);
        }

        Ok(formatter)
    }

    pub fn backoff(&self) -> BackoffController {
        BackoffController::from_millis(self.poll_interval_ms, self.max_poll_interval_ms)
    }

    /// Directory holding cursor state: `state_dir`, else the options file's directory.
    pub fn state_dir(&self, options_path: &Path) -> PathBuf {
        match &self.state_dir {
            Some(dir) => dir.clone(),
            None => options_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// `<source_data>-<sequence_field>`, the per-source cursor identity.
    pub fn cursor_key(&self) -> String {
        sanitize(&format!("{}-{}", self.source_data, self.sequence_field))
    }

    /// Where the cursor lives for the configured backend.
    pub fn cursor_path(&self, options_path: &Path) -> PathBuf {
        let dir = self.state_dir(options_path);
        match self.cursor_store {
            CursorStoreKind::File => match self.cursor_file.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => dir.join(name),
                _ => dir.join(format!("{}.txt", self.cursor_key())),
            },
            CursorStoreKind::Sled => dir.join("cursors.sled"),
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
