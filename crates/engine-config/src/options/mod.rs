use connectors::{http::collector::CollectorConfig, sql::base::adapter::DatabaseKind};
use planner::query::template::QueryTemplate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

pub mod loader;
pub mod resolve;

pub const DEFAULT_OPTIONS_FILE: &str = "options.json";

/// Backend holding the persisted cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStoreKind {
    #[default]
    File,
    Sled,
}

/// Everything one forwarder run is configured with. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// May reference environment variables as `${NAME}`.
    pub connection_string: String,
    pub database: DatabaseKind,

    #[serde(flatten)]
    pub template: QueryTemplate,
    pub max_records: usize,
    pub sequence_field: String,
    pub sequence_field_default_value: String,

    pub poll_interval_ms: u64,
    pub max_poll_interval_ms: u64,

    /// Pattern the cursor is written and parsed with when it is a date/time.
    pub cursor_format: String,
    pub cursor_is_utc: bool,
    pub cursor_increment_ms: i64,
    pub cursor_file: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub cursor_store: CursorStoreKind,

    pub timestamp_field: Option<String>,
    pub event_timestamp_format: String,

    pub collector: CollectorConfig,
    pub source_host: String,
    pub source_data: String,
    pub additional_fields: BTreeMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            connection_string: String::new(),
            database: DatabaseKind::default(),
            template: QueryTemplate::default(),
            max_records: 1000,
            sequence_field: "Id".to_string(),
            sequence_field_default_value: String::new(),
            poll_interval_ms: 5000,
            max_poll_interval_ms: 60_000,
            cursor_format: "yyyy-MM-dd HH:mm:ss.fff".to_string(),
            cursor_is_utc: true,
            cursor_increment_ms: 0,
            cursor_file: None,
            state_dir: None,
            cursor_store: CursorStoreKind::default(),
            timestamp_field: None,
            event_timestamp_format: "yyyy-MM-ddTHH:mm:ss.fffK".to_string(),
            collector: CollectorConfig::default(),
            source_host: String::new(),
            source_data: String::new(),
            additional_fields: BTreeMap::new(),
        }
    }
}
