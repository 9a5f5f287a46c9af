use model::error::PatternError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or interpreting the options file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid options file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid date/time pattern for {field}: {source}")]
    Pattern {
        field: &'static str,
        source: PatternError,
    },

    #[error("Invalid env file: {0}")]
    EnvFile(String),

    #[error("Environment variable '{0}' is not set")]
    MissingEnv(String),

    #[error("Invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
