use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Date/time pattern is empty")]
    Empty,

    #[error("Unsupported date/time pattern '{pattern}' (translated to '{strftime}')")]
    Unsupported { pattern: String, strftime: String },
}
