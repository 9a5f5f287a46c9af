pub mod backoff;
pub mod connectors;
pub mod error;
pub mod format;
pub mod metrics;
pub mod state;
