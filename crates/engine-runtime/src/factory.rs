use crate::{error::RuntimeError, poll::PollLoop};
use connectors::{http::collector::HttpCollector, sql::base::source::SqlSource};
use engine_config::options::{CursorStoreKind, Options};
use engine_core::{
    metrics::Metrics,
    state::{CursorStore, file_store::FileCursorStore, sled_store::SledCursorStore},
};
use std::{path::Path, sync::Arc};
use tracing::{info, warn};

/// Opens the cursor store the options point at.
pub fn create_cursor_store(
    options: &Options,
    options_path: &Path,
) -> Result<Arc<dyn CursorStore>, RuntimeError> {
    let path = options.cursor_path(options_path);
    let store: Arc<dyn CursorStore> = match options.cursor_store {
        CursorStoreKind::File => Arc::new(FileCursorStore::new(path)),
        CursorStoreKind::Sled => Arc::new(SledCursorStore::open(path, options.cursor_key())?),
    };
    Ok(store)
}

/// A source that is not reachable at startup is not fatal: the poll loop
/// reconnects before every tick.
pub async fn create_source(options: &Options) -> Arc<SqlSource> {
    let source = SqlSource::new(options.database, options.connection_string.clone());
    if let Err(err) = source.ensure_connected().await {
        warn!(kind = %options.database, %err, "Initial database connection failed, will retry on next tick");
    }
    Arc::new(source)
}

pub async fn create_poll_loop(
    options: &Options,
    options_path: &Path,
    metrics: Metrics,
) -> Result<PollLoop, RuntimeError> {
    options.validate()?;

    let store = create_cursor_store(options, options_path)?;
    let collector = Arc::new(HttpCollector::new(&options.collector)?);
    let source = create_source(options).await;

    info!(
        database = %options.database,
        collector = %collector.endpoint(),
        cursor_store = %store.location(),
        sequence_field = %options.sequence_field,
        "Forwarder configured"
    );

    Ok(PollLoop::new(
        source,
        collector,
        store,
        options.query_builder()?,
        options.formatter()?,
        Arc::new(options.backoff()),
    )
    .default_cursor(options.sequence_field_default_value.clone())
    .metrics(metrics))
}
