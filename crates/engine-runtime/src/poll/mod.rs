use crate::{
    error::TickError,
    poll::phase::{Phase, PhaseGuard, PhaseToken},
};
use engine_core::{
    backoff::BackoffController,
    connectors::{
        sink::{Transmitter, is_success},
        source::DataSource,
    },
    format::RowFormatter,
    metrics::Metrics,
    state::CursorStore,
};
use model::{pagination::cursor::Cursor, records::batch::ExtractionBatch};
use planner::query::offsets::QueryBuilder;
use std::{cmp::Ordering, sync::Arc};
use tracing::{debug, error, info, warn};

pub mod phase;

/// What a tick that ran to completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A previous tick still held the phase token.
    SkippedOverlap,

    /// The query returned no rows.
    SkippedEmpty,

    /// The batch was accepted. `cursor` is the value persisted, if any.
    Delivered { rows: usize, cursor: Option<String> },
}

/// One poll-extract-deliver cycle per `tick`, guarded against overlap.
pub struct PollLoop {
    source: Arc<dyn DataSource>,
    transmitter: Arc<dyn Transmitter>,
    store: Arc<dyn CursorStore>,
    builder: QueryBuilder,
    formatter: RowFormatter,
    backoff: Arc<BackoffController>,
    default_cursor: String,
    metrics: Metrics,
    phase: PhaseToken,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn DataSource>,
        transmitter: Arc<dyn Transmitter>,
        store: Arc<dyn CursorStore>,
        builder: QueryBuilder,
        formatter: RowFormatter,
        backoff: Arc<BackoffController>,
    ) -> Self {
        PollLoop {
            source,
            transmitter,
            store,
            builder,
            formatter,
            backoff,
            default_cursor: String::new(),
            metrics: Metrics::new(),
            phase: PhaseToken::new(),
        }
    }

    /// Cursor used when nothing has been persisted yet, or it cannot be read.
    pub fn default_cursor(mut self, value: impl Into<String>) -> Self {
        self.default_cursor = value.into();
        self
    }

    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn backoff(&self) -> &Arc<BackoffController> {
        &self.backoff
    }

    pub fn counters(&self) -> &Metrics {
        &self.metrics
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    pub fn store(&self) -> &Arc<dyn CursorStore> {
        &self.store
    }

    pub async fn tick(&self) -> Result<TickOutcome, TickError> {
        self.metrics.increment_ticks();

        let Some(guard) = self.phase.try_begin() else {
            self.metrics.increment_overlaps();
            debug!("Already executing, skipping this cycle");
            return Ok(TickOutcome::SkippedOverlap);
        };

        let result = self.run(&guard).await;
        if result.is_err() {
            self.metrics.increment_tick_errors();
        }
        result
    }

    async fn run(&self, guard: &PhaseGuard<'_>) -> Result<TickOutcome, TickError> {
        match self.source.ensure_connected().await {
            Ok(true) => info!("Data source connection re-established"),
            Ok(false) => {}
            Err(err) => {
                error!(%err, "Data source is not connected");
                return Err(err.into());
            }
        }

        let persisted = self.store.read_or_default(&self.default_cursor).await;

        let sql = self.builder.build(&persisted).map_err(|err| {
            error!(%err, "Failed to build extraction query");
            err
        })?;

        let batch = self.source.execute_query(&sql).await.map_err(|err| {
            error!(%err, sql = %sql, "Extraction query failed");
            err
        })?;

        if batch.is_empty() {
            self.metrics.increment_empty();
            debug!(cursor = %persisted, "No new rows");
            return Ok(TickOutcome::SkippedEmpty);
        }

        guard.enter(Phase::Delivering);
        let rows = batch.len();
        let payload = self.formatter.format(&batch);
        debug!(rows, payload = %payload, "Formatted batch");

        let status = match self.transmitter.send(payload).await {
            Ok(status) => status,
            Err(err) => {
                self.metrics.increment_delivery_failures();
                warn!(%err, rows, "Failed to send batch to collector");
                self.backoff.on_failure();
                return Err(err.into());
            }
        };

        if !is_success(status) {
            self.metrics.increment_delivery_failures();
            warn!(status, rows, "Collector did not accept batch");
            self.backoff.on_failure();
            return Err(TickError::Rejected { status });
        }

        self.metrics.record_delivery(rows as u64);
        info!(rows, status, "Delivered batch");

        let committed = self.commit_cursor(&persisted, &batch).await;
        self.backoff.on_success();

        Ok(TickOutcome::Delivered {
            rows,
            cursor: committed?,
        })
    }

    /// Persists the batch's highest sequence value. A value lower than the
    /// persisted one is refused.
    async fn commit_cursor(
        &self,
        persisted: &str,
        batch: &ExtractionBatch,
    ) -> Result<Option<String>, TickError> {
        let field = self.builder.sequence_field();
        let format = self.builder.format();

        let Some(max) = batch.max_value(field) else {
            warn!(field, "Delivered rows carry no sequence value, cursor unchanged");
            return Ok(None);
        };

        let next = Cursor::from_value(&max, format);
        let current = Cursor::parse(persisted, format);
        if next.compare(&current) == Some(Ordering::Less) {
            error!(
                current = %current,
                next = %next,
                "Refusing to move the cursor backwards"
            );
            return Ok(None);
        }

        let value = next.render();
        if let Err(err) = self.store.save(&value).await {
            self.metrics.increment_cursor_write_failures();
            error!(
                location = %self.store.location(),
                cursor = %value,
                %err,
                "Failed to persist cursor"
            );
            return Err(err.into());
        }

        debug!(cursor = %value, "Cursor advanced");
        Ok(Some(value))
    }
}
