use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

#[derive(Debug, Default)]
struct InnerMetrics {
    ticks: AtomicU64,
    overlaps_skipped: AtomicU64,
    empty_ticks: AtomicU64,
    rows_delivered: AtomicU64,
    batches_delivered: AtomicU64,
    delivery_failures: AtomicU64,
    tick_errors: AtomicU64,
    cursor_write_failures: AtomicU64,
}

/// Poll loop counters, shared between the loop and whoever reports them.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub overlaps_skipped: u64,
    pub empty_ticks: u64,
    pub rows_delivered: u64,
    pub batches_delivered: u64,
    pub delivery_failures: u64,
    pub tick_errors: u64,
    pub cursor_write_failures: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_ticks(&self) {
        self.inner.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_overlaps(&self) {
        self.inner.overlaps_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_empty(&self) {
        self.inner.empty_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery(&self, rows: u64) {
        self.inner.rows_delivered.fetch_add(rows, Ordering::Relaxed);
        self.inner.batches_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_delivery_failures(&self) {
        self.inner.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tick_errors(&self) {
        self.inner.tick_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cursor_write_failures(&self) {
        self.inner
            .cursor_write_failures
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.inner.ticks.load(Ordering::Relaxed),
            overlaps_skipped: self.inner.overlaps_skipped.load(Ordering::Relaxed),
            empty_ticks: self.inner.empty_ticks.load(Ordering::Relaxed),
            rows_delivered: self.inner.rows_delivered.load(Ordering::Relaxed),
            batches_delivered: self.inner.batches_delivered.load(Ordering::Relaxed),
            delivery_failures: self.inner.delivery_failures.load(Ordering::Relaxed),
            tick_errors: self.inner.tick_errors.load(Ordering::Relaxed),
            cursor_write_failures: self.inner.cursor_write_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ticks={} skipped_overlap={} empty={} batches={} rows={} delivery_failures={} errors={} cursor_write_failures={}",
            self.ticks,
            self.overlaps_skipped,
            self.empty_ticks,
            self.batches_delivered,
            self.rows_delivered,
            self.delivery_failures,
            self.tick_errors,
            self.cursor_write_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let metrics = Metrics::new();
        let other = metrics.clone();

        metrics.increment_ticks();
        other.record_delivery(25);
        other.record_delivery(5);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(snapshot.batches_delivered, 2);
        assert_eq!(snapshot.rows_delivered, 30);
    }
}
