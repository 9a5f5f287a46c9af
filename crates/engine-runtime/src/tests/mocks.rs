use crate::poll::PollLoop;
use async_trait::async_trait;
use connectors::{http::error::TransmitError, sql::base::error::DbError};
use engine_core::{
    backoff::BackoffController,
    connectors::{sink::Transmitter, source::DataSource},
    error::{SinkError, SourceError, StateStoreError},
    format::RowFormatter,
    state::CursorStore,
};
use model::{core::value::Value, records::batch::ExtractionBatch, records::row::RowData};
use planner::query::{offsets::QueryBuilder, template::QueryTemplate};
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::{sync::Notify, time::Instant};

pub fn row(id: Value) -> RowData {
    [
        ("Id".to_string(), id),
        ("Message".to_string(), Value::String("login".into())),
    ]
    .into_iter()
    .collect()
}

pub fn batch(ids: &[i64]) -> ExtractionBatch {
    ExtractionBatch::new(ids.iter().map(|id| row(Value::Int(*id))).collect())
}

/// Replays queued results, then keeps returning `fallback`.
pub struct MockSource {
    results: Mutex<VecDeque<Result<ExtractionBatch, String>>>,
    fallback: ExtractionBatch,
    queries: Mutex<Vec<String>>,
    panic_once: AtomicBool,
    hold: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl MockSource {
    pub fn new(fallback: ExtractionBatch) -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            fallback,
            queries: Mutex::new(Vec::new()),
            panic_once: AtomicBool::new(false),
            hold: Mutex::new(None),
        }
    }

    pub fn then(self, result: Result<ExtractionBatch, &str>) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(result.map_err(str::to_string));
        self
    }

    pub fn panicking_once(self) -> Self {
        self.panic_once.store(true, Ordering::SeqCst);
        self
    }

    /// The first query signals `entered` and then waits for `release`.
    pub fn holding(self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        *self.hold.lock().unwrap() = Some((entered, release));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn ensure_connected(&self) -> Result<bool, SourceError> {
        Ok(false)
    }

    async fn execute_query(&self, sql: &str) -> Result<ExtractionBatch, SourceError> {
        self.queries.lock().unwrap().push(sql.to_string());

        if self.panic_once.swap(false, Ordering::SeqCst) {
            panic!("driver exploded");
        }

        let hold = self.hold.lock().unwrap().take();
        if let Some((entered, release)) = hold {
            entered.notify_one();
            release.notified().await;
        }

        let next = self.results.lock().unwrap().pop_front();
        match next {
            Some(Ok(batch)) => Ok(batch),
            Some(Err(reason)) => Err(SourceError::Query(DbError::Unknown(reason))),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Answers with queued statuses, then `fallback` (200 unless set).
/// `None` simulates a transport fault.
#[derive(Default)]
pub struct MockSink {
    statuses: Mutex<VecDeque<Option<u16>>>,
    fallback: Option<u16>,
    latency: Duration,
    sent: Mutex<Vec<String>>,
    timings: Mutex<Vec<(Instant, Instant)>>,
}

impl MockSink {
    pub fn answering(statuses: &[Option<u16>]) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            ..Default::default()
        }
    }

    /// Every send takes `latency` and answers `status`.
    pub fn slow(latency: Duration, status: u16) -> Self {
        Self {
            fallback: Some(status),
            latency,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Start and end of every send, in (paused) tokio time.
    pub fn timings(&self) -> Vec<(Instant, Instant)> {
        self.timings.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transmitter for MockSink {
    async fn send(&self, payload: String) -> Result<u16, SinkError> {
        let started = Instant::now();
        self.sent.lock().unwrap().push(payload);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.timings.lock().unwrap().push((started, Instant::now()));

        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(Some(status)) => Ok(status),
            Some(None) => Err(SinkError::Transmit(TransmitError::MissingBaseAddress)),
            None => Ok(self.fallback.unwrap_or(200)),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    value: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
            ..Default::default()
        }
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CursorStore for MemoryStore {
    async fn load(&self) -> Result<Option<String>, StateStoreError> {
        Ok(self.value())
    }

    async fn save(&self, value: &str) -> Result<(), StateStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StateStoreError::Io(std::io::Error::other("disk full")));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.value.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<bool, StateStoreError> {
        Ok(self.value.lock().unwrap().take().is_some())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

pub struct Harness {
    pub source: Arc<MockSource>,
    pub sink: Arc<MockSink>,
    pub store: Arc<MemoryStore>,
    pub poller: Arc<PollLoop>,
}

impl Harness {
    pub fn new(source: MockSource, sink: MockSink, store: MemoryStore) -> Self {
        Self::with_builder(
            source,
            sink,
            store,
            QueryBuilder::new(QueryTemplate::default(), "Id"),
            BackoffController::from_millis(1000, 8000),
        )
    }

    pub fn with_builder(
        source: MockSource,
        sink: MockSink,
        store: MemoryStore,
        builder: QueryBuilder,
        backoff: BackoffController,
    ) -> Self {
        let source = Arc::new(source);
        let sink = Arc::new(sink);
        let store = Arc::new(store);
        let poller = PollLoop::new(
            source.clone(),
            sink.clone(),
            store.clone(),
            builder,
            RowFormatter::new().with_field("SourceHost", "db01"),
            Arc::new(backoff),
        );

        Self {
            source,
            sink,
            store,
            poller: Arc::new(poller),
        }
    }

    pub fn interval_ms(&self) -> u128 {
        self.poller.backoff().current().as_millis()
    }
}
