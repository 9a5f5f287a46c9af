use crate::{actor::messages::PollMsg, error::RuntimeError, poll::PollLoop};
use futures::FutureExt;
use std::{panic::AssertUnwindSafe, sync::Arc};
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        watch,
    },
    task::JoinHandle,
};
use tracing::{debug, error, info};

/// Handle used by the scheduler and the coordinator to reach the poll actor.
#[derive(Debug, Clone)]
pub struct PollRef {
    tx: mpsc::Sender<PollMsg>,
    finished: watch::Receiver<u64>,
}

impl PollRef {
    /// Counts handled ticks. Changes once per tick, after the tick returns.
    pub fn finished_ticks(&self) -> watch::Receiver<u64> {
        self.finished.clone()
    }

    pub async fn send(&self, msg: PollMsg) -> Result<(), RuntimeError> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| RuntimeError::MailboxClosed)
    }

    /// Never waits: a full mailbox means a tick is already pending.
    pub fn try_send(&self, msg: PollMsg) -> Result<(), RuntimeError> {
        self.tx.try_send(msg).map_err(|err| match err {
            TrySendError::Full(_) => RuntimeError::MailboxFull,
            TrySendError::Closed(_) => RuntimeError::MailboxClosed,
        })
    }
}

/// Runs ticks one after another off a bounded mailbox.
pub struct PollActor {
    poller: Arc<PollLoop>,
    stopped: bool,
    finished: watch::Sender<u64>,
}

impl PollActor {
    pub fn new(poller: Arc<PollLoop>) -> Self {
        PollActor {
            poller,
            stopped: false,
            finished: watch::Sender::new(0),
        }
    }

    /// Spawns the mailbox loop. The task ends when every `PollRef` is dropped.
    pub fn spawn(mut self, mailbox_capacity: usize) -> (PollRef, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(mailbox_capacity.max(1));
        let finished = self.finished.subscribe();

        let handle = tokio::spawn(async move {
            info!(
                cursor_store = %self.poller.store().location(),
                interval_ms = self.poller.backoff().current().as_millis() as u64,
                "Poll actor started"
            );

            while let Some(msg) = rx.recv().await {
                self.handle(msg).await;
            }

            info!(
                metrics = %self.poller.counters().snapshot(),
                "Poll actor stopped"
            );
        });

        (PollRef { tx, finished }, handle)
    }

    pub async fn handle(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Tick => {
                if self.stopped {
                    debug!("Poll actor stopped, ignoring tick");
                } else {
                    self.tick().await;
                }
                self.finished.send_modify(|count| *count += 1);
            }
            PollMsg::Stop => {
                info!("Stopping poll actor");
                self.stopped = true;
            }
        }
    }

    /// A panic inside the tick is reported here and never reaches the mailbox loop.
    async fn tick(&self) {
        match AssertUnwindSafe(self.poller.tick()).catch_unwind().await {
            Ok(Ok(outcome)) => debug!(?outcome, "Tick finished"),
            Ok(Err(err)) => debug!(%err, "Tick aborted"),
            Err(panic) => {
                self.poller.counters().increment_tick_errors();
                error!(reason = panic_message(&*panic), "Tick panicked");
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
