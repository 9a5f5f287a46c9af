use crate::{
    actor::{messages::PollMsg, poller::PollRef},
    error::RuntimeError,
    poll::PollLoop,
};
use std::sync::Arc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Emits a tick after every poll interval. At most one tick is in flight:
/// intervals that elapse while it runs are dropped and counted as overlaps,
/// and the next wait starts from `backoff.current()` once it has finished.
pub struct TickScheduler {
    poll_ref: PollRef,
    poller: Arc<PollLoop>,
    cancel_token: CancellationToken,
}

impl TickScheduler {
    pub fn new(poll_ref: PollRef, poller: Arc<PollLoop>, cancel_token: CancellationToken) -> Self {
        Self {
            poll_ref,
            poller,
            cancel_token,
        }
    }

    /// Runs until cancelled or until the poll actor goes away.
    pub async fn run(self) {
        let backoff = self.poller.backoff();
        info!(
            interval_ms = backoff.current().as_millis() as u64,
            "Tick scheduler started"
        );

        let mut finished = self.poll_ref.finished_ticks();
        let mut in_flight = false;

        loop {
            let delay = backoff.current();
            tokio::select! {
                _ = self.cancel_token.cancelled() => break,
                changed = finished.changed(), if in_flight => {
                    if changed.is_err() {
                        warn!("Poll actor gone, stopping scheduler");
                        break;
                    }
                    in_flight = false;
                    continue;
                }
                _ = time::sleep(delay) => {}
            }

            if in_flight {
                self.poller.counters().increment_overlaps();
                debug!(
                    interval_ms = delay.as_millis() as u64,
                    "Already executing, skipping this cycle"
                );
                continue;
            }

            match self.poll_ref.try_send(PollMsg::Tick) {
                Ok(()) => in_flight = true,
                Err(RuntimeError::MailboxFull) => {
                    self.poller.counters().increment_overlaps();
                    debug!("Poll actor mailbox full, skipping this cycle");
                }
                Err(_) => {
                    warn!("Poll actor mailbox closed, stopping scheduler");
                    break;
                }
            }
        }

        info!("Tick scheduler stopped");
    }
}
