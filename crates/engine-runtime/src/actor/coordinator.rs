use crate::{
    actor::{
        messages::PollMsg,
        poller::{PollActor, PollRef},
        scheduler::TickScheduler,
    },
    error::RuntimeError,
    poll::PollLoop,
};
use engine_core::metrics::MetricsSnapshot;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The scheduler sends a tick only once the previous one has finished.
const MAILBOX_CAPACITY: usize = 1;

/// Wires the tick scheduler to the poll actor and owns both tasks.
pub struct PollCoordinator {
    poller: Arc<PollLoop>,
    poll_ref: PollRef,
    actor_handle: JoinHandle<()>,
    scheduler_handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl PollCoordinator {
    pub fn start(poller: Arc<PollLoop>, cancel_token: CancellationToken) -> Self {
        let (poll_ref, actor_handle) = PollActor::new(poller.clone()).spawn(MAILBOX_CAPACITY);

        let scheduler = TickScheduler::new(poll_ref.clone(), poller.clone(), cancel_token.clone());
        let scheduler_handle = tokio::spawn(scheduler.run());

        Self {
            poller,
            poll_ref,
            actor_handle,
            scheduler_handle,
            cancel_token,
        }
    }

    /// Blocks until the token is cancelled, then stops both tasks. The tick
    /// in flight, if any, is allowed to finish.
    pub async fn run_until_cancelled(self) -> Result<MetricsSnapshot, RuntimeError> {
        self.cancel_token.cancelled().await;
        self.stop().await
    }

    pub async fn stop(self) -> Result<MetricsSnapshot, RuntimeError> {
        info!("Stopping forwarder");
        self.cancel_token.cancel();
        self.scheduler_handle.await?;

        if let Err(err) = self.poll_ref.send(PollMsg::Stop).await {
            error!(%err, "Failed to send stop to poll actor");
        }
        drop(self.poll_ref);
        self.actor_handle.await?;

        let snapshot = self.poller.counters().snapshot();
        info!(metrics = %snapshot, "Forwarder stopped");
        Ok(snapshot)
    }
}
