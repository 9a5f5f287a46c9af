/// Messages for the poll actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMsg {
    /// Run one poll-extract-deliver cycle.
    Tick,

    /// Ignore further ticks. The mailbox drains and the actor exits once
    /// every sender is gone.
    Stop,
}
