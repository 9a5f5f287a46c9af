pub mod coordinator;
pub mod messages;
pub mod poller;
pub mod scheduler;
