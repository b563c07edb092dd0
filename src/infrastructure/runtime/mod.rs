//! Runtime infrastructure - Tokio runtime bridge for the polling tasks

mod bridge;
mod clock;
mod poller;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
pub use poller::RefreshPolicy;
