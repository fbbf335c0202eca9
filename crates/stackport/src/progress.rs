//! Progress reporting for the polling waiters
//!
//! The waiters never print anything themselves. Each poll that does not
//! reach a terminal state is reported to the client's [`ProgressObserver`].

use std::time::Duration;

/// One non-terminal poll
#[derive(Debug, Clone)]
pub struct PollTick {
    /// What is being waited on, e.g. `stack:abc123` or `action:42`
    pub target: String,
    /// 1-based poll counter
    pub attempt: u32,
    pub elapsed: Duration,
    /// Human-readable state observed on this poll
    pub state: String,
}

pub trait ProgressObserver: Send + Sync {
    fn on_poll(&self, tick: &PollTick);
}

/// Discards every tick
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_poll(&self, _tick: &PollTick) {}
}

/// Reports ticks as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_poll(&self, tick: &PollTick) {
        tracing::info!(
            waiting_on = %tick.target,
            attempt = tick.attempt,
            elapsed_secs = tick.elapsed.as_secs(),
            "still waiting: {}",
            tick.state
        );
    }
}
