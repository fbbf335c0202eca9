//! Polling waiters for server-side work
//!
//! Both waiters share one loop: fetch, stop if terminal, fail if the
//! deadline has passed, sleep a fixed interval, report progress, repeat.
//! Time is read from `tokio::time`, so a paused test runtime drives the
//! loop without real sleeping.

use crate::client::Client;
use crate::error::{ApiError, Result};
use crate::progress::PollTick;
use crate::resources::action::{ActionId, GenericResponse};
use crate::resources::stack::Stack;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{info, instrument, warn};

/// Poll cadence and overall deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollOptions {
    /// Cadence used by [`Client::wait_stack_build`]
    pub const STACK_BUILD: PollOptions = PollOptions {
        interval: Duration::from_secs(60),
        timeout: Duration::from_secs(3 * 60 * 60),
    };

    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Client {
    /// Wait for an asynchronous action to finish.
    ///
    /// The action is terminal once the server records `finished_at`; its
    /// `finished_success`/`finished_message` become the returned
    /// [`GenericResponse`]. A failed action is still a successful wait.
    #[instrument(skip(self))]
    pub async fn wait_stack_async_action(
        &self,
        action_id: &ActionId,
        stack_uid: &str,
        interval: Duration,
        timeout: Duration,
        show_progress: bool,
    ) -> Result<GenericResponse> {
        let finished = self
            .poll_until(
                format!("action:{}", action_id),
                PollOptions::new(interval, timeout),
                show_progress,
                || self.stack_async_action(stack_uid, action_id),
                |action| action.is_finished(),
                |action| action.state_label(),
            )
            .await?;

        let outcome = finished.outcome();
        info!(ok = outcome.ok, "action finished: {}", outcome.message);
        Ok(outcome)
    }

    /// Wait for a stack build to settle, polling once a minute for up to
    /// three hours.
    ///
    /// Terminal when the status is one of deployed / failed / unable to
    /// analyze and the health is one of impaired / healthy / failed.
    pub async fn wait_stack_build(&self, stack_uid: &str) -> Result<Stack> {
        self.wait_stack_build_with(stack_uid, PollOptions::STACK_BUILD)
            .await
    }

    /// [`Client::wait_stack_build`] with a caller-chosen cadence
    #[instrument(skip(self))]
    pub async fn wait_stack_build_with(
        &self,
        stack_uid: &str,
        options: PollOptions,
    ) -> Result<Stack> {
        let stack = self
            .poll_until(
                format!("stack:{}", stack_uid),
                options,
                true,
                || self.find_stack_by_uid(stack_uid),
                Stack::is_build_complete,
                |stack| format!("{} / {}", stack.status(), stack.health()),
            )
            .await?;

        info!(status = stack.status(), health = stack.health(), "stack build settled");
        Ok(stack)
    }

    async fn poll_until<T, F, Fut, Done, Describe>(
        &self,
        target: String,
        options: PollOptions,
        report: bool,
        mut fetch: F,
        is_terminal: Done,
        describe: Describe,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        Done: Fn(&T) -> bool,
        Describe: Fn(&T) -> String,
    {
        let started = Instant::now();
        let deadline = started + options.timeout;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let current = fetch().await?;
            if is_terminal(&current) {
                return Ok(current);
            }

            if Instant::now() > deadline {
                warn!(%target, attempt, "gave up waiting after {:?}", options.timeout);
                return Err(ApiError::Timeout(options.timeout));
            }

            sleep(options.interval).await;

            if report {
                self.progress().on_poll(&PollTick {
                    target: target.clone(),
                    attempt,
                    elapsed: started.elapsed(),
                    state: describe(&current),
                });
            }
        }
    }
}
