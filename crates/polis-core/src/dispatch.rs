//! Fire-and-forget task execution.
//!
//! The [`Dispatcher`] runs each [`Task`] on its own Tokio task, with no
//! ordering between tasks and no result returned to the caller. When a
//! ballot opens and a vote timeout is configured, it arms a timer that
//! triggers `EndVote` for that round.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::coordinator::{Completion, Coordinator};
use crate::engine::SimulationFactory;
use crate::task::Task;

/// Spawns tasks against a shared [`Coordinator`].
pub struct Dispatcher<F: SimulationFactory> {
    coordinator: Arc<Coordinator<F>>,
    vote_timeout: Option<Duration>,
}

impl<F: SimulationFactory> Clone for Dispatcher<F> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            vote_timeout: self.vote_timeout,
        }
    }
}

impl<F: SimulationFactory> Dispatcher<F> {
    /// Create a dispatcher. `vote_timeout` of `None` disables the timer.
    pub const fn new(coordinator: Arc<Coordinator<F>>, vote_timeout: Option<Duration>) -> Self {
        Self {
            coordinator,
            vote_timeout,
        }
    }

    /// The coordinator tasks run against.
    pub const fn coordinator(&self) -> &Arc<Coordinator<F>> {
        &self.coordinator
    }

    /// Run `task` in the background.
    ///
    /// The returned handle is only useful to tests; callers are expected to
    /// drop it.
    pub fn dispatch(&self, task: Task) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            if let Completion::VoteOpened { round } = this.coordinator.run(task).await {
                this.arm_vote_timeout(round);
            }
        })
    }

    fn arm_vote_timeout(&self, round: u64) {
        let Some(timeout) = self.vote_timeout else {
            return;
        };
        debug!(round, timeout_secs = timeout.as_secs(), "Vote timeout armed");
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            coordinator
                .run(Task::EndVote {
                    round: Some(round),
                })
                .await;
        });
    }
}
