//! Mutex-guarded async facade over [`SessionState`].
//!
//! Every operation takes the single session lock, runs the synchronous
//! state transition, releases the lock, and only then publishes the
//! resulting notifications. Slow work (loading a population, building a
//! simulation) happens outside the lock; [`SessionState::install`]
//! re-checks for a concurrent setup before committing.

use std::sync::Arc;

use polis_types::{PlayerId, Proposal};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::engine::SimulationFactory;
use crate::error::SessionError;
use crate::lifecycle::rejection;
use crate::notify::Notifier;
use crate::session::{Outbox, SessionState, SessionStatus};
use crate::task::Task;

/// How a task finished, for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The task ran (possibly as a no-op).
    Done,
    /// A ballot was opened with this round number.
    VoteOpened {
        /// The new round.
        round: u64,
    },
    /// The task failed; the failure has been logged.
    Failed,
}

/// The session coordinator.
pub struct Coordinator<F: SimulationFactory> {
    factory: F,
    max_population: usize,
    state: Mutex<SessionState<F::Simulation>>,
    notifier: Arc<dyn Notifier>,
}

impl<F: SimulationFactory> Coordinator<F> {
    /// Create a coordinator with no active session.
    pub fn new(factory: F, settings: &SessionConfig, notifier: Arc<dyn Notifier>) -> Self {
        let state = settings
            .seed
            .map_or_else(SessionState::new, SessionState::seeded);
        Self {
            factory,
            max_population: settings.max_population,
            state: Mutex::new(state),
            notifier,
        }
    }

    fn publish(&self, outbox: Outbox) {
        for envelope in outbox {
            self.notifier.publish(envelope);
        }
    }

    /// Run one task, absorbing any error into the log.
    pub async fn run(&self, task: Task) -> Completion {
        let name = task.name();
        debug!(task = name, "Running task");
        match self.execute(task).await {
            Ok(completion) => completion,
            Err(err) if err.is_capacity() => {
                warn!(task = name, error = %err, "Task could not be honored");
                Completion::Failed
            }
            Err(err) => {
                error!(task = name, error = %err, "Task failed");
                Completion::Failed
            }
        }
    }

    /// Run one task and report its error.
    ///
    /// # Errors
    ///
    /// Returns the [`SessionError`] of the failed operation.
    pub async fn execute(&self, task: Task) -> Result<Completion, SessionError> {
        match task {
            Task::Setup { config } => {
                let config = serde_json::from_value(config)?;
                self.setup(config).await?;
            }
            Task::AddClient { id } => self.add_client(&id).await,
            Task::Step => self.step().await?,
            Task::ChooseProposer => self.choose_proposer().await,
            Task::StartVote { proposal } => {
                let round = self.start_vote(proposal).await?;
                return Ok(Completion::VoteOpened { round });
            }
            Task::EndVote { round } => self.end_vote(round).await,
            Task::RecordVote { vote, player } => self.record_vote(vote, player).await,
            Task::AddPlayer { id } => self.add_player(id).await?,
            Task::RemovePlayer { id } => self.remove_player(&id).await,
            Task::Reset => self.reset().await,
        }
        Ok(Completion::Done)
    }

    /// Create a session unless one already exists.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Engine`] if the population cannot be loaded
    /// or the simulation cannot be built. No state is changed.
    pub async fn setup(&self, config: F::Config) -> Result<(), SessionError> {
        if self.state.lock().await.is_active() {
            debug!("setup ignored: session already active");
            return Ok(());
        }
        info!(?config, "Setting up simulation");
        let mut population = self.factory.load_population()?;
        population.truncate(self.max_population);
        let sim = self.factory.create(population, config)?;

        let outbox = self.state.lock().await.install(sim);
        self.publish(outbox);
        Ok(())
    }

    /// Sync a newly connected observer.
    pub async fn add_client(&self, client: &PlayerId) {
        let outbox = self.state.lock().await.client_sync(client);
        self.publish(outbox);
    }

    /// Advance the simulation by one month.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSession`] before setup.
    pub async fn step(&self) -> Result<(), SessionError> {
        let outbox = self.state.lock().await.step()?;
        self.publish(outbox);
        Ok(())
    }

    /// Offer proposal options to a random player.
    pub async fn choose_proposer(&self) {
        let outbox = self.state.lock().await.choose_proposer();
        self.publish(outbox);
    }

    /// Open a ballot, returning its round number.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSession`] before setup.
    pub async fn start_vote(&self, proposal: Proposal) -> Result<u64, SessionError> {
        let (outbox, round) = self.state.lock().await.start_vote(proposal)?;
        self.publish(outbox);
        Ok(round)
    }

    /// Force-resolve the open ballot (or only `round`, if given).
    pub async fn end_vote(&self, round: Option<u64>) {
        let outbox = self.state.lock().await.end_vote(round);
        self.publish(outbox);
    }

    /// Record a vote.
    pub async fn record_vote(&self, vote: bool, player: PlayerId) {
        let outbox = self.state.lock().await.record_vote(player, vote);
        self.publish(outbox);
    }

    /// Admit a player, telling them if no persona is left.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoUnboundPersona`] when the population is
    /// exhausted.
    pub async fn add_player(&self, player: PlayerId) -> Result<(), SessionError> {
        let result = self.state.lock().await.add_player(player.clone());
        match result {
            Ok(outbox) => {
                self.publish(outbox);
                Ok(())
            }
            Err(err) => {
                if err.is_capacity() {
                    self.notifier.publish(rejection(player));
                }
                Err(err)
            }
        }
    }

    /// Release a player.
    pub async fn remove_player(&self, player: &PlayerId) {
        let outbox = self.state.lock().await.remove_player(player);
        self.publish(outbox);
    }

    /// Tear the session down.
    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    /// Read-only status projection.
    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status()
    }

    /// Whether a session is active.
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.is_active()
    }

    /// Run `f` against the locked state. Intended for inspection.
    pub async fn inspect<R>(&self, f: impl FnOnce(&SessionState<F::Simulation>) -> R) -> R {
        let state = self.state.lock().await;
        f(&*state)
    }
}
