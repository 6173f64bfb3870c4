//! Session coordinator for the Polis city simulation.
//!
//! This crate owns every piece of mutable session state: the simulation
//! handle, the roster of players bound to personas, the wait queue of
//! players who arrived before a session existed, and the open proposal with
//! its ballot. Triggers arrive as independent [`Task`]s with at-least-once,
//! unordered delivery; results leave only through the [`Notifier`].
//!
//! # Modules
//!
//! - [`engine`] -- [`Simulation`] and [`SimulationFactory`] traits, the seam
//!   to the simulation engine.
//! - [`session`] -- [`SessionState`], the synchronous state machine. Each
//!   operation mutates state and returns the notifications to publish.
//! - [`lifecycle`] -- Setup, client sync, monthly step, reset.
//! - [`registry`] -- Admitting, queuing and removing players.
//! - [`voting`] -- Proposer selection, ballots, tallies and resolution.
//! - [`ballot`] -- First-vote-wins ballot.
//! - [`coordinator`] -- [`Coordinator`], the mutex-guarded async facade that
//!   publishes outside the critical section.
//! - [`dispatch`] -- [`Dispatcher`], fire-and-forget task execution and the
//!   vote timeout timer.
//! - [`task`] -- The [`Task`] command enum.
//! - [`notify`] -- The [`Notifier`] trait and an in-memory recorder.
//! - [`config`] -- Configuration loading from `polis-config.yaml`.
//! - [`error`] -- Error taxonomy.
//!
//! [`Simulation`]: engine::Simulation
//! [`SimulationFactory`]: engine::SimulationFactory
//! [`SessionState`]: session::SessionState
//! [`Coordinator`]: coordinator::Coordinator
//! [`Dispatcher`]: dispatch::Dispatcher
//! [`Task`]: task::Task
//! [`Notifier`]: notify::Notifier

pub mod ballot;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod registry;
pub mod session;
pub mod task;
pub mod voting;

pub use coordinator::{Completion, Coordinator};
pub use dispatch::Dispatcher;
pub use engine::{Simulation, SimulationFactory};
pub use error::{EngineError, SessionError};
pub use notify::{MemoryNotifier, Notifier};
pub use session::{SessionState, SessionStatus};
pub use task::Task;
