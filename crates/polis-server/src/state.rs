//! Shared application state for the Polis server.
//!
//! [`AppState`] owns the notification broadcast channel and the
//! [`Dispatcher`] that runs coordinator tasks. Handlers and sockets only
//! ever trigger tasks and subscribe to notifications; they never touch
//! session state directly.

use std::sync::Arc;
use std::time::Duration;

use polis_core::config::SessionConfig;
use polis_core::{Coordinator, Dispatcher, Task};
use polis_sim::CityFactory;
use polis_types::Envelope;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::notifier::BroadcastNotifier;

/// Capacity of the notification broadcast channel.
///
/// A socket that falls behind by more than this many envelopes receives a
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
const BROADCAST_CAPACITY: usize = 1024;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState {
    /// Broadcast sender every socket subscribes to.
    pub tx: broadcast::Sender<Envelope>,
    /// Task dispatcher over the session coordinator.
    pub dispatcher: Dispatcher<CityFactory>,
}

impl AppState {
    /// Create the state: a broadcast channel, a coordinator publishing into
    /// it, and a dispatcher armed with the configured vote timeout.
    pub fn new(factory: CityFactory, settings: &SessionConfig) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let notifier = Arc::new(BroadcastNotifier::new(tx.clone()));
        let coordinator = Arc::new(Coordinator::new(factory, settings, notifier));
        let vote_timeout = settings.vote_timeout_secs.map(Duration::from_secs);
        Self {
            tx,
            dispatcher: Dispatcher::new(coordinator, vote_timeout),
        }
    }

    /// Subscribe to all notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }

    /// Trigger `task` without waiting for it.
    pub fn dispatch(&self, task: Task) -> JoinHandle<()> {
        self.dispatcher.dispatch(task)
    }

    /// The session coordinator, for read-only queries.
    pub const fn coordinator(&self) -> &Arc<Coordinator<CityFactory>> {
        self.dispatcher.coordinator()
    }
}
