//! Outbound notification channel.
//!
//! The coordinator publishes [`Envelope`]s and never waits for delivery.
//! The server crate backs [`Notifier`] with a broadcast channel feeding the
//! WebSocket namespaces; tests use [`MemoryNotifier`].

use std::sync::{Mutex, PoisonError};

use polis_types::{Envelope, Event, Namespace, PlayerId};

/// Fire-and-forget publish primitive.
pub trait Notifier: Send + Sync {
    /// Publish an envelope. Must not block.
    fn publish(&self, envelope: Envelope);

    /// Publish `event` to every connection on `namespace`.
    fn broadcast(&self, namespace: Namespace, event: Event) {
        self.publish(Envelope::broadcast(namespace, event));
    }

    /// Publish `event` to a single connection on `namespace`.
    fn send(&self, namespace: Namespace, event: Event, target: PlayerId) {
        self.publish(Envelope::to(namespace, target, event));
    }
}

/// Notifier that records every envelope in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Envelope>>,
}

impl MemoryNotifier {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Envelope> {
        std::mem::take(&mut *self.sent.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of everything recorded so far.
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wire names of everything recorded so far, in publish order.
    pub fn names(&self) -> Vec<&'static str> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|env| env.event.name())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn publish(&self, envelope: Envelope) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope);
    }
}
