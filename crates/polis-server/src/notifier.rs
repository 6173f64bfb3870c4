//! [`Notifier`] backed by a broadcast channel.

use polis_core::Notifier;
use polis_types::Envelope;
use tokio::sync::broadcast;
use tracing::trace;

/// Publishes envelopes to every subscribed socket.
///
/// Sending never blocks. With no subscriber connected the envelope is
/// dropped, which is the same outcome as a broadcast to an empty
/// namespace.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Envelope>,
}

impl BroadcastNotifier {
    /// Wrap a sender.
    pub const fn new(tx: broadcast::Sender<Envelope>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, envelope: Envelope) {
        let event = envelope.event.name();
        if self.tx.send(envelope).is_err() {
            trace!(event, "No subscribers, notification dropped");
        }
    }
}
