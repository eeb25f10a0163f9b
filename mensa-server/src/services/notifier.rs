//! Event Notifier Service
//!
//! In-process bus delivering domain events and sync signals to
//! subscribers. Delivery is fire-and-forget and best-effort: a publish
//! with no listeners (or a lagging listener) never fails the operation
//! that produced the event.

use shared::message::BusMessage;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast-channel notifier
#[derive(Debug, Clone)]
pub struct NotifierService {
    tx: broadcast::Sender<BusMessage>,
}

impl NotifierService {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a message; returns the number of subscribers reached.
    pub fn publish(&self, msg: BusMessage) -> usize {
        match self.tx.send(msg) {
            Ok(n) => n,
            // No active subscribers - the event is dropped, not an error
            Err(_) => 0,
        }
    }

    /// Subscribe to the bus
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }
}

impl Default for NotifierService {
    fn default() -> Self {
        Self::new()
    }
}
