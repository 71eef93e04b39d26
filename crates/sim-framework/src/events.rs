//! # Event Fabric
//!
//! Publish/subscribe registry used by actors to announce state changes.
//!
//! Every actor owns one [`EventBus`]. Interested parties call
//! [`EventBus::subscribe`] and receive a [`Subscription`] that yields a clone of each
//! event published afterwards. Fan-out is an explicit list of listeners rather than
//! a broadcast ring, so a slow listener never loses events and a dropped listener
//! is simply pruned on the next publish.
//!
//! ```rust
//! use sim_framework::events::EventBus;
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus = EventBus::new("furnace");
//!     let mut first = bus.subscribe();
//!     let mut second = bus.subscribe();
//!
//!     bus.publish("heated".to_string());
//!
//!     assert_eq!(first.recv().await.as_deref(), Some("heated"));
//!     assert_eq!(second.recv().await.as_deref(), Some("heated"));
//! }
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// Cloneable handle to a listener registry.
#[derive(Debug)]
pub struct EventBus<E> {
    label: Arc<str>,
    listeners: Arc<Mutex<Vec<mpsc::UnboundedSender<E>>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: Clone + Send + 'static> EventBus<E> {
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a new listener. Events published before this call are not replayed.
    pub fn subscribe(&self) -> Subscription<E> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.listeners.lock().push(sender);
        Subscription { receiver }
    }

    /// Delivers `event` to every live listener.
    ///
    /// Never blocks. Listeners whose subscription was dropped are removed.
    pub fn publish(&self, event: E) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| listener.send(event.clone()).is_ok());
        trace!(bus = %self.label, listeners = listeners.len(), "Published");
    }

    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| !listener.is_closed());
        listeners.len()
    }
}

/// Receiving half of one listener registration.
#[derive(Debug)]
pub struct Subscription<E> {
    receiver: mpsc::UnboundedReceiver<E>,
}

impl<E> Subscription<E> {
    /// Waits for the next event. Returns `None` once the bus and all its clones are gone.
    pub async fn recv(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Returns an already queued event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.receiver.try_recv().ok()
    }
}
