//! Listener handle
//!
//! A `Subscription` owns its bounded inbox and its registration. Dropping it
//! (normally, on error, or because the task awaiting it was cancelled)
//! removes the registration, so an abandoned listener can never linger in
//! the registry.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use super::registry::Registry;

/// Identifier of a single listener within the notifier
pub type ListenerId = u64;

/// A live listener registered under one key
pub struct Subscription {
    key: String,
    id: ListenerId,
    rx: mpsc::Receiver<Bytes>,
    registry: Arc<Registry>,
}

impl Subscription {
    pub(super) fn new(
        key: String,
        id: ListenerId,
        rx: mpsc::Receiver<Bytes>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            key,
            id,
            rx,
            registry,
        }
    }

    /// Key this listener is registered under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Listener identifier, usable with `Notifier::unsubscribe`
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Wait for the next message
    ///
    /// Cancel-safe: dropping the future loses no message. Returns `None`
    /// once the listener has been unregistered and its buffer drained.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Take the next message if one is already buffered
    pub fn try_recv(&mut self) -> Option<Bytes> {
        self.rx.try_recv().ok()
    }

    /// Unregister now instead of waiting for drop
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(&self.key, self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}
