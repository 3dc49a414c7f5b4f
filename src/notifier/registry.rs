//! Listener registry and fan-out

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::config::NotifierConfig;
use super::subscription::{ListenerId, Subscription};

/// Listener senders grouped by key
type ListenerMap = HashMap<String, HashMap<ListenerId, mpsc::Sender<Bytes>>>;

/// Result of a single broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Listeners that accepted the payload
    pub delivered: usize,
    /// Listeners whose buffer was full
    pub dropped: usize,
}

/// Shared registry state
///
/// Uses a synchronous lock so that `Subscription::drop` can unregister
/// without an executor. No await point is ever reached while it is held.
pub(super) struct Registry {
    listeners: RwLock<ListenerMap>,
    next_id: AtomicU64,
    config: NotifierConfig,
}

impl Registry {
    fn read(&self) -> RwLockReadGuard<'_, ListenerMap> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListenerMap> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove one listener, pruning the key when it becomes empty
    pub(super) fn remove(&self, key: &str, id: ListenerId) -> bool {
        let mut listeners = self.write();

        let Some(subs) = listeners.get_mut(key) else {
            return false;
        };

        let removed = subs.remove(&id).is_some();
        let remaining = subs.len();
        if remaining == 0 {
            listeners.remove(key);
        }

        if removed {
            tracing::debug!(
                key = %key,
                listener = id,
                remaining = remaining,
                "Listener unsubscribed"
            );
        }

        removed
    }
}

/// Per-key publish/subscribe fan-out
///
/// Each listener gets its own bounded buffer. Broadcasting never waits: a
/// listener whose buffer is full simply misses that message, and other
/// listeners are unaffected. Cloning yields another handle to the same
/// registry.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Registry>,
}

impl Notifier {
    /// Create a notifier with default configuration
    pub fn new() -> Self {
        Self::with_config(NotifierConfig::default())
    }

    /// Create a notifier with custom configuration
    pub fn with_config(config: NotifierConfig) -> Self {
        Self {
            inner: Arc::new(Registry {
                listeners: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Get the notifier configuration
    pub fn config(&self) -> &NotifierConfig {
        &self.inner.config
    }

    /// Register a new listener for `key`
    ///
    /// The returned handle unregisters itself when dropped.
    pub fn subscribe(&self, key: &str) -> Subscription {
        let (tx, rx) = mpsc::channel(self.inner.config.buffer_capacity);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let total = {
            let mut listeners = self.inner.write();
            let subs = listeners.entry(key.to_string()).or_default();
            subs.insert(id, tx);
            subs.len()
        };

        tracing::info!(key = %key, listener = id, total = total, "New listener");

        Subscription::new(key.to_string(), id, rx, Arc::clone(&self.inner))
    }

    /// Unregister a listener
    ///
    /// Unknown keys or ids are ignored. Returns whether a listener was
    /// removed.
    pub fn unsubscribe(&self, key: &str, id: ListenerId) -> bool {
        self.inner.remove(key, id)
    }

    /// Unregister every listener of `key`
    ///
    /// Each affected subscription receives whatever is still buffered and
    /// then sees the end of its stream. Returns the number of listeners
    /// removed.
    pub fn close(&self, key: &str) -> usize {
        let removed = self.inner.write().remove(key).map_or(0, |subs| subs.len());

        if removed > 0 {
            tracing::info!(key = %key, listeners = removed, "Listeners closed");
        }

        removed
    }

    /// Deliver `payload` to every listener of `key` without blocking
    pub fn broadcast(&self, key: &str, payload: impl Into<Bytes>) -> BroadcastOutcome {
        let payload = payload.into();
        let mut outcome = BroadcastOutcome::default();

        let listeners = self.inner.read();
        let Some(subs) = listeners.get(key) else {
            return outcome;
        };

        for (id, tx) in subs {
            match tx.try_send(payload.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    outcome.dropped += 1;
                    tracing::trace!(key = %key, listener = id, "Listener buffer full, message dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    outcome.dropped += 1;
                }
            }
        }

        tracing::debug!(
            key = %key,
            delivered = outcome.delivered,
            dropped = outcome.dropped,
            "Broadcast"
        );

        outcome
    }

    /// Number of listeners registered under `key`
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner.read().get(key).map_or(0, HashMap::len)
    }

    /// Number of keys with at least one listener
    pub fn key_count(&self) -> usize {
        self.inner.read().len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
