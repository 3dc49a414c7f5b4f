//! Per-key publish/subscribe for live poll updates
//!
//! Each listener owns a bounded `mpsc` buffer. Broadcasting walks the
//! listeners registered under a key and uses `try_send`, so a slow listener
//! loses messages instead of stalling the voter or other listeners.
//!
//! ```text
//!                         Notifier (Arc<Registry>)
//!                 ┌────────────────────────────────────┐
//!                 │ listeners: RwLock<HashMap<Key,     │
//!                 │   HashMap<ListenerId, mpsc::Tx>>>  │
//!                 └─────────────────┬──────────────────┘
//!                                   │ try_send(Bytes)
//!         ┌─────────────────────────┼─────────────────────────┐
//!         ▼                         ▼                         ▼
//!   [Subscription]            [Subscription]            [Subscription]
//!   rx.recv() ──► SSE         rx.recv() ──► SSE         (full: dropped)
//! ```
//!
//! # Zero-Copy Design
//!
//! The payload is a `bytes::Bytes`, so one serialized snapshot is shared by
//! all listeners; each `try_send` only bumps a reference count.
//!
//! The registry lock is separate from the repository lock and is never held
//! across an await point.

pub mod config;
pub mod registry;
pub mod subscription;

pub use config::NotifierConfig;
pub use registry::{BroadcastOutcome, Notifier};
pub use subscription::{ListenerId, Subscription};
