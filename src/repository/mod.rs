//! Concurrency-safe poll storage
//!
//! ```text
//!               Arc<PollRepository>
//!          ┌───────────────────────────┐
//!          │ table: RwLock<            │
//!          │   HashMap<Id, PollEntry>  │
//!          │ >                         │
//!          └─────────────┬─────────────┘
//!                        │
//!        ┌───────────────┼───────────────┐
//!        │               │               │
//!   get / list        vote()          create / delete
//!   (shared)        (exclusive)        (exclusive)
//!        │               │
//!        ▼               ▼
//!    snapshot        snapshot ──► Notifier::broadcast()
//! ```
//!
//! Lock hold time is bounded by the size of a poll (or the number of polls
//! for `list`), never by I/O. The notifier is called only after the vote's
//! write lock has been released.

pub mod error;
pub mod store;

pub use error::VoteError;
pub use store::{Clock, PollRepository};
