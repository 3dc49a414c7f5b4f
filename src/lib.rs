//! Real-time polling with live vote updates
//!
//! Voters mutate poll tallies concurrently through [`PollRepository`], and
//! any number of observers follow a poll through [`Notifier`]
//! subscriptions that receive a fresh snapshot after every vote.
//!
//! # Example
//!
//! ```no_run
//! use quickpoll::{Notifier, PollDraft, PollOption, PollRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = PollRepository::new();
//! let notifier = Notifier::new();
//!
//! let poll = repository
//!     .create(PollDraft::new(
//!         "Tabs or spaces?",
//!         vec![PollOption::new("a", "Tabs"), PollOption::new("b", "Spaces")],
//!     ))
//!     .await;
//!
//! let mut subscription = notifier.subscribe(&poll.id);
//!
//! let updated = repository.vote(&poll.id, "a").await?;
//! notifier.broadcast(&poll.id, serde_json::to_vec(&updated)?);
//!
//! let snapshot = subscription.recv().await;
//! assert!(snapshot.is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod notifier;
pub mod poll;
pub mod repository;
pub mod seed;
pub mod server;

pub use error::{Error, Result};
pub use notifier::{BroadcastOutcome, Notifier, NotifierConfig, Subscription};
pub use poll::{Poll, PollDraft, PollOption};
pub use repository::{PollRepository, VoteError};
pub use server::{PollServer, ServerConfig};
