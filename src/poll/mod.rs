//! Poll record model
//!
//! Value types for polls and their options, plus identifier generation.

pub mod id;
pub mod model;

pub use id::{generate_id, IdGenerator, RandomIdGenerator};
pub use model::{Poll, PollDraft, PollOption};
