//! Repository error types

/// Error type for vote operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    /// No poll with this id
    PollNotFound(String),
    /// The poll's expiry time has passed
    PollExpired(String),
    /// The poll has no option with this id
    OptionNotFound {
        /// Poll that was looked up
        poll_id: String,
        /// Option that was missing
        option_id: String,
    },
}

impl std::fmt::Display for VoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteError::PollNotFound(id) => write!(f, "Poll not found: {}", id),
            VoteError::PollExpired(id) => write!(f, "Poll has expired: {}", id),
            VoteError::OptionNotFound { poll_id, option_id } => {
                write!(f, "Option not found: {} (poll {})", option_id, poll_id)
            }
        }
    }
}

impl std::error::Error for VoteError {}
