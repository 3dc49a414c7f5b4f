//! Read views of a poll
//!
//! `GET` and create responses carry the derived tallies a client would
//! otherwise compute itself. Vote responses and SSE events keep the plain
//! `Poll` snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::poll::Poll;

/// An option together with its share of the vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub id: String,
    pub text: String,
    pub votes: u64,
    /// Share of all votes in the poll, 0 to 100
    pub percentage: f64,
}

/// A poll snapshot with totals and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollView {
    pub id: String,
    pub question: String,
    pub options: Vec<OptionView>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Sum of all option counts
    pub total_votes: u64,
    /// Voting has closed
    pub expired: bool,
}

impl From<&Poll> for PollView {
    fn from(poll: &Poll) -> Self {
        let options = poll
            .options
            .iter()
            .map(|opt| OptionView {
                id: opt.id.clone(),
                text: opt.text.clone(),
                votes: opt.votes,
                percentage: poll.vote_percentage(&opt.id),
            })
            .collect();

        Self {
            id: poll.id.clone(),
            question: poll.question.clone(),
            options,
            created_at: poll.created_at,
            expires_at: poll.expires_at,
            total_votes: poll.total_votes(),
            expired: poll.is_expired(),
        }
    }
}

impl From<Poll> for PollView {
    fn from(poll: Poll) -> Self {
        Self::from(&poll)
    }
}
