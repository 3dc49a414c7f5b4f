//! Poll and option value types
//!
//! A `Poll` handed out by the repository is always an owned snapshot. Cloning
//! deep-copies the option vector, so a caller mutating its copy can never
//! reach the stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single voting option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Identifier, unique within the owning poll
    pub id: String,
    /// Display text
    pub text: String,
    /// Number of votes cast for this option
    pub votes: u64,
}

impl PollOption {
    /// Create an option with no votes
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            votes: 0,
        }
    }

    /// Set an initial vote count (used when seeding)
    pub fn with_votes(mut self, votes: u64) -> Self {
        self.votes = votes;
        self
    }
}

/// A voting poll with an ordered set of options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    /// Opaque unique identifier
    pub id: String,
    /// The question being asked
    pub question: String,
    /// Options in insertion order
    pub options: Vec<PollOption>,
    /// When the poll was stored
    pub created_at: DateTime<Utc>,
    /// When voting closes (`None` = never)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Poll {
    /// Sum of all option vote counts
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|opt| opt.votes).sum()
    }

    /// Percentage of the total held by `option_id`
    ///
    /// Returns 0 when no votes have been cast or the option is unknown.
    pub fn vote_percentage(&self, option_id: &str) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            return 0.0;
        }

        self.option(option_id)
            .map(|opt| opt.votes as f64 / total as f64 * 100.0)
            .unwrap_or(0.0)
    }

    /// Look up an option by id
    pub fn option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|opt| opt.id == option_id)
    }

    /// Check whether the poll has expired as of now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check whether the poll has expired as of `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }
}

/// Input to `PollRepository::create`
///
/// The repository assigns the creation timestamp, and an id when `id` is
/// `None`.
#[derive(Debug, Clone, Default)]
pub struct PollDraft {
    /// Preassigned identifier
    pub id: Option<String>,
    /// The question being asked
    pub question: String,
    /// Options in display order
    pub options: Vec<PollOption>,
    /// When voting closes
    pub expires_at: Option<DateTime<Utc>>,
}

impl PollDraft {
    /// Create a draft with the given question and options
    pub fn new(question: impl Into<String>, options: Vec<PollOption>) -> Self {
        Self {
            id: None,
            question: question.into(),
            options,
            expires_at: None,
        }
    }

    /// Use a fixed identifier instead of a generated one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Close voting at `expires_at`
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn poll_with_votes(a: u64, b: u64) -> Poll {
        Poll {
            id: "p1".into(),
            question: "Tabs or spaces?".into(),
            options: vec![
                PollOption::new("a", "Tabs").with_votes(a),
                PollOption::new("b", "Spaces").with_votes(b),
            ],
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    #[test]
    fn test_total_votes() {
        assert_eq!(poll_with_votes(0, 0).total_votes(), 0);
        assert_eq!(poll_with_votes(3, 4).total_votes(), 7);
    }

    #[test]
    fn test_percentage_zero_total() {
        let poll = poll_with_votes(0, 0);
        assert_eq!(poll.vote_percentage("a"), 0.0);
        assert_eq!(poll.vote_percentage("b"), 0.0);
    }

    #[test]
    fn test_percentage_split() {
        let poll = poll_with_votes(25, 75);
        assert!((poll.vote_percentage("a") - 25.0).abs() < 1e-9);
        assert!((poll.vote_percentage("b") - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let mut poll = poll_with_votes(1, 1);
        poll.options.push(PollOption::new("c", "Both").with_votes(1));

        let sum: f64 = poll
            .options
            .iter()
            .map(|opt| poll.vote_percentage(&opt.id))
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_unknown_option() {
        let poll = poll_with_votes(5, 5);
        assert_eq!(poll.vote_percentage("missing"), 0.0);
    }

    #[test]
    fn test_expiry() {
        let mut poll = poll_with_votes(0, 0);
        assert!(!poll.is_expired());

        poll.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(poll.is_expired());

        poll.expires_at = Some(Utc::now() + Duration::hours(1));
        assert!(!poll.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let mut poll = poll_with_votes(0, 0);
        poll.expires_at = Some(now);

        // Still open at the exact expiry instant
        assert!(!poll.is_expired_at(now));
        assert!(poll.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_serialized_schema() {
        let poll = poll_with_votes(2, 0);
        let json: serde_json::Value = serde_json::to_value(&poll).unwrap();

        assert_eq!(json["id"], "p1");
        assert_eq!(json["options"][0]["id"], "a");
        assert_eq!(json["options"][0]["text"], "Tabs");
        assert_eq!(json["options"][0]["votes"], 2);
        assert!(json.get("created_at").is_some());
        assert!(json.get("expires_at").is_none());
    }

    #[test]
    fn test_serialized_expiry_present() {
        let mut poll = poll_with_votes(0, 0);
        poll.expires_at = Some(Utc::now());

        let json: serde_json::Value = serde_json::to_value(&poll).unwrap();
        assert!(json["expires_at"].is_string());
    }
}
