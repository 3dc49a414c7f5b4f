//! Poll repository implementation
//!
//! The single source of truth for all polls. Every operation returns owned
//! snapshots, never references into the table.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::error::VoteError;
use crate::poll::{IdGenerator, Poll, PollDraft, RandomIdGenerator};

/// Time source for creation stamps and expiry checks
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Stored record plus its insertion sequence number
struct PollEntry {
    poll: Poll,
    /// Breaks `created_at` ties in `list`
    seq: u64,
}

/// Everything guarded by the repository lock
#[derive(Default)]
struct PollTable {
    polls: HashMap<String, PollEntry>,
    next_seq: u64,
}

/// Thread-safe keyed store of polls
///
/// A single `RwLock` guards the whole table. Reads (`get`, `list`) share
/// the lock; `create`, `vote` and `delete` take it exclusively, which makes
/// each vote's lookup, expiry check and increment one atomic step.
pub struct PollRepository {
    table: RwLock<PollTable>,

    /// Id source for drafts that don't carry one
    ids: Arc<dyn IdGenerator>,

    clock: Clock,
}

impl PollRepository {
    /// Create an empty repository using random identifiers
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(RandomIdGenerator))
    }

    /// Create an empty repository with a custom id generator
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            table: RwLock::new(PollTable::default()),
            ids,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for `created_at` and expiry checks
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Store a new poll
    ///
    /// Assigns an id if the draft has none and stamps the creation time.
    /// A stored poll is never overwritten: a preassigned id that is already
    /// taken is swapped for a fresh one.
    pub async fn create(&self, draft: PollDraft) -> Poll {
        let mut table = self.table.write().await;

        let id = match draft.id {
            Some(id) if !table.polls.contains_key(&id) => id,
            requested => {
                let fresh = self.unused_id(&table);
                if let Some(taken) = requested {
                    tracing::warn!(requested = %taken, poll = %fresh, "Poll id taken, assigned a new one");
                }
                fresh
            }
        };

        let poll = Poll {
            id: id.clone(),
            question: draft.question,
            options: draft.options,
            created_at: (self.clock)(),
            expires_at: draft.expires_at,
        };

        let seq = table.next_seq;
        table.next_seq += 1;
        table.polls.insert(
            id,
            PollEntry {
                poll: poll.clone(),
                seq,
            },
        );

        tracing::info!(
            poll = %poll.id,
            options = poll.options.len(),
            expires_at = ?poll.expires_at,
            "Poll created"
        );

        poll
    }

    /// Get a snapshot of a poll
    pub async fn get(&self, id: &str) -> Option<Poll> {
        let table = self.table.read().await;
        table.polls.get(id).map(|entry| entry.poll.clone())
    }

    /// Cast one vote for `option_id` in `poll_id`
    ///
    /// Returns a snapshot of the poll after the increment. On error nothing
    /// is modified.
    pub async fn vote(&self, poll_id: &str, option_id: &str) -> Result<Poll, VoteError> {
        let mut table = self.table.write().await;

        let entry = table
            .polls
            .get_mut(poll_id)
            .ok_or_else(|| VoteError::PollNotFound(poll_id.to_string()))?;

        if entry.poll.is_expired_at((self.clock)()) {
            return Err(VoteError::PollExpired(poll_id.to_string()));
        }

        let option = entry
            .poll
            .options
            .iter_mut()
            .find(|opt| opt.id == option_id)
            .ok_or_else(|| VoteError::OptionNotFound {
                poll_id: poll_id.to_string(),
                option_id: option_id.to_string(),
            })?;

        // Pinned at the ceiling rather than wrapping
        option.votes = option.votes.saturating_add(1);

        tracing::debug!(
            poll = %poll_id,
            option = %option_id,
            votes = option.votes,
            "Vote recorded"
        );

        Ok(entry.poll.clone())
    }

    /// Snapshots of every poll, newest first
    pub async fn list(&self) -> Vec<Poll> {
        let table = self.table.read().await;

        let mut entries: Vec<&PollEntry> = table.polls.values().collect();
        entries.sort_by(|a, b| {
            b.poll
                .created_at
                .cmp(&a.poll.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        entries.into_iter().map(|entry| entry.poll.clone()).collect()
    }

    /// Remove a poll, returning whether it existed
    pub async fn delete(&self, id: &str) -> bool {
        let mut table = self.table.write().await;
        let removed = table.polls.remove(id).is_some();

        if removed {
            tracing::info!(poll = %id, "Poll deleted");
        }

        removed
    }

    fn unused_id(&self, table: &PollTable) -> String {
        loop {
            let candidate = self.ids.generate();
            if !table.polls.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Number of stored polls
    pub async fn len(&self) -> usize {
        self.table.read().await.polls.len()
    }

    /// Check if no polls are stored
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.polls.is_empty()
    }
}

impl Default for PollRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::Duration;

    use super::*;
    use crate::poll::PollOption;

    fn draft(question: &str) -> PollDraft {
        PollDraft::new(
            question,
            vec![PollOption::new("opt1", "A"), PollOption::new("opt2", "B")],
        )
    }

    /// Yields "id-0", "id-1", ...
    struct SequentialIds(AtomicU64);

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed))
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let repo = PollRepository::new();
        let before = Utc::now();

        let poll = repo.create(draft("Test?")).await;

        assert_eq!(poll.id.len(), 8);
        assert!(poll.created_at >= before);
        assert_eq!(repo.get(&poll.id).await, Some(poll));
    }

    #[tokio::test]
    async fn test_create_keeps_preassigned_id() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?").with_id("fixed")).await;

        assert_eq!(poll.id, "fixed");
        assert!(repo.get("fixed").await.is_some());
    }

    #[tokio::test]
    async fn test_create_skips_taken_generated_id() {
        let repo = PollRepository::with_id_generator(Arc::new(SequentialIds(AtomicU64::new(0))));
        repo.create(draft("Taken").with_id("id-0")).await;

        let poll = repo.create(draft("Fresh")).await;
        assert_eq!(poll.id, "id-1");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_with_taken_id_keeps_existing_poll() {
        let repo = PollRepository::with_id_generator(Arc::new(SequentialIds(AtomicU64::new(0))));
        let original = PollDraft::new(
            "Original?",
            vec![
                PollOption::new("a", "Yes").with_votes(5),
                PollOption::new("b", "No"),
            ],
        );
        repo.create(original.with_id("p")).await;
        repo.vote("p", "a").await.unwrap();

        let other = PollDraft::new(
            "Other",
            vec![PollOption::new("x", "X"), PollOption::new("y", "Y")],
        );
        let second = repo.create(other.with_id("p")).await;

        assert_eq!(second.id, "id-0");
        assert_eq!(second.question, "Other");

        let stored = repo.get("p").await.unwrap();
        assert_eq!(stored.question, "Original?");
        assert_eq!(stored.options[0].id, "a");
        assert_eq!(stored.options[0].votes, 6);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let repo = PollRepository::new();
        assert!(repo.get("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_vote_increments() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?")).await;

        let updated = repo.vote(&poll.id, "opt1").await.unwrap();
        assert_eq!(updated.options[0].votes, 1);
        assert_eq!(updated.options[1].votes, 0);

        let stored = repo.get(&poll.id).await.unwrap();
        assert_eq!(stored.options[0].votes, 1);
    }

    #[tokio::test]
    async fn test_vote_unknown_option() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?")).await;

        let result = repo.vote(&poll.id, "invalid").await;
        assert!(matches!(result, Err(VoteError::OptionNotFound { .. })));

        let stored = repo.get(&poll.id).await.unwrap();
        assert_eq!(stored.total_votes(), 0);
    }

    #[tokio::test]
    async fn test_vote_unknown_poll() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?")).await;

        let result = repo.vote("nonexistent", "opt1").await;
        assert_eq!(
            result,
            Err(VoteError::PollNotFound("nonexistent".to_string()))
        );

        let stored = repo.get(&poll.id).await.unwrap();
        assert_eq!(stored.total_votes(), 0);
    }

    #[tokio::test]
    async fn test_vote_expired_poll() {
        let repo = PollRepository::new();
        let expired = draft("Test?").expires_at(Utc::now() - Duration::hours(1));
        let poll = repo.create(expired).await;

        let result = repo.vote(&poll.id, "opt1").await;
        assert_eq!(result, Err(VoteError::PollExpired(poll.id.clone())));

        let stored = repo.get(&poll.id).await.unwrap();
        assert_eq!(stored.total_votes(), 0);
    }

    #[tokio::test]
    async fn test_vote_counter_saturates() {
        let repo = PollRepository::new();
        let full = PollDraft::new(
            "Test?",
            vec![
                PollOption::new("opt1", "A").with_votes(u64::MAX),
                PollOption::new("opt2", "B"),
            ],
        );
        let poll = repo.create(full).await;

        let updated = repo.vote(&poll.id, "opt1").await.unwrap();
        assert_eq!(updated.options[0].votes, u64::MAX);

        let updated = repo.vote(&poll.id, "opt2").await.unwrap();
        assert_eq!(updated.options[1].votes, 1);
    }

    #[tokio::test]
    async fn test_vote_expiry_uses_clock() {
        let start = Utc::now();
        let offset = Arc::new(AtomicU64::new(0));
        let clock_offset = Arc::clone(&offset);
        let repo = PollRepository::new().with_clock(Arc::new(move || {
            start + Duration::minutes(clock_offset.load(Ordering::Relaxed) as i64)
        }));

        let poll = repo
            .create(draft("Test?").expires_at(start + Duration::minutes(30)))
            .await;
        assert!(repo.vote(&poll.id, "opt1").await.is_ok());

        // Exactly at the deadline voting is still open
        offset.store(30, Ordering::Relaxed);
        assert!(repo.vote(&poll.id, "opt1").await.is_ok());

        offset.store(31, Ordering::Relaxed);
        assert_eq!(
            repo.vote(&poll.id, "opt1").await,
            Err(VoteError::PollExpired(poll.id.clone()))
        );
        assert_eq!(repo.get(&poll.id).await.unwrap().total_votes(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_are_not_lost() {
        let repo = Arc::new(PollRepository::new());
        let seeded = PollDraft::new(
            "Test?",
            vec![
                PollOption::new("opt1", "A").with_votes(7),
                PollOption::new("opt2", "B"),
            ],
        );
        let poll = repo.create(seeded).await;

        let mut handles = Vec::new();
        for _ in 0..100 {
            let repo = Arc::clone(&repo);
            let id = poll.id.clone();
            handles.push(tokio::spawn(async move {
                repo.vote(&id, "opt1").await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = repo.get(&poll.id).await.unwrap();
        assert_eq!(stored.options[0].votes, 107);
        assert_eq!(stored.options[1].votes, 0);
    }

    #[tokio::test]
    async fn test_snapshots_are_isolated() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?")).await;

        let mut snapshot = repo.get(&poll.id).await.unwrap();
        snapshot.options[0].votes = 999;
        snapshot.options.push(PollOption::new("opt3", "C"));
        snapshot.question = "Changed".into();

        let mut voted = repo.vote(&poll.id, "opt2").await.unwrap();
        voted.options[1].votes = 500;

        let mut listed = repo.list().await;
        listed[0].options.clear();

        let stored = repo.get(&poll.id).await.unwrap();
        assert_eq!(stored.question, "Test?");
        assert_eq!(stored.options.len(), 2);
        assert_eq!(stored.options[0].votes, 0);
        assert_eq!(stored.options[1].votes, 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let start = Utc::now();
        let ticks = Arc::new(AtomicU64::new(0));
        let clock_ticks = Arc::clone(&ticks);
        // Each creation lands one second after the previous one
        let repo = PollRepository::new().with_clock(Arc::new(move || {
            start + Duration::seconds(clock_ticks.fetch_add(1, Ordering::Relaxed) as i64)
        }));

        let first = repo.create(draft("First")).await;
        repo.create(draft("Second")).await;
        let third = repo.create(draft("Third")).await;
        assert_eq!(third.created_at - first.created_at, Duration::seconds(2));

        let polls = repo.list().await;
        let questions: Vec<&str> = polls.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(questions, ["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_list_same_timestamp_uses_insert_order() {
        let frozen = Utc::now();
        let repo = PollRepository::new().with_clock(Arc::new(move || frozen));

        for question in ["One", "Two", "Three", "Four"] {
            repo.create(draft(question)).await;
        }

        let polls = repo.list().await;
        assert!(polls.iter().all(|p| p.created_at == frozen));
        let questions: Vec<&str> = polls.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(questions, ["Four", "Three", "Two", "One"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?")).await;

        assert!(repo.delete(&poll.id).await);
        assert!(repo.get(&poll.id).await.is_none());
        assert!(matches!(
            repo.vote(&poll.id, "opt1").await,
            Err(VoteError::PollNotFound(_))
        ));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_unknown() {
        let repo = PollRepository::new();
        let poll = repo.create(draft("Test?")).await;

        assert!(!repo.delete("nonexistent").await);
        assert_eq!(repo.len().await, 1);
        assert!(repo.get(&poll.id).await.is_some());
    }
}
