//! Sample data for a fresh server

use crate::poll::{generate_id, Poll, PollDraft, PollOption};
use crate::repository::PollRepository;

/// Store a couple of demo polls with existing votes
pub async fn seed_sample_polls(repository: &PollRepository) -> Vec<Poll> {
    let drafts = [
        PollDraft::new(
            "What's your favorite programming language?",
            vec![
                PollOption::new(generate_id(), "Go").with_votes(42),
                PollOption::new(generate_id(), "Python").with_votes(38),
                PollOption::new(generate_id(), "Rust").with_votes(25),
                PollOption::new(generate_id(), "TypeScript").with_votes(31),
            ],
        ),
        PollDraft::new(
            "Best time for team meetings?",
            vec![
                PollOption::new(generate_id(), "Morning (9-11 AM)").with_votes(15),
                PollOption::new(generate_id(), "Afternoon (2-4 PM)").with_votes(22),
                PollOption::new(generate_id(), "Late afternoon (4-6 PM)").with_votes(8),
            ],
        ),
    ];

    let mut polls = Vec::with_capacity(drafts.len());
    for draft in drafts {
        polls.push(repository.create(draft).await);
    }
    polls
}
