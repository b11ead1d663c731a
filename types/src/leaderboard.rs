//! Leaderboard records and the best-session rule.

use std::cmp::{Ordering, Reverse};

use crate::{ReviewerName, SessionResult};

/// A reviewer's best session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRecord {
    pub name: ReviewerName,
    pub best_correct: u32,
    pub best_reviewed: u32,
}

impl LeaderboardRecord {
    /// First record for a reviewer, seeded from their first session.
    #[must_use]
    pub fn from_session(result: &SessionResult) -> Self {
        Self {
            name: result.reviewer().clone(),
            best_correct: result.correct_count(),
            best_reviewed: result.reviewed_count(),
        }
    }

    /// Whether `result` should replace the stored best.
    ///
    /// Higher accuracy wins first; at equal accuracy, fewer reviews wins.
    #[must_use]
    pub fn is_improved_by(&self, result: &SessionResult) -> bool {
        let correct = result.correct_count();
        correct > self.best_correct
            || (correct == self.best_correct && result.reviewed_count() < self.best_reviewed)
    }

    /// Overwrite both counters from `result`.
    pub fn apply(&mut self, result: &SessionResult) {
        self.best_correct = result.correct_count();
        self.best_reviewed = result.reviewed_count();
    }

    /// Ranking order: `best_correct` descending, then `best_reviewed` ascending.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        (Reverse(self.best_correct), self.best_reviewed)
            .cmp(&(Reverse(other.best_correct), other.best_reviewed))
    }
}

/// Sort records into leaderboard order.
///
/// The sort is stable, so records that tie on both counters keep the order
/// they were passed in (insertion order when fed from the store).
pub fn rank_records(records: &mut [LeaderboardRecord]) {
    records.sort_by(LeaderboardRecord::rank_cmp);
}
