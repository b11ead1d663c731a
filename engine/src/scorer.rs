//! Per-session score accumulator.

use hivecheck_types::{ReviewerName, SessionResult};

/// Running counts for one session.
///
/// A fresh scorer is created per session; [`SessionScorer::finalize`] consumes
/// it, so no state can carry over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionScorer {
    reviewed: u32,
    correct: u32,
}

impl SessionScorer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, is_correct: bool) {
        self.reviewed = self.reviewed.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    #[must_use]
    pub fn reviewed(&self) -> u32 {
        self.reviewed
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn finalize(self, reviewer: ReviewerName) -> SessionResult {
        SessionResult::clamped(reviewer, self.correct, self.reviewed)
    }
}
