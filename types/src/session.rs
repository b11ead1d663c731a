//! Finished-session results.

use thiserror::Error;

use crate::ReviewerName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionResultError {
    #[error("correct count ({correct}) exceeds reviewed count ({reviewed})")]
    CorrectExceedsReviewed { correct: u32, reviewed: u32 },
}

/// Immutable outcome of one scored session.
///
/// `correct_count <= reviewed_count` is guaranteed by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    reviewer: ReviewerName,
    correct_count: u32,
    reviewed_count: u32,
}

impl SessionResult {
    pub fn new(
        reviewer: ReviewerName,
        correct_count: u32,
        reviewed_count: u32,
    ) -> Result<Self, SessionResultError> {
        if correct_count > reviewed_count {
            return Err(SessionResultError::CorrectExceedsReviewed {
                correct: correct_count,
                reviewed: reviewed_count,
            });
        }
        Ok(Self {
            reviewer,
            correct_count,
            reviewed_count,
        })
    }

    /// Build a result, clamping `correct_count` down to `reviewed_count`.
    #[must_use]
    pub fn clamped(reviewer: ReviewerName, correct_count: u32, reviewed_count: u32) -> Self {
        Self {
            reviewer,
            correct_count: correct_count.min(reviewed_count),
            reviewed_count,
        }
    }

    #[must_use]
    pub fn reviewer(&self) -> &ReviewerName {
        &self.reviewer
    }

    #[must_use]
    pub const fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub const fn reviewed_count(&self) -> u32 {
        self.reviewed_count
    }

    /// A session with zero reviews carries no ranking information.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reviewed_count == 0
    }
}
