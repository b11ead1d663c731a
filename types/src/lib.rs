//! Core domain types for hivecheck.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod ids;
mod item;
mod leaderboard;
mod session;

pub use ids::ItemId;
pub use item::{Decision, Direction, ImageRef, Item, Label};
pub use leaderboard::{LeaderboardRecord, rank_records};
pub use session::{SessionResult, SessionResultError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Reviewer Name
// ============================================================================

/// A reviewer name guaranteed to be non-empty (after trimming).
///
/// The stored value is trimmed, so `"  Ann "` and `"Ann"` key the same
/// leaderboard record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewerName(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reviewer name must not be empty")]
pub struct EmptyNameError;

impl ReviewerName {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyNameError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(EmptyNameError)
        } else if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ReviewerName {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ReviewerName {
    type Error = EmptyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewerName> for String {
    fn from(value: ReviewerName) -> Self {
        value.0
    }
}

impl std::ops::Deref for ReviewerName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for ReviewerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ReviewerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
