//! Core engine for hivecheck: card gestures, scoring, and the leaderboard.
//!
//! This crate has no terminal dependencies. The front-end feeds pointer deltas
//! and timer ticks into a [`Session`], and records finished sessions in a
//! [`LeaderboardStore`].

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod config;
mod deck;
pub mod gesture;
mod leaderboard;
mod persistence;
mod scorer;
mod session;
mod snapshot;
mod storage;

pub use config::{
    ConfigError, GestureSection, HiveConfig, SessionConfig, StorageConfig, config_path,
    default_data_dir, expand_env_vars,
};
pub use deck::{DeckError, load_deck, parse_deck};
pub use gesture::{
    CardView, GestureConfig, GesturePhase, GestureStack, MAX_VISIBLE_CARDS, Offset,
    PointerSample, PointerTracker, ReleaseOutcome,
};
pub use leaderboard::{
    IgnoreReason, LeaderboardEvent, LeaderboardStore, RecordError, RecordOutcome,
    SubscriptionToken,
};
pub use scorer::SessionScorer;
pub use session::{
    DEFAULT_SESSION_SECS, Feedback, Score, Session, SessionEvent, SessionMode, SessionOutcome,
};
pub use snapshot::STORAGE_KEY;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageOp};

pub use hivecheck_types::{
    Decision, Direction, ImageRef, Item, ItemId, Label, LeaderboardRecord, ReviewerName,
    SessionResult, SessionResultError,
};
