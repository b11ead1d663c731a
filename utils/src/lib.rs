//! Shared infrastructure utilities for hivecheck.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename) used by the
//!   file-backed leaderboard storage.

pub mod atomic_write;

pub use atomic_write::{atomic_write, recover_bak_file, remove_with_backup};
