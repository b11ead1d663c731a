//! Durable snapshot encoding for the leaderboard.
//!
//! Wire format: a JSON array of `[name, {"bestCorrect": n, "bestReviewed": m}]`
//! pairs in insertion order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use hivecheck_types::{LeaderboardRecord, ReviewerName};

/// Fixed storage key of the leaderboard snapshot.
pub const STORAGE_KEY: &str = "bteam:review-store:v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBest {
    best_correct: u32,
    best_reviewed: u32,
}

type SnapshotEntry = (String, StoredBest);

pub fn encode(records: &[LeaderboardRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let entries: Vec<SnapshotEntry> = records
        .iter()
        .map(|record| {
            (
                record.name.to_string(),
                StoredBest {
                    best_correct: record.best_correct,
                    best_reviewed: record.best_reviewed,
                },
            )
        })
        .collect();
    serde_json::to_vec(&entries)
}

/// Decode a snapshot, keeping insertion order.
///
/// Entries that could never have been written by the store (blank name, zero
/// reviews, `correct > reviewed`, repeated name) are skipped with a warning.
pub fn decode(bytes: &[u8]) -> Result<Vec<LeaderboardRecord>, serde_json::Error> {
    let entries: Vec<SnapshotEntry> = serde_json::from_slice(bytes)?;
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());

    for (raw_name, best) in entries {
        let Ok(name) = ReviewerName::new(raw_name) else {
            tracing::warn!("Skipping snapshot entry with empty name");
            continue;
        };
        if best.best_reviewed == 0 || best.best_correct > best.best_reviewed {
            tracing::warn!(
                %name,
                correct = best.best_correct,
                reviewed = best.best_reviewed,
                "Skipping snapshot entry with invalid counts"
            );
            continue;
        }
        if !seen.insert(name.clone()) {
            tracing::warn!(%name, "Skipping repeated snapshot entry");
            continue;
        }
        records.push(LeaderboardRecord {
            name,
            best_correct: best.best_correct,
            best_reviewed: best.best_reviewed,
        });
    }

    Ok(records)
}
