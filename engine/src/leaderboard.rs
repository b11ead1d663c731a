//! Ranked, durable leaderboard of best sessions.
//!
//! The store is an explicit service object: [`LeaderboardStore::open`] loads
//! the persisted snapshot before returning, [`LeaderboardStore::shutdown`]
//! drains pending writes. Share it with `Arc`.
//!
//! # Write path
//!
//! `record_session` applies the best-session rule under the table lock,
//! enqueues a full-snapshot write while still holding it (so queue order
//! matches table order), releases the lock, then notifies subscribers
//! synchronously. Notification never waits on storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use hivecheck_types::{
    LeaderboardRecord, ReviewerName, SessionResult, SessionResultError, rank_records,
};

use crate::persistence::WriteQueue;
use crate::snapshot::{self, STORAGE_KEY};
use crate::storage::{KeyValueStorage, StorageError};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardEvent {
    Updated { name: ReviewerName },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyName,
    NoReviews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Input carried no ranking information; nothing changed.
    Ignored(IgnoreReason),
    /// First session for this reviewer.
    Created,
    /// Replaced the reviewer's stored best.
    Improved,
    /// Valid session that did not beat the stored best.
    Unchanged,
}

impl RecordOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, RecordOutcome::Created | RecordOutcome::Improved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("rejected session for {name}: {source}")]
    InvalidCounts {
        name: String,
        #[source]
        source: SessionResultError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type Handler = Arc<dyn Fn(&LeaderboardEvent) + Send + Sync>;

/// Insertion-ordered records with a name index.
#[derive(Debug, Default)]
struct Table {
    records: Vec<LeaderboardRecord>,
    index: HashMap<ReviewerName, usize>,
    generation: u64,
}

impl Table {
    fn from_records(records: Vec<LeaderboardRecord>) -> Self {
        let mut table = Table::default();
        for record in records {
            if !table.index.contains_key(&record.name) {
                table.index.insert(record.name.clone(), table.records.len());
                table.records.push(record);
            }
        }
        table
    }

    fn apply(&mut self, result: &SessionResult) -> RecordOutcome {
        match self.index.get(result.reviewer()) {
            Some(&slot) => {
                let record = &mut self.records[slot];
                if record.is_improved_by(result) {
                    record.apply(result);
                    RecordOutcome::Improved
                } else {
                    RecordOutcome::Unchanged
                }
            }
            None => {
                self.index
                    .insert(result.reviewer().clone(), self.records.len());
                self.records.push(LeaderboardRecord::from_session(result));
                RecordOutcome::Created
            }
        }
    }

    fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    fn bump_generation(&mut self) -> u64 {
        self.generation = self.generation.saturating_add(1);
        self.generation
    }
}

pub struct LeaderboardStore {
    table: Mutex<Table>,
    subscribers: Mutex<Vec<(SubscriptionToken, Handler)>>,
    next_token: AtomicU64,
    writes: WriteQueue,
}

impl std::fmt::Debug for LeaderboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardStore")
            .field("records", &self.lock_table().records.len())
            .field("subscribers", &self.lock_subscribers().len())
            .finish_non_exhaustive()
    }
}

impl LeaderboardStore {
    /// Open the store under the default snapshot key.
    ///
    /// Must be called from within a tokio runtime (spawns the writer task).
    pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::open_with_key(storage, STORAGE_KEY).await
    }

    /// Open the store, loading any persisted snapshot under `key` first.
    ///
    /// A missing, unreadable, or corrupt snapshot yields an empty store; the
    /// problem is logged and never returned.
    pub async fn open_with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = load_snapshot(storage.as_ref(), &key).await;
        tracing::info!(records = records.len(), "Leaderboard loaded");

        Self {
            table: Mutex::new(Table::from_records(records)),
            subscribers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
            writes: WriteQueue::spawn(storage, key),
        }
    }

    /// Absorb a finished session given as raw counts.
    ///
    /// Blank names and zero-review sessions are ignored. `correct > reviewed`
    /// is rejected.
    pub fn record_session(
        &self,
        name: &str,
        correct: u32,
        reviewed: u32,
    ) -> Result<RecordOutcome, RecordError> {
        let Ok(reviewer) = ReviewerName::new(name) else {
            tracing::debug!("Ignoring session with empty reviewer name");
            return Ok(RecordOutcome::Ignored(IgnoreReason::EmptyName));
        };
        if reviewed == 0 {
            tracing::debug!(%reviewer, "Ignoring session with no reviews");
            return Ok(RecordOutcome::Ignored(IgnoreReason::NoReviews));
        }
        let result = SessionResult::new(reviewer, correct, reviewed).map_err(|source| {
            tracing::error!(name, correct, reviewed, "Rejecting session: {source}");
            RecordError::InvalidCounts {
                name: name.to_string(),
                source,
            }
        })?;
        Ok(self.record_result(&result))
    }

    /// Absorb a finished session.
    pub fn record_result(&self, result: &SessionResult) -> RecordOutcome {
        if result.is_empty() {
            tracing::debug!(reviewer = %result.reviewer(), "Ignoring session with no reviews");
            return RecordOutcome::Ignored(IgnoreReason::NoReviews);
        }

        let outcome = {
            let mut table = self.lock_table();
            let outcome = table.apply(result);
            if outcome.changed() {
                let generation = table.bump_generation();
                match snapshot::encode(&table.records) {
                    Ok(bytes) => self.writes.save(generation, bytes),
                    Err(e) => tracing::warn!("Failed to encode leaderboard snapshot: {e}"),
                }
            }
            outcome
        };

        tracing::info!(
            reviewer = %result.reviewer(),
            correct = result.correct_count(),
            reviewed = result.reviewed_count(),
            ?outcome,
            "Session recorded"
        );

        if outcome.changed() {
            self.notify(&LeaderboardEvent::Updated {
                name: result.reviewer().clone(),
            });
        }
        outcome
    }

    /// Ranked records: most correct first, then fewest reviewed, then
    /// insertion order. Pure read.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardRecord> {
        let mut records = self.lock_table().records.clone();
        rank_records(&mut records);
        records
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<LeaderboardRecord> {
        let name = ReviewerName::new(name).ok()?;
        let table = self.lock_table();
        table
            .index
            .get(&name)
            .map(|&slot| table.records[slot].clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_table().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a change handler. Handlers run synchronously on the thread
    /// that changed the store, outside the table lock, and may read the store.
    pub fn subscribe(
        &self,
        handler: impl Fn(&LeaderboardEvent) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.lock_subscribers().push((token, Arc::new(handler)));
        token
    }

    /// Returns `false` if the token was not registered.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.lock_subscribers();
        let before = subscribers.len();
        subscribers.retain(|(t, _)| *t != token);
        subscribers.len() != before
    }

    /// Clear every record and the durable snapshot, then notify.
    ///
    /// The in-memory clear always happens; a storage failure is logged and
    /// surfaces through [`LeaderboardStore::flush`].
    pub fn reset(&self) {
        {
            let mut table = self.lock_table();
            table.clear();
            let generation = table.bump_generation();
            self.writes.clear(generation);
        }
        tracing::info!("Leaderboard reset");
        self.notify(&LeaderboardEvent::Reset);
    }

    /// Wait for every write enqueued so far to reach storage.
    pub async fn flush(&self) -> Result<(), StorageError> {
        self.writes.flush().await
    }

    /// Drain pending writes and stop the writer task.
    pub async fn shutdown(&self) {
        self.writes.shutdown().await;
    }

    fn notify(&self, event: &LeaderboardEvent) {
        let handlers: Vec<Handler> = self
            .lock_subscribers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    fn lock_table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionToken, Handler)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn load_snapshot(storage: &dyn KeyValueStorage, key: &str) -> Vec<LeaderboardRecord> {
    match storage.get(key).await {
        Ok(Some(bytes)) => match snapshot::decode(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key, "Corrupt leaderboard snapshot, starting empty: {e}");
                Vec::new()
            }
        },
        Ok(None) => {
            tracing::info!(key, "No leaderboard snapshot, starting empty");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(key, "Failed to load leaderboard snapshot, starting empty: {e}");
            Vec::new()
        }
    }
}
