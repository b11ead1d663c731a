//! Leaderboard persistence and ranking through the public store API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hivecheck_engine::{
    FileStorage, LeaderboardEvent, RecordOutcome, STORAGE_KEY, StorageError,
};
use tempfile::tempdir;

use crate::common::{file_store, memory_store, ranked_names};

#[tokio::test]
async fn file_backed_store_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let store = file_store(dir.path()).await;
        store.record_session("Ann", 3, 5).unwrap();
        store.record_session("Bo", 3, 5).unwrap();
        store.record_session("Cy", 4, 10).unwrap();
        store.flush().await.unwrap();
        store.shutdown().await;
    }

    let reopened = file_store(dir.path()).await;
    assert_eq!(ranked_names(&reopened), ["Cy", "Ann", "Bo"]);
}

#[tokio::test]
async fn reset_removes_leftover_backup_snapshot() {
    let dir = tempdir().unwrap();
    let path = FileStorage::new(dir.path()).path_for(STORAGE_KEY);
    {
        let store = file_store(dir.path()).await;
        store.record_session("Ann", 3, 5).unwrap();
        store.flush().await.unwrap();
        std::fs::copy(&path, path.with_extension("bak")).unwrap();

        store.reset();
        store.flush().await.unwrap();
        store.shutdown().await;
    }

    assert!(!path.with_extension("bak").exists());
    let reopened = file_store(dir.path()).await;
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn snapshot_file_uses_pair_format() {
    let dir = tempdir().unwrap();
    let store = file_store(dir.path()).await;
    store.record_session("Ann", 3, 5).unwrap();
    store.flush().await.unwrap();

    let path = FileStorage::new(dir.path()).path_for(STORAGE_KEY);
    let raw = std::fs::read(&path).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!([["Ann", {"bestCorrect": 3, "bestReviewed": 5}]])
    );
}

#[tokio::test]
async fn corrupt_snapshot_file_yields_empty_store() {
    let dir = tempdir().unwrap();
    let path = FileStorage::new(dir.path()).path_for(STORAGE_KEY);
    std::fs::write(&path, b"[[\"Ann\", {\"bestCorrect\": ").unwrap();

    let store = file_store(dir.path()).await;
    assert!(store.is_empty());

    // The store stays usable and overwrites the bad snapshot.
    store.record_session("Ann", 1, 1).unwrap();
    store.flush().await.unwrap();
    store.shutdown().await;
    let reopened = file_store(dir.path()).await;
    assert_eq!(ranked_names(&reopened), ["Ann"]);
}

#[tokio::test]
async fn reset_removes_snapshot_file() {
    let dir = tempdir().unwrap();
    let store = file_store(dir.path()).await;
    store.record_session("Ann", 3, 5).unwrap();
    store.flush().await.unwrap();

    store.reset();
    store.flush().await.unwrap();
    let path = FileStorage::new(dir.path()).path_for(STORAGE_KEY);
    assert!(!path.exists());
}

#[tokio::test]
async fn best_session_rule_end_to_end() {
    let (_, store) = memory_store().await;

    assert_eq!(store.record_session("Ann", 3, 5), Ok(RecordOutcome::Created));
    assert_eq!(store.record_session("Ann", 2, 2), Ok(RecordOutcome::Unchanged));
    assert_eq!(store.record_session("Ann", 3, 4), Ok(RecordOutcome::Improved));
    assert_eq!(store.record_session("Ann", 3, 4), Ok(RecordOutcome::Unchanged));

    let ann = store.get("Ann").unwrap();
    assert_eq!((ann.best_correct, ann.best_reviewed), (3, 4));
}

#[tokio::test]
async fn names_are_trimmed_before_keying() {
    let (_, store) = memory_store().await;
    store.record_session(" Ann ", 1, 2).unwrap();
    assert_eq!(store.record_session("Ann", 2, 2), Ok(RecordOutcome::Improved));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn one_notification_per_change() {
    let (_, store) = memory_store().await;
    let updates = Arc::new(AtomicUsize::new(0));
    let resets = Arc::new(AtomicUsize::new(0));
    let (u, r) = (Arc::clone(&updates), Arc::clone(&resets));
    store.subscribe(move |event| match event {
        LeaderboardEvent::Updated { .. } => {
            u.fetch_add(1, Ordering::SeqCst);
        }
        LeaderboardEvent::Reset => {
            r.fetch_add(1, Ordering::SeqCst);
        }
    });

    store.record_session("Ann", 3, 5).unwrap();
    store.record_session("Ann", 2, 2).unwrap();
    store.record_session("", 3, 3).unwrap();
    store.record_session("Bo", 0, 0).unwrap();
    assert!(store.record_session("Cy", 4, 3).is_err());
    store.reset();

    assert_eq!(updates.load(Ordering::SeqCst), 1);
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn write_failures_surface_through_flush_only() {
    let (storage, store) = memory_store().await;
    storage.set_failing(true);

    assert_eq!(store.record_session("Ann", 1, 1), Ok(RecordOutcome::Created));
    assert_eq!(store.leaderboard().len(), 1);
    assert!(matches!(
        store.flush().await,
        Err(StorageError::Io { .. })
    ));

    storage.set_failing(false);
    store.record_session("Ann", 2, 2).unwrap();
    store.flush().await.unwrap();
    assert!(storage.raw(STORAGE_KEY).is_some());
}

#[tokio::test]
async fn burst_of_updates_lands_newest_snapshot() {
    let (storage, store) = memory_store().await;
    for correct in 1..=20 {
        store.record_session("Ann", correct, 20).unwrap();
    }
    store.flush().await.unwrap();

    let raw = storage.raw(STORAGE_KEY).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(json[0][1]["bestCorrect"], 20);
}
