//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use hivecheck_engine::{
    FileStorage, GestureConfig, Item, Label, LeaderboardStore, MemoryStorage, ReviewerName,
    Session,
};

/// Viewport width used by the fixtures. Commit threshold is 100.
pub const TEST_WIDTH: f32 = 400.0;

/// Four cards alternating healthy / unhealthy.
pub fn hive_deck() -> Vec<Item> {
    vec![
        Item::new("hive-a", "a.jpg", Label::Healthy).with_caption("Hive A"),
        Item::new("hive-b", "b.jpg", Label::Unhealthy).with_caption("Hive B"),
        Item::new("hive-c", "c.jpg", Label::Healthy).with_caption("Hive C"),
        Item::new("hive-d", "d.jpg", Label::Unhealthy).with_caption("Hive D"),
    ]
}

pub fn timed_session(name: &str, secs: u32) -> Session {
    Session::timed(
        ReviewerName::new(name).expect("fixture name is not blank"),
        secs,
        GestureConfig::for_viewport(TEST_WIDTH),
        hive_deck(),
    )
}

/// Drag past the threshold, release, and let the commit animation run.
pub fn swipe(session: &mut Session, dx: f32) {
    assert!(session.pointer_move(dx, 0.0), "move should be accepted");
    session.pointer_release(dx, 0.0);
    session.finish_animation();
}

pub async fn memory_store() -> (Arc<MemoryStorage>, Arc<LeaderboardStore>) {
    let storage = Arc::new(MemoryStorage::new());
    let store = Arc::new(LeaderboardStore::open(storage.clone()).await);
    (storage, store)
}

pub async fn file_store(dir: &std::path::Path) -> LeaderboardStore {
    LeaderboardStore::open(Arc::new(FileStorage::new(dir))).await
}

pub fn ranked_names(store: &LeaderboardStore) -> Vec<String> {
    store
        .leaderboard()
        .into_iter()
        .map(|record| record.name.into_inner())
        .collect()
}
