//! A timed test from first swipe to leaderboard entry.

use std::time::Duration;

use hivecheck_engine::{SessionEvent, SessionOutcome};

use crate::common::{TEST_WIDTH, memory_store, ranked_names, swipe, timed_session};

#[tokio::test]
async fn timed_session_is_recorded_once() {
    let (_, store) = memory_store().await;
    let mut session = timed_session("Ann", 2);

    swipe(&mut session, TEST_WIDTH); // hive-a healthy: correct
    swipe(&mut session, TEST_WIDTH); // hive-b unhealthy: wrong
    swipe(&mut session, -TEST_WIDTH); // hive-c healthy: wrong

    assert!(session.countdown_tick().is_none());
    let Some(SessionOutcome::Scored(result)) = session.countdown_tick() else {
        panic!("countdown should end the test");
    };
    assert!(session.stop().is_none());
    assert_eq!((result.correct_count(), result.reviewed_count()), (1, 3));

    store.record_result(&result);
    let ann = store.get("Ann").unwrap();
    assert_eq!((ann.best_correct, ann.best_reviewed), (1, 3));
}

#[tokio::test]
async fn better_second_session_replaces_first() {
    let (_, store) = memory_store().await;

    let mut first = timed_session("Ann", 30);
    swipe(&mut first, TEST_WIDTH);
    swipe(&mut first, -TEST_WIDTH);
    swipe(&mut first, TEST_WIDTH);
    swipe(&mut first, TEST_WIDTH);
    if let Some(SessionOutcome::Scored(result)) = first.stop() {
        store.record_result(&result);
    }

    let mut second = timed_session("Ann", 30);
    swipe(&mut second, TEST_WIDTH);
    swipe(&mut second, -TEST_WIDTH);
    swipe(&mut second, TEST_WIDTH);
    if let Some(SessionOutcome::Scored(result)) = second.stop() {
        store.record_result(&result);
    }

    let ann = store.get("Ann").unwrap();
    assert_eq!((ann.best_correct, ann.best_reviewed), (3, 3));
}

#[tokio::test]
async fn stopping_before_any_swipe_records_nothing() {
    let (_, store) = memory_store().await;
    let mut session = timed_session("Ann", 30);
    if let Some(SessionOutcome::Scored(result)) = session.stop() {
        store.record_result(&result);
    }
    assert!(ranked_names(&store).is_empty());
}

#[test]
fn frame_driven_commit_scores_before_next_tick() {
    let mut session = timed_session("Ann", 1);
    session.pointer_move(TEST_WIDTH, 0.0);
    session.pointer_release(TEST_WIDTH, 0.0);

    let mut decided = 0;
    for _ in 0..20 {
        decided += session
            .advance(Duration::from_millis(16))
            .iter()
            .filter(|e| matches!(e, SessionEvent::Decided { .. }))
            .count();
    }
    assert_eq!(decided, 1);

    let Some(SessionOutcome::Scored(result)) = session.countdown_tick() else {
        panic!("one-second test should end on first tick");
    };
    assert_eq!(result.reviewed_count(), 1);
}
