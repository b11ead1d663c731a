//! Gesture stack behavior as a front-end sees it.

use std::time::Duration;

use hivecheck_engine::{
    Direction, GestureConfig, GesturePhase, GestureStack, Item, Label, MAX_VISIBLE_CARDS,
    ReleaseOutcome,
};

use crate::common::{TEST_WIDTH, hive_deck};

fn stack() -> GestureStack {
    let mut stack = GestureStack::new(GestureConfig::for_viewport(TEST_WIDTH));
    stack.load(hive_deck());
    stack
}

#[test]
fn view_exposes_three_cards_with_depth_offsets() {
    let stack = stack();
    let cards = stack.visible_cards();
    assert_eq!(cards.len(), MAX_VISIBLE_CARDS);
    assert!(cards[0].interactive);
    assert!(!cards[1].interactive && !cards[2].interactive);
    assert!((cards[2].offset.x - 12.0).abs() < f32::EPSILON);
    assert!((cards[2].offset.y + 16.0).abs() < f32::EPSILON);
}

#[test]
fn every_card_decides_exactly_once() {
    let mut stack = stack();
    let mut decided = Vec::new();
    while !stack.is_empty() {
        stack.on_pointer_move(-TEST_WIDTH, 10.0);
        assert_eq!(
            stack.on_pointer_release(-TEST_WIDTH, 10.0),
            ReleaseOutcome::Committing(Direction::Left)
        );
        // Frame-driven: no decision until the tween ends.
        assert!(stack.advance(Duration::from_millis(100)).is_none());
        let decision = stack.advance(Duration::from_millis(200)).unwrap();
        assert_eq!(decision.picked(), Label::Unhealthy);
        decided.push(decision.item.id.to_string());
        assert!(stack.finish_animation().is_none());
    }
    assert_eq!(decided, ["hive-a", "hive-b", "hive-c", "hive-d"]);
}

#[test]
fn short_drag_springs_back_without_decision() {
    let mut stack = stack();
    stack.on_pointer_move(TEST_WIDTH * 0.2, 5.0);
    assert_eq!(
        stack.on_pointer_release(TEST_WIDTH * 0.2, 5.0),
        ReleaseOutcome::Cancelling
    );

    let mut elapsed = Duration::ZERO;
    while stack.phase() == GesturePhase::Cancelling && elapsed < Duration::from_secs(10) {
        assert!(stack.advance(Duration::from_millis(16)).is_none());
        elapsed += Duration::from_millis(16);
    }
    assert_eq!(stack.phase(), GesturePhase::Idle);
    assert_eq!(stack.len(), 4);
}

#[test]
fn reload_mid_commit_drops_pending_decision() {
    let mut stack = stack();
    stack.on_pointer_move(TEST_WIDTH, 0.0);
    stack.on_pointer_release(TEST_WIDTH, 0.0);
    stack.load(vec![Item::new("fresh", "f.jpg", Label::Healthy)]);

    assert_eq!(stack.phase(), GesturePhase::Idle);
    assert!(stack.finish_animation().is_none());
    assert_eq!(stack.top().map(|item| item.id.as_str()), Some("fresh"));
}
