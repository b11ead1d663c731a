//! Card stack state machine.
//!
//! ```text
//! Idle --move--> Dragging --release(|dx| > threshold)--> Committing --done--> Idle (+ Decision)
//!   |               |      \-release(|dx| <= threshold)-> Cancelling --settled--> Idle
//!   \--release------/
//! ```
//!
//! Animations are advanced by [`GestureStack::advance`] (frame timer) or
//! completed at once by [`GestureStack::finish_animation`] (explicit
//! "animation finished" event). A [`Decision`] is returned from exactly the
//! call that completes a commit, and never for any other transition.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use hivecheck_types::{Decision, Direction, Item};

use super::animation::{Spring, SpringParams, Tween};
use super::pointer::{Offset, PointerTracker};

/// Number of cards exposed to the view.
pub const MAX_VISIBLE_CARDS: usize = 3;

/// Per-depth static offset of the cards under the top card.
const STACKED_CARD_STEP: Offset = Offset { x: 6.0, y: -8.0 };

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Width of the viewport the card lives in (W).
    pub viewport_width: f32,
    /// Commit threshold as a fraction of W.
    pub commit_ratio: f32,
    /// Horizontal fly-out target as a multiple of W.
    pub exit_ratio: f32,
    pub commit_duration: Duration,
    pub spring: SpringParams,
}

impl GestureConfig {
    #[must_use]
    pub fn for_viewport(viewport_width: f32) -> Self {
        Self {
            viewport_width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn commit_threshold(&self) -> f32 {
        self.viewport_width * self.commit_ratio
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            viewport_width: 390.0,
            commit_ratio: 0.25,
            exit_ratio: 1.4,
            commit_duration: Duration::from_millis(250),
            spring: SpringParams::default(),
        }
    }
}

/// Observable phase of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
    Committing(Direction),
    Cancelling,
}

/// What a pointer release did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Empty stack or an animation already in flight.
    Ignored,
    Committing(Direction),
    Cancelling,
}

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    Dragging,
    Committing { direction: Direction, tween: Tween },
    Cancelling { spring: Spring },
}

/// One card as the view should draw it. Index 0 is the top card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardView<'a> {
    pub item: &'a Item,
    pub depth: usize,
    /// Only the top card receives pointer input.
    pub interactive: bool,
    pub offset: Offset,
    pub rotation_deg: f32,
}

#[derive(Debug, Clone)]
pub struct GestureStack {
    queue: VecDeque<Item>,
    config: GestureConfig,
    tracker: PointerTracker,
    offset: Offset,
    motion: Motion,
}

impl GestureStack {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            tracker: PointerTracker::new(config.viewport_width),
            config,
            offset: Offset::ZERO,
            motion: Motion::Idle,
        }
    }

    /// Replace the queue. Hard reset point: any in-flight animation is
    /// abandoned without producing a Decision.
    ///
    /// Items whose id is already queued are dropped (first occurrence wins).
    pub fn load(&mut self, items: impl IntoIterator<Item = Item>) {
        if !matches!(self.motion, Motion::Idle | Motion::Dragging) {
            tracing::debug!("Abandoning in-flight card animation on reload");
        }

        let mut seen = HashSet::new();
        self.queue.clear();
        for item in items {
            if seen.insert(item.id.clone()) {
                self.queue.push_back(item);
            } else {
                tracing::warn!(id = %item.id, "Dropping duplicate item id from deck");
            }
        }
        self.reset_gesture();
    }

    /// Track a drag. Returns `false` when the move was ignored.
    pub fn on_pointer_move(&mut self, dx: f32, dy: f32) -> bool {
        if self.queue.is_empty() || !self.accepts_pointer() {
            return false;
        }
        self.offset = self.tracker.track(dx, dy).offset;
        self.motion = Motion::Dragging;
        true
    }

    pub fn on_pointer_release(&mut self, dx: f32, dy: f32) -> ReleaseOutcome {
        if self.queue.is_empty() || !self.accepts_pointer() {
            tracing::debug!("Ignoring pointer release while not dragging");
            return ReleaseOutcome::Ignored;
        }
        self.offset = Offset::new(dx, dy);

        if dx.abs() > self.config.commit_threshold() {
            let direction = Direction::from_dx(dx);
            let target = Offset::new(
                direction.sign() * self.config.exit_ratio * self.config.viewport_width,
                dy,
            );
            self.motion = Motion::Committing {
                direction,
                tween: Tween::new(self.offset, target, self.config.commit_duration),
            };
            ReleaseOutcome::Committing(direction)
        } else {
            self.motion = Motion::Cancelling {
                spring: Spring::new(self.offset, self.config.spring),
            };
            ReleaseOutcome::Cancelling
        }
    }

    /// Advance the active animation by `delta`.
    pub fn advance(&mut self, delta: Duration) -> Option<Decision> {
        match &mut self.motion {
            Motion::Idle | Motion::Dragging => None,
            Motion::Committing { tween, .. } => {
                tween.advance(delta);
                self.offset = tween.value();
                if tween.is_finished() {
                    self.complete_commit()
                } else {
                    None
                }
            }
            Motion::Cancelling { spring } => {
                spring.advance(delta);
                self.offset = spring.value();
                if spring.is_settled() {
                    self.reset_gesture();
                }
                None
            }
        }
    }

    /// Complete the active animation now.
    pub fn finish_animation(&mut self) -> Option<Decision> {
        match &mut self.motion {
            Motion::Idle | Motion::Dragging => None,
            Motion::Committing { tween, .. } => {
                tween.finish();
                self.complete_commit()
            }
            Motion::Cancelling { .. } => {
                self.reset_gesture();
                None
            }
        }
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match &self.motion {
            Motion::Idle => GesturePhase::Idle,
            Motion::Dragging => GesturePhase::Dragging,
            Motion::Committing { direction, .. } => GesturePhase::Committing(*direction),
            Motion::Cancelling { .. } => GesturePhase::Cancelling,
        }
    }

    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    #[must_use]
    pub fn rotation_deg(&self) -> f32 {
        self.tracker.rotation_for(self.offset.x)
    }

    #[must_use]
    pub fn top(&self) -> Option<&Item> {
        self.queue.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// "No items": nothing to show, pointer input is ignored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// At most [`MAX_VISIBLE_CARDS`] cards, top card first.
    #[must_use]
    pub fn visible_cards(&self) -> Vec<CardView<'_>> {
        self.queue
            .iter()
            .take(MAX_VISIBLE_CARDS)
            .enumerate()
            .map(|(depth, item)| {
                if depth == 0 {
                    CardView {
                        item,
                        depth,
                        interactive: true,
                        offset: self.offset,
                        rotation_deg: self.rotation_deg(),
                    }
                } else {
                    let d = depth as f32;
                    CardView {
                        item,
                        depth,
                        interactive: false,
                        offset: Offset::new(STACKED_CARD_STEP.x * d, STACKED_CARD_STEP.y * d),
                        rotation_deg: 0.0,
                    }
                }
            })
            .collect()
    }

    fn accepts_pointer(&self) -> bool {
        matches!(self.motion, Motion::Idle | Motion::Dragging)
    }

    fn complete_commit(&mut self) -> Option<Decision> {
        let direction = match self.motion {
            Motion::Committing { direction, .. } => direction,
            _ => return None,
        };
        let decision = self
            .queue
            .pop_front()
            .map(|item| Decision { item, direction });
        self.reset_gesture();
        if let Some(decision) = &decision {
            tracing::debug!(id = %decision.item.id, direction = decision.direction.as_str(), "Card committed");
        }
        decision
    }

    fn reset_gesture(&mut self) {
        self.offset = Offset::ZERO;
        self.motion = Motion::Idle;
    }
}
