//! Gesture-driven card stack: pointer tracking, animations, and the commit/cancel
//! state machine.

mod animation;
mod pointer;
mod stack;

pub use animation::{EffectTimer, Spring, SpringParams, Tween};
pub use pointer::{MAX_ROTATION_DEG, Offset, PointerSample, PointerTracker};
pub use stack::{
    CardView, GestureConfig, GesturePhase, GestureStack, MAX_VISIBLE_CARDS, ReleaseOutcome,
};
