//! Framework-free animation primitives for the card stack.
//!
//! Animations are advanced explicitly by the caller's frame timer; nothing
//! here sleeps or spawns.

use std::time::Duration;

use super::pointer::Offset;

/// Fixed integration step for spring physics.
const SPRING_STEP: Duration = Duration::from_millis(1);

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// Cubic ease-in-out over `[0, 1]`.
pub(crate) fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Fixed-duration eased translation between two offsets.
#[derive(Debug, Clone)]
pub struct Tween {
    from: Offset,
    to: Offset,
    timer: EffectTimer,
}

impl Tween {
    #[must_use]
    pub fn new(from: Offset, to: Offset, duration: Duration) -> Self {
        Self {
            from,
            to,
            timer: EffectTimer::new(duration),
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    pub fn finish(&mut self) {
        self.timer.finish();
    }

    #[must_use]
    pub fn value(&self) -> Offset {
        self.from.lerp(self.to, ease_in_out(self.timer.progress()))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }
}

/// Damped spring parameters (mass-spring-damper).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Displacement (px) below which the spring may come to rest.
    pub rest_displacement: f32,
    /// Speed (px/s) below which the spring may come to rest.
    pub rest_speed: f32,
    /// Hard cap on simulated time; the spring snaps to rest when exceeded.
    pub max_duration: Duration,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 40.0,
            damping: 7.0,
            mass: 1.0,
            rest_displacement: 0.1,
            rest_speed: 0.1,
            max_duration: Duration::from_secs(5),
        }
    }
}

/// Spring pulling an offset back to the origin.
#[derive(Debug, Clone)]
pub struct Spring {
    position: Offset,
    velocity: Offset,
    params: SpringParams,
    elapsed: Duration,
    settled: bool,
}

impl Spring {
    #[must_use]
    pub fn new(from: Offset, params: SpringParams) -> Self {
        Self {
            position: from,
            velocity: Offset::ZERO,
            params,
            elapsed: Duration::ZERO,
            settled: false,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        let mut remaining = delta;
        while !self.settled && !remaining.is_zero() {
            let step = remaining.min(SPRING_STEP);
            remaining -= step;
            self.step(step.as_secs_f32());
            self.elapsed = self.elapsed.saturating_add(step);

            if self.at_rest() || self.elapsed >= self.params.max_duration {
                self.finish();
            }
        }
    }

    pub fn finish(&mut self) {
        self.position = Offset::ZERO;
        self.velocity = Offset::ZERO;
        self.settled = true;
    }

    #[must_use]
    pub fn value(&self) -> Offset {
        self.position
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    // Semi-implicit Euler.
    fn step(&mut self, h: f32) {
        let SpringParams {
            stiffness,
            damping,
            mass,
            ..
        } = self.params;
        let mass = mass.max(f32::EPSILON);

        let ax = (-stiffness * self.position.x - damping * self.velocity.x) / mass;
        let ay = (-stiffness * self.position.y - damping * self.velocity.y) / mass;
        self.velocity.x += ax * h;
        self.velocity.y += ay * h;
        self.position.x += self.velocity.x * h;
        self.position.y += self.velocity.y * h;
    }

    fn at_rest(&self) -> bool {
        let displacement = self.position.x.hypot(self.position.y);
        let speed = self.velocity.x.hypot(self.velocity.y);
        displacement < self.params.rest_displacement && speed < self.params.rest_speed
    }
}
