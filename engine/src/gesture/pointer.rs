//! Pointer tracking: raw drag deltas to card offset and tilt.

/// Maximum card tilt in degrees, reached at a full viewport-width drag.
pub const MAX_ROTATION_DEG: f32 = 25.0;

/// 2D translation of the top card relative to its resting position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn lerp(self, to: Offset, t: f32) -> Offset {
        Offset {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// One tracked pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub offset: Offset,
    pub rotation_deg: f32,
}

/// Stateless map from pointer deltas to card transform.
#[derive(Debug, Clone, Copy)]
pub struct PointerTracker {
    viewport_width: f32,
}

impl PointerTracker {
    #[must_use]
    pub fn new(viewport_width: f32) -> Self {
        Self {
            viewport_width: viewport_width.max(1.0),
        }
    }

    #[must_use]
    pub fn track(&self, dx: f32, dy: f32) -> PointerSample {
        PointerSample {
            offset: Offset::new(dx, dy),
            rotation_deg: self.rotation_for(dx),
        }
    }

    /// Linear map of `dx` over `[-W, W]` onto `[-25°, 25°]`, clamped outside.
    #[must_use]
    pub fn rotation_for(&self, dx: f32) -> f32 {
        (dx / self.viewport_width * MAX_ROTATION_DEG).clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG)
    }
}
