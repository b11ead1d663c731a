//! Deck items, ground-truth labels, and swipe decisions.

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Ground-truth classification of a hive photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Healthy,
    Unhealthy,
}

impl Label {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Label::Healthy => "healthy",
            Label::Unhealthy => "unhealthy",
        }
    }

    /// The label a reviewer picks by swiping in `direction`.
    ///
    /// Right means healthy, left means unhealthy.
    #[must_use]
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Right => Label::Healthy,
            Direction::Left => Label::Unhealthy,
        }
    }

    /// The swipe direction that selects this label.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Label::Healthy => Direction::Right,
            Label::Unhealthy => Direction::Left,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal swipe direction of a committed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction of a horizontal displacement. Zero counts as left.
    #[must_use]
    pub fn from_dx(dx: f32) -> Self {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// `+1.0` for right, `-1.0` for left.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Opaque handle to the image a card displays (URI or asset path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One card in a deck. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub image: ImageRef,
    pub label: Label,
    #[serde(default)]
    pub caption: String,
}

impl Item {
    #[must_use]
    pub fn new(id: impl Into<String>, image: impl Into<String>, label: Label) -> Self {
        Self {
            id: ItemId::new(id),
            image: ImageRef::new(image),
            label,
            caption: String::new(),
        }
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }
}

/// The committed outcome of one swipe on one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub item: Item,
    pub direction: Direction,
}

impl Decision {
    /// Label the reviewer picked.
    #[must_use]
    pub fn picked(&self) -> Label {
        Label::from_direction(self.direction)
    }

    /// Whether the pick matches the item's ground truth.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.picked() == self.item.label
    }
}
