//! Axis-aligned rectangles in screen coordinates.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from position and size.
    #[must_use]
    pub const fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Intersection of two rectangles. Disjoint inputs collapse to a
    /// zero-area rect pinned inside `self`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        self.clip_x(other).clip_y(other)
    }

    /// Intersects only the horizontal span with `other`.
    #[must_use]
    pub fn clip_x(&self, other: &Self) -> Self {
        let (x, width) = clip_span(self.x, self.width, other.x, other.width);
        Self::new(x, self.y, width, self.height)
    }

    /// Intersects only the vertical span with `other`.
    #[must_use]
    pub fn clip_y(&self, other: &Self) -> Self {
        let (y, height) = clip_span(self.y, self.height, other.y, other.height);
        Self::new(self.x, y, self.width, height)
    }
}

/// Intersects `[a, a + a_len]` with `[b, b + b_len]`, never producing a
/// negative length and never leaving the first span.
fn clip_span(a: f32, a_len: f32, b: f32, b_len: f32) -> (f32, f32) {
    let start = a.max(b);
    let end = (a + a_len).min(b + b_len);
    if end <= start {
        let pinned = start.min(a + a_len).max(a);
        (pinned, 0.0)
    } else {
        (start, end - start)
    }
}
