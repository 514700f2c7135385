//! Layout geometry: units, boxes, flow arrangement and clipping.
//!
//! Everything here is pure arithmetic over resolved values. Reading the
//! inputs out of a style happens on the node side.

use lumen_shared::{Rect, Vec2};

use crate::error::{diagnose, UiError};
use crate::property::property_enum;

property_enum! {
    /// How a length value is interpreted.
    #[derive(Default)]
    pub enum UnitType {
        /// Logical pixels, multiplied by the window content scale.
        #[default]
        Px = 0,
        /// Percentage of the parent's size on the same axis.
        Percentage = 1,
        /// Percentage of the parent's width, on either axis.
        PercentageW = 2,
        /// Percentage of the parent's height, on either axis.
        PercentageH = 3,
    }
}

property_enum! {
    /// Main axis children flow along.
    #[derive(Default)]
    pub enum LayoutDirection {
        /// Left to right.
        Horizontal = 0,
        /// Top to bottom.
        #[default]
        Vertical = 1,
    }
}

property_enum! {
    /// Placement of children along one axis.
    #[derive(Default)]
    pub enum Alignment {
        /// Align to start (left/top).
        #[default]
        Start = 0,
        /// Align to center.
        Center = 1,
        /// Align to end (right/bottom).
        End = 2,
    }
}

property_enum! {
    /// Positioning mode.
    #[derive(Default)]
    pub enum PositionType {
        /// Placed by the parent's flow.
        #[default]
        Flow = 0,
        /// Placed by flow, then shifted by its offsets. Anchors absolute
        /// descendants.
        Relative = 1,
        /// Placed against the nearest relative ancestor (or the root).
        Absolute = 2,
    }
}

/// Horizontal or vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    fn of(self, v: Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }
}

/// Clamps a resolved length to a finite, non-negative value.
#[must_use]
pub fn sanitize_length(value: f32, what: &'static str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        diagnose(&UiError::Clamped { what });
        0.0
    }
}

/// Resolves a length against its unit.
///
/// `reference` is the parent's resolved size (the window size for the
/// root). Percentages are already in physical pixels; only `Px` values are
/// multiplied by `scale`.
#[must_use]
pub fn resolve_length(unit: UnitType, value: f32, axis: Axis, reference: Vec2, scale: f32) -> f32 {
    match unit {
        UnitType::Px => value * scale,
        UnitType::Percentage => axis.of(reference) * value / 100.0,
        UnitType::PercentageW => reference.x * value / 100.0,
        UnitType::PercentageH => reference.y * value / 100.0,
    }
}

/// Per-side pixel amounts, clockwise from the top.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    /// Top.
    pub top: f32,
    /// Right.
    pub right: f32,
    /// Bottom.
    pub bottom: f32,
    /// Left.
    pub left: f32,
}

impl Edges {
    /// No space on any side.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Same amount on every side.
    #[must_use]
    pub const fn uniform(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    /// Left plus right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total on both axes.
    #[must_use]
    pub fn total(&self) -> Vec2 {
        Vec2::new(self.horizontal(), self.vertical())
    }

    /// Every side multiplied by `scale`, negatives clamped to zero.
    #[must_use]
    pub fn scaled(&self, scale: f32) -> Self {
        Self {
            top: sanitize_length(self.top * scale, "padding or margin"),
            right: sanitize_length(self.right * scale, "padding or margin"),
            bottom: sanitize_length(self.bottom * scale, "padding or margin"),
            left: sanitize_length(self.left * scale, "padding or margin"),
        }
    }
}

/// Resolved box of one node, in window pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    /// Top-left corner of the border box.
    pub position: Vec2,
    /// Border-box size.
    pub size: Vec2,
    /// Inner spacing.
    pub padding: Edges,
    /// Outer spacing.
    pub margin: Edges,
}

impl LayoutBox {
    /// The border box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// Size including margins, as seen by the parent's flow.
    #[must_use]
    pub fn outer_size(&self) -> Vec2 {
        self.size + self.margin.total()
    }

    /// Area children are arranged in: the box minus padding, minus
    /// `border_inset` on every side.
    #[must_use]
    pub fn content_rect(&self, border_inset: f32) -> Rect {
        let x = self.position.x + self.padding.left + border_inset;
        let y = self.position.y + self.padding.top + border_inset;
        let w = self.size.x - self.padding.horizontal() - border_inset * 2.0;
        let h = self.size.y - self.padding.vertical() - border_inset * 2.0;
        Rect::new(x, y, w.max(0.0), h.max(0.0))
    }
}

/// Flow arrangement of a parent's children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowLayout {
    /// Main axis.
    pub direction: LayoutDirection,
    /// Horizontal alignment.
    pub horizontal: Alignment,
    /// Vertical alignment.
    pub vertical: Alignment,
}

impl FlowLayout {
    /// Places outer boxes of `sizes` inside `content`.
    ///
    /// Returns the top-left corner of each outer (margin) box. On the main
    /// axis each child follows the cumulative size of its earlier siblings,
    /// shifted by the alignment of the whole run; on the cross axis each
    /// child is aligned on its own.
    #[must_use]
    pub fn arrange(&self, content: Rect, sizes: &[Vec2]) -> Vec<Vec2> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::with_capacity(sizes.len());

        match self.direction {
            LayoutDirection::Horizontal => {
                let total_width: f32 = sizes.iter().map(|s| s.x).sum();
                let free = content.width - total_width;
                let start_x = content.x + align_offset(self.horizontal, free);

                let mut x = start_x;
                for size in sizes {
                    let y = content.y + align_offset(self.vertical, content.height - size.y);
                    results.push(Vec2::new(x, y));
                    x += size.x;
                }
            }
            LayoutDirection::Vertical => {
                let total_height: f32 = sizes.iter().map(|s| s.y).sum();
                let free = content.height - total_height;
                let start_y = content.y + align_offset(self.vertical, free);

                let mut y = start_y;
                for size in sizes {
                    let x = content.x + align_offset(self.horizontal, content.width - size.x);
                    results.push(Vec2::new(x, y));
                    y += size.y;
                }
            }
        }

        results
    }
}

fn align_offset(alignment: Alignment, free: f32) -> f32 {
    match alignment {
        Alignment::Start => 0.0,
        Alignment::Center => free * 0.5,
        Alignment::End => free,
    }
}

/// Resolved absolute offsets in pixels. `None` marks an offset that was
/// never set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offsets {
    /// Distance from the anchor's top edge.
    pub top: Option<f32>,
    /// Distance from the anchor's left edge.
    pub left: Option<f32>,
    /// Distance from the anchor's bottom edge.
    pub bottom: Option<f32>,
    /// Distance from the anchor's right edge.
    pub right: Option<f32>,
}

impl Offsets {
    /// Places a box of `size` against `anchor`. `left`/`top` win over
    /// `right`/`bottom`; with neither the box sits at the anchor's origin.
    #[must_use]
    pub fn place(&self, anchor: Rect, size: Vec2) -> Vec2 {
        let x = match (self.left, self.right) {
            (Some(left), _) => anchor.x + left,
            (None, Some(right)) => anchor.right() - right - size.x,
            (None, None) => anchor.x,
        };
        let y = match (self.top, self.bottom) {
            (Some(top), _) => anchor.y + top,
            (None, Some(bottom)) => anchor.bottom() - bottom - size.y,
            (None, None) => anchor.y,
        };
        Vec2::new(x, y)
    }

    /// Shift applied to a relatively positioned box.
    #[must_use]
    pub fn shift(&self) -> Vec2 {
        let dx = match (self.left, self.right) {
            (Some(left), _) => left,
            (None, Some(right)) => -right,
            (None, None) => 0.0,
        };
        let dy = match (self.top, self.bottom) {
            (Some(top), _) => top,
            (None, Some(bottom)) => -bottom,
            (None, None) => 0.0,
        };
        Vec2::new(dx, dy)
    }
}

/// Clip rect of a node: the parent's clip, narrowed to `visible` on the
/// axes that hide overflow.
#[must_use]
pub fn clip_rect(parent_clip: Rect, visible: Rect, hide_x: bool, hide_y: bool) -> Rect {
    let mut clip = parent_clip;
    if hide_x {
        clip = clip.clip_x(&visible);
    }
    if hide_y {
        clip = clip.clip_y(&visible);
    }
    clip
}
