//! Base property ids.
//!
//! The base set is always registered first and in this order, so these
//! constants are valid for every registry that holds it.

use lumen_shared::Vec4;

use super::registry::{PropertyId, PropertyRegistry};
use crate::animation::{Easing, TimeUnit};
use crate::layout::{Alignment, LayoutDirection, PositionType, UnitType};
use crate::values::{FontRef, TextureRef};

/// Width value.
pub const WIDTH: PropertyId = PropertyId(0);
/// Height value.
pub const HEIGHT: PropertyId = PropertyId(1);
/// Unit of [`WIDTH`].
pub const WIDTH_UNIT: PropertyId = PropertyId(2);
/// Unit of [`HEIGHT`].
pub const HEIGHT_UNIT: PropertyId = PropertyId(3);
/// Top padding (px).
pub const PADDING_TOP: PropertyId = PropertyId(4);
/// Right padding (px).
pub const PADDING_RIGHT: PropertyId = PropertyId(5);
/// Bottom padding (px).
pub const PADDING_BOTTOM: PropertyId = PropertyId(6);
/// Left padding (px).
pub const PADDING_LEFT: PropertyId = PropertyId(7);
/// Top margin (px).
pub const MARGIN_TOP: PropertyId = PropertyId(8);
/// Right margin (px).
pub const MARGIN_RIGHT: PropertyId = PropertyId(9);
/// Bottom margin (px).
pub const MARGIN_BOTTOM: PropertyId = PropertyId(10);
/// Left margin (px).
pub const MARGIN_LEFT: PropertyId = PropertyId(11);
/// Direction children flow in.
pub const LAYOUT_DIRECTION: PropertyId = PropertyId(12);
/// Horizontal alignment of children.
pub const HORIZONTAL_ALIGNMENT: PropertyId = PropertyId(13);
/// Vertical alignment of children.
pub const VERTICAL_ALIGNMENT: PropertyId = PropertyId(14);
/// Flow, relative or absolute positioning.
pub const POSITION_TYPE: PropertyId = PropertyId(15);
/// Top offset.
pub const TOP: PropertyId = PropertyId(16);
/// Left offset.
pub const LEFT: PropertyId = PropertyId(17);
/// Bottom offset.
pub const BOTTOM: PropertyId = PropertyId(18);
/// Right offset.
pub const RIGHT: PropertyId = PropertyId(19);
/// Unit of [`TOP`].
pub const TOP_UNIT: PropertyId = PropertyId(20);
/// Unit of [`LEFT`].
pub const LEFT_UNIT: PropertyId = PropertyId(21);
/// Unit of [`BOTTOM`].
pub const BOTTOM_UNIT: PropertyId = PropertyId(22);
/// Unit of [`RIGHT`].
pub const RIGHT_UNIT: PropertyId = PropertyId(23);
/// Background fill color (or texture tint).
pub const BACKGROUND_COLOR: PropertyId = PropertyId(24);
/// Background texture.
pub const BACKGROUND_TEXTURE: PropertyId = PropertyId(25);
/// Border color.
pub const BORDER_COLOR: PropertyId = PropertyId(26);
/// Border width (px).
pub const BORDER_WIDTH: PropertyId = PropertyId(27);
/// Border drawn inside the box when true, outside when false.
pub const BORDER_INNER: PropertyId = PropertyId(28);
/// Border width insets the content box.
pub const BORDER_AFFECTS_LAYOUT: PropertyId = PropertyId(29);
/// Clip horizontally to the box.
pub const OVERFLOW_HIDDEN_X: PropertyId = PropertyId(30);
/// Clip vertically to the box.
pub const OVERFLOW_HIDDEN_Y: PropertyId = PropertyId(31);
/// Node takes part in hit-testing.
pub const POINTER_EVENTS: PropertyId = PropertyId(32);
/// Pointer passes through the node to its ancestors.
pub const HIT_TEST_TRANSPARENT: PropertyId = PropertyId(33);
/// Children inherit this node's resolved state.
pub const PROPAGATE_STATE_TO_CHILDREN: PropertyId = PropertyId(34);
/// Node is disabled.
pub const DISABLED: PropertyId = PropertyId(35);
/// Transition duration.
pub const TRANSITION_DURATION: PropertyId = PropertyId(36);
/// Unit of [`TRANSITION_DURATION`].
pub const TRANSITION_UNIT: PropertyId = PropertyId(37);
/// Transition easing curve.
pub const TRANSITION_EASING: PropertyId = PropertyId(38);
/// Text font.
pub const FONT: PropertyId = PropertyId(39);
/// Text size (px).
pub const TEXT_SIZE: PropertyId = PropertyId(40);
/// Text color.
pub const TEXT_COLOR: PropertyId = PropertyId(41);

/// `(WIDTH, HEIGHT)`.
pub const SIZE: PropertyId = PropertyId(42);
/// `(WIDTH_UNIT, HEIGHT_UNIT)`.
pub const SIZE_UNIT: PropertyId = PropertyId(43);
/// `(PADDING_TOP, PADDING_RIGHT, PADDING_BOTTOM, PADDING_LEFT)`.
pub const PADDING: PropertyId = PropertyId(44);
/// `(MARGIN_TOP, MARGIN_RIGHT, MARGIN_BOTTOM, MARGIN_LEFT)`.
pub const MARGIN: PropertyId = PropertyId(45);
/// `(HORIZONTAL_ALIGNMENT, VERTICAL_ALIGNMENT)`.
pub const ALIGNMENT: PropertyId = PropertyId(46);
/// `(TOP, LEFT, BOTTOM, RIGHT)`.
pub const OFFSETS: PropertyId = PropertyId(47);
/// `(TOP_UNIT, LEFT_UNIT, BOTTOM_UNIT, RIGHT_UNIT)`.
pub const OFFSET_UNITS: PropertyId = PropertyId(48);
/// `(BORDER_COLOR, BORDER_WIDTH)`.
pub const BORDER: PropertyId = PropertyId(49);
/// `(OVERFLOW_HIDDEN_X, OVERFLOW_HIDDEN_Y)`.
pub const OVERFLOW: PropertyId = PropertyId(50);
/// `(TRANSITION_DURATION, TRANSITION_UNIT, TRANSITION_EASING)`.
pub const TRANSITION: PropertyId = PropertyId(51);

/// Number of base registrations.
pub const BASE_COUNT: usize = 52;

pub(super) fn register_base(registry: &mut PropertyRegistry) {
    let start = registry.len();
    let mut concrete =
        |id: PropertyId, name: &str, description: &str, default: super::PropertyValue| {
            let issued = registry.register_property(name, description, default);
            debug_assert!(
                start != 0 || issued == id,
                "base property {name} issued {issued}, expected {id}"
            );
        };

    concrete(WIDTH, "width", "box width", 0.0_f32.into());
    concrete(HEIGHT, "height", "box height", 0.0_f32.into());
    concrete(WIDTH_UNIT, "width_unit", "unit of width", UnitType::Px.into());
    concrete(HEIGHT_UNIT, "height_unit", "unit of height", UnitType::Px.into());
    concrete(PADDING_TOP, "padding_top", "top padding", 0.0_f32.into());
    concrete(PADDING_RIGHT, "padding_right", "right padding", 0.0_f32.into());
    concrete(PADDING_BOTTOM, "padding_bottom", "bottom padding", 0.0_f32.into());
    concrete(PADDING_LEFT, "padding_left", "left padding", 0.0_f32.into());
    concrete(MARGIN_TOP, "margin_top", "top margin", 0.0_f32.into());
    concrete(MARGIN_RIGHT, "margin_right", "right margin", 0.0_f32.into());
    concrete(MARGIN_BOTTOM, "margin_bottom", "bottom margin", 0.0_f32.into());
    concrete(MARGIN_LEFT, "margin_left", "left margin", 0.0_f32.into());
    concrete(
        LAYOUT_DIRECTION,
        "layout_direction",
        "child flow direction",
        LayoutDirection::Vertical.into(),
    );
    concrete(
        HORIZONTAL_ALIGNMENT,
        "horizontal_alignment",
        "horizontal child alignment",
        Alignment::Start.into(),
    );
    concrete(
        VERTICAL_ALIGNMENT,
        "vertical_alignment",
        "vertical child alignment",
        Alignment::Start.into(),
    );
    concrete(
        POSITION_TYPE,
        "position_type",
        "flow, relative or absolute",
        PositionType::Flow.into(),
    );
    concrete(TOP, "top", "top offset", 0.0_f32.into());
    concrete(LEFT, "left", "left offset", 0.0_f32.into());
    concrete(BOTTOM, "bottom", "bottom offset", 0.0_f32.into());
    concrete(RIGHT, "right", "right offset", 0.0_f32.into());
    concrete(TOP_UNIT, "top_unit", "unit of top", UnitType::Px.into());
    concrete(LEFT_UNIT, "left_unit", "unit of left", UnitType::Px.into());
    concrete(BOTTOM_UNIT, "bottom_unit", "unit of bottom", UnitType::Px.into());
    concrete(RIGHT_UNIT, "right_unit", "unit of right", UnitType::Px.into());
    concrete(BACKGROUND_COLOR, "background_color", "fill color or texture tint", Vec4::ZERO.into());
    concrete(
        BACKGROUND_TEXTURE,
        "background_texture",
        "background texture",
        TextureRef::none().into(),
    );
    concrete(BORDER_COLOR, "border_color", "border color", Vec4::ZERO.into());
    concrete(BORDER_WIDTH, "border_width", "border width", 0.0_f32.into());
    concrete(BORDER_INNER, "border_inner", "draw border inside the box", true.into());
    concrete(BORDER_AFFECTS_LAYOUT, "border_affects_layout", "border insets content", false.into());
    concrete(OVERFLOW_HIDDEN_X, "overflow_hidden_x", "clip horizontally", false.into());
    concrete(OVERFLOW_HIDDEN_Y, "overflow_hidden_y", "clip vertically", false.into());
    concrete(POINTER_EVENTS, "pointer_events", "take part in hit-testing", true.into());
    concrete(HIT_TEST_TRANSPARENT, "hit_test_transparent", "let the pointer through", false.into());
    concrete(
        PROPAGATE_STATE_TO_CHILDREN,
        "propagate_state_to_children",
        "children inherit the resolved state",
        false.into(),
    );
    concrete(DISABLED, "disabled", "node is disabled", false.into());
    concrete(TRANSITION_DURATION, "transition_duration", "transition duration", 0.0_f32.into());
    concrete(
        TRANSITION_UNIT,
        "transition_unit",
        "unit of transition duration",
        TimeUnit::Milliseconds.into(),
    );
    concrete(
        TRANSITION_EASING,
        "transition_easing",
        "transition easing curve",
        Easing::Linear.into(),
    );
    concrete(FONT, "font", "text font", FontRef::none().into());
    concrete(TEXT_SIZE, "text_size", "text size", 16.0_f32.into());
    concrete(TEXT_COLOR, "text_color", "text color", Vec4::WHITE.into());

    let composites: [(PropertyId, &str, &str, &[PropertyId]); 10] = [
        (SIZE, "size", "width and height", &[WIDTH, HEIGHT]),
        (SIZE_UNIT, "size_unit", "width and height units", &[WIDTH_UNIT, HEIGHT_UNIT]),
        (
            PADDING,
            "padding",
            "padding, clockwise from top",
            &[PADDING_TOP, PADDING_RIGHT, PADDING_BOTTOM, PADDING_LEFT],
        ),
        (
            MARGIN,
            "margin",
            "margin, clockwise from top",
            &[MARGIN_TOP, MARGIN_RIGHT, MARGIN_BOTTOM, MARGIN_LEFT],
        ),
        (
            ALIGNMENT,
            "alignment",
            "horizontal and vertical alignment",
            &[HORIZONTAL_ALIGNMENT, VERTICAL_ALIGNMENT],
        ),
        (OFFSETS, "offsets", "top, left, bottom, right offsets", &[TOP, LEFT, BOTTOM, RIGHT]),
        (
            OFFSET_UNITS,
            "offset_units",
            "units of the offsets",
            &[TOP_UNIT, LEFT_UNIT, BOTTOM_UNIT, RIGHT_UNIT],
        ),
        (BORDER, "border", "border color and width", &[BORDER_COLOR, BORDER_WIDTH]),
        (
            OVERFLOW,
            "overflow",
            "horizontal and vertical clipping",
            &[OVERFLOW_HIDDEN_X, OVERFLOW_HIDDEN_Y],
        ),
        (
            TRANSITION,
            "transition",
            "duration, unit and easing",
            &[TRANSITION_DURATION, TRANSITION_UNIT, TRANSITION_EASING],
        ),
    ];
    for (id, name, description, parts) in composites {
        match registry.register_composite(name, description, parts) {
            Ok(issued) => debug_assert!(
                start != 0 || issued == id,
                "base composite {name} issued {issued}"
            ),
            Err(err) => crate::error::diagnose(&err),
        }
    }
}
