//! Reading layout and paint inputs out of a style state, and sizing.

use lumen_shared::{Vec2, Vec4};

use super::{Node, NodeKind};
use crate::animation::{Easing, TimeUnit};
use crate::layout::{
    resolve_length, sanitize_length, Alignment, Axis, Edges, FlowLayout, LayoutDirection, Offsets,
    PositionType, UnitType,
};
use crate::property::props;
use crate::style::StyleState;
use crate::text::TextMetrics;
use crate::values::{FontRef, TextureRef, ValueRegistry};

/// Every per-node value the layout, event and paint passes consume.
///
/// Missing or unreadable entries fall back to the registry defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeParams {
    /// Raw width value.
    pub width: f32,
    /// Raw height value.
    pub height: f32,
    /// Width was explicitly set.
    pub width_set: bool,
    /// Height was explicitly set.
    pub height_set: bool,
    /// Unit of `width`.
    pub width_unit: UnitType,
    /// Unit of `height`.
    pub height_unit: UnitType,
    /// Unscaled padding.
    pub padding: Edges,
    /// Unscaled margin.
    pub margin: Edges,
    /// Unscaled border width.
    pub border_width: f32,
    /// Border drawn inside the box.
    pub border_inner: bool,
    /// Border insets the content box.
    pub border_affects_layout: bool,
    /// Child arrangement.
    pub flow: FlowLayout,
    /// Positioning mode.
    pub position_type: PositionType,
    /// Raw top, left, bottom, right offsets; `None` when unset.
    pub offsets: [Option<f32>; 4],
    /// Units of `offsets`.
    pub offset_units: [UnitType; 4],
    /// Clip horizontally.
    pub overflow_hidden_x: bool,
    /// Clip vertically.
    pub overflow_hidden_y: bool,
    /// Takes part in hit-testing.
    pub pointer_events: bool,
    /// Lets the pointer through.
    pub hit_test_transparent: bool,
    /// Children inherit the resolved state.
    pub propagate_state_to_children: bool,
    /// Disabled.
    pub disabled: bool,
    /// Transition duration in milliseconds.
    pub transition_duration_ms: f32,
    /// Transition curve.
    pub transition_easing: Easing,
    /// Background fill or texture tint.
    pub background_color: Vec4,
    /// Background texture.
    pub background_texture: TextureRef,
    /// Border color.
    pub border_color: Vec4,
    /// Text font.
    pub font: FontRef,
    /// Unscaled text size.
    pub text_size: f32,
    /// Text color.
    pub text_color: Vec4,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            width_set: false,
            height_set: false,
            width_unit: UnitType::Px,
            height_unit: UnitType::Px,
            padding: Edges::ZERO,
            margin: Edges::ZERO,
            border_width: 0.0,
            border_inner: true,
            border_affects_layout: false,
            flow: FlowLayout::default(),
            position_type: PositionType::Flow,
            offsets: [None; 4],
            offset_units: [UnitType::Px; 4],
            overflow_hidden_x: false,
            overflow_hidden_y: false,
            pointer_events: true,
            hit_test_transparent: false,
            propagate_state_to_children: false,
            disabled: false,
            transition_duration_ms: 0.0,
            transition_easing: Easing::Linear,
            background_color: Vec4::ZERO,
            background_texture: TextureRef::none(),
            border_color: Vec4::ZERO,
            font: FontRef::none(),
            text_size: 16.0,
            text_color: Vec4::WHITE,
        }
    }
}

impl NodeParams {
    /// Reads every input out of `state`.
    ///
    /// Text nodes ignore the pointer unless `pointer_events` was set
    /// explicitly.
    #[must_use]
    pub fn read(state: &StyleState, values: &ValueRegistry, kind: &NodeKind) -> Self {
        let d = Self::default();
        let f = |id, fallback: f32| state.try_get(id, values, fallback);
        let b = |id, fallback: bool| state.try_get(id, values, fallback);
        let u = |id| state.try_get(id, values, UnitType::Px);
        let offset = |id| state.try_get_if_set::<f32>(id, values);

        let pointer_events = match kind {
            NodeKind::Frame => b(props::POINTER_EVENTS, d.pointer_events),
            NodeKind::Text(_) => state
                .try_get_if_set(props::POINTER_EVENTS, values)
                .unwrap_or(false),
        };
        let transition_unit = state.try_get(props::TRANSITION_UNIT, values, TimeUnit::Milliseconds);

        Self {
            width: f(props::WIDTH, d.width),
            height: f(props::HEIGHT, d.height),
            width_set: state.is_set(props::WIDTH),
            height_set: state.is_set(props::HEIGHT),
            width_unit: u(props::WIDTH_UNIT),
            height_unit: u(props::HEIGHT_UNIT),
            padding: Edges {
                top: f(props::PADDING_TOP, 0.0),
                right: f(props::PADDING_RIGHT, 0.0),
                bottom: f(props::PADDING_BOTTOM, 0.0),
                left: f(props::PADDING_LEFT, 0.0),
            },
            margin: Edges {
                top: f(props::MARGIN_TOP, 0.0),
                right: f(props::MARGIN_RIGHT, 0.0),
                bottom: f(props::MARGIN_BOTTOM, 0.0),
                left: f(props::MARGIN_LEFT, 0.0),
            },
            border_width: f(props::BORDER_WIDTH, d.border_width),
            border_inner: b(props::BORDER_INNER, d.border_inner),
            border_affects_layout: b(props::BORDER_AFFECTS_LAYOUT, d.border_affects_layout),
            flow: FlowLayout {
                direction: state.try_get(
                    props::LAYOUT_DIRECTION,
                    values,
                    LayoutDirection::Vertical,
                ),
                horizontal: state.try_get(props::HORIZONTAL_ALIGNMENT, values, Alignment::Start),
                vertical: state.try_get(props::VERTICAL_ALIGNMENT, values, Alignment::Start),
            },
            position_type: state.try_get(props::POSITION_TYPE, values, PositionType::Flow),
            offsets: [
                offset(props::TOP),
                offset(props::LEFT),
                offset(props::BOTTOM),
                offset(props::RIGHT),
            ],
            offset_units: [
                u(props::TOP_UNIT),
                u(props::LEFT_UNIT),
                u(props::BOTTOM_UNIT),
                u(props::RIGHT_UNIT),
            ],
            overflow_hidden_x: b(props::OVERFLOW_HIDDEN_X, false),
            overflow_hidden_y: b(props::OVERFLOW_HIDDEN_Y, false),
            pointer_events,
            hit_test_transparent: b(props::HIT_TEST_TRANSPARENT, d.hit_test_transparent),
            propagate_state_to_children: b(props::PROPAGATE_STATE_TO_CHILDREN, false),
            disabled: b(props::DISABLED, false),
            transition_duration_ms: transition_unit
                .to_millis(f(props::TRANSITION_DURATION, 0.0)),
            transition_easing: state.try_get(props::TRANSITION_EASING, values, Easing::Linear),
            background_color: state.try_get(props::BACKGROUND_COLOR, values, d.background_color),
            background_texture: state.try_get(
                props::BACKGROUND_TEXTURE,
                values,
                TextureRef::none(),
            ),
            border_color: state.try_get(props::BORDER_COLOR, values, d.border_color),
            font: state.try_get(props::FONT, values, FontRef::none()),
            text_size: f(props::TEXT_SIZE, d.text_size),
            text_color: state.try_get(props::TEXT_COLOR, values, d.text_color),
        }
    }

    /// Border width in pixels that insets the content box.
    #[must_use]
    pub fn border_inset(&self, scale: f32) -> f32 {
        if self.border_affects_layout {
            sanitize_length(self.border_width * scale, "border width")
        } else {
            0.0
        }
    }

    /// Offsets resolved against the anchor's size.
    #[must_use]
    pub fn resolve_offsets(&self, anchor: Vec2, scale: f32) -> Offsets {
        let resolve = |i: usize, axis| {
            self.offsets[i].map(|v| resolve_length(self.offset_units[i], v, axis, anchor, scale))
        };
        Offsets {
            top: resolve(0, Axis::Y),
            left: resolve(1, Axis::X),
            bottom: resolve(2, Axis::Y),
            right: resolve(3, Axis::X),
        }
    }
}

impl Node {
    /// Re-reads [`NodeParams`] from the rendered style.
    pub(crate) fn refresh_params(&mut self, values: &ValueRegistry) {
        self.params = NodeParams::read(&self.rendered, values, &self.kind);
    }

    /// Resolves this node's border-box size.
    ///
    /// `reference` is the parent's size (the window size for the root).
    /// Text nodes measure their text on every axis whose explicit size is
    /// zero.
    #[must_use]
    pub fn compute_size(&self, reference: Vec2, scale: f32, metrics: &dyn TextMetrics) -> Vec2 {
        let p = &self.params;
        let width = sanitize_length(
            resolve_length(p.width_unit, p.width, Axis::X, reference, scale),
            "width",
        );
        let height = sanitize_length(
            resolve_length(p.height_unit, p.height, Axis::Y, reference, scale),
            "height",
        );

        match &self.kind {
            NodeKind::Frame => Vec2::new(width, height),
            NodeKind::Text(content) => {
                let measured = metrics.measure(&content.text, &p.font, p.text_size * scale)
                    + p.padding.scaled(scale).total();
                Vec2::new(
                    if p.width == 0.0 { measured.x } else { width },
                    if p.height == 0.0 { measured.y } else { height },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::node::TextContent;
    use crate::property::{IntoValues, PropertyRegistry};
    use crate::text::MonospaceMetrics;

    fn state_with(
        sets: &[(crate::property::PropertyId, Vec<crate::property::PropertyValue>)],
    ) -> StyleState {
        let registry = PropertyRegistry::with_base();
        let mut state = StyleState::from_registry(&registry);
        for (id, values) in sets {
            state.set_in(&registry, *id, values.clone(), false).unwrap();
        }
        state
    }

    #[test]
    fn test_defaults_without_assignments() {
        let state = state_with(&[]);
        let params = NodeParams::read(&state, &ValueRegistry::new(), &NodeKind::Frame);
        assert_eq!(params, NodeParams::default());
    }

    #[test]
    fn test_text_ignores_pointer_unless_set() {
        let kind = NodeKind::Text(TextContent::default());
        let values = ValueRegistry::new();

        let plain = state_with(&[]);
        assert!(!NodeParams::read(&plain, &values, &kind).pointer_events);

        let explicit = state_with(&[(props::POINTER_EVENTS, true.into_values())]);
        assert!(NodeParams::read(&explicit, &values, &kind).pointer_events);
    }

    #[test]
    fn test_transition_seconds_convert() {
        let state = state_with(&[(
            props::TRANSITION,
            (0.25_f32, TimeUnit::Seconds, Easing::EaseOutCubic).into_values(),
        )]);
        let params = NodeParams::read(&state, &ValueRegistry::new(), &NodeKind::Frame);
        assert_eq!(params.transition_duration_ms, 250.0);
        assert_eq!(params.transition_easing, Easing::EaseOutCubic);
    }

    #[test]
    fn test_size_units() {
        let state = state_with(&[
            (props::SIZE_UNIT, (UnitType::Px, UnitType::Percentage).into_values()),
            (props::SIZE, (100.0_f32, 50.0_f32).into_values()),
        ]);
        let mut node = Node::new(Key::named("n"), NodeKind::Frame, None, 0);
        node.params = NodeParams::read(&state, &ValueRegistry::new(), &NodeKind::Frame);

        let size = node.compute_size(Vec2::new(800.0, 600.0), 2.0, &MonospaceMetrics::default());
        assert_eq!(size, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_text_measures_when_unsized() {
        let kind = NodeKind::Text(TextContent { text: "abcd".into() });
        let mut node = Node::new(Key::named("t"), kind.clone(), None, 0);
        node.params = NodeParams::read(&state_with(&[]), &ValueRegistry::new(), &kind);

        let metrics = MonospaceMetrics::default();
        let size = node.compute_size(Vec2::new(800.0, 600.0), 1.0, &metrics);
        assert_eq!(size, metrics.measure("abcd", &FontRef::none(), 16.0));
    }
}
