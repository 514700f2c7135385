//! # Nodes
//!
//! One node header shared by every kind. Kinds differ only in how they
//! measure themselves and what they paint:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Node                                                     │
//! │  identity   key, parent, children, position in parent    │
//! │  styling    applied styles → final style → overrides     │
//! │  animation  transition from/to, clock, rendered style    │
//! │  layout     params read from the rendered style, box     │
//! │  events     state, resolved state, clip, event record    │
//! │  kind       Frame | Text                                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod layout;
mod paint;
mod transition;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use lumen_shared::Rect;

pub use layout::NodeParams;

use crate::animation::TransitionClock;
use crate::error::diagnose;
use crate::event::EventRecord;
use crate::key::Key;
use crate::layout::LayoutBox;
use crate::property::{IntoValues, PropertyId};
use crate::style::{Style, StyleState, VisualState};
use crate::tree::NodeId;

/// Text carried by a text node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextContent {
    /// The string drawn.
    pub text: String,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A box with background and border that holds children.
    Frame,
    /// A run of text.
    Text(TextContent),
}

impl NodeKind {
    /// Short name for diagnostics.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::Text(_) => "text",
        }
    }

    /// True when both kinds are the same variant.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A retained UI element.
#[derive(Debug)]
pub struct Node {
    key: Key,
    kind: NodeKind,
    position_in_parent: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,

    applied_styles: Vec<Style>,
    applied_style_hash: u64,
    applied_style_high_watermark: usize,
    final_style: Style,
    overrides: StyleState,
    has_overrides: bool,

    rendered: StyleState,
    transition_from: StyleState,
    transition_to: StyleState,
    clock: TransitionClock,
    rendered_once: bool,
    composed_state: Option<VisualState>,

    pub(crate) state: VisualState,
    pub(crate) resolved_state: VisualState,
    pub(crate) last_state: VisualState,

    pub(crate) params: NodeParams,
    pub(crate) layout_box: LayoutBox,
    pub(crate) clip: Rect,
    pub(crate) event_record: EventRecord,
    pub(crate) child_has_event: bool,

    pub(crate) active: bool,
    pub(crate) committed: bool,
    pub(crate) style_dirty: bool,
}

impl Node {
    /// Creates a detached node. Only the context builds nodes.
    pub(crate) fn new(key: Key, kind: NodeKind, parent: Option<NodeId>, position: usize) -> Self {
        Self {
            key,
            kind,
            position_in_parent: position,
            parent,
            children: Vec::new(),
            applied_styles: Vec::new(),
            applied_style_hash: 0,
            applied_style_high_watermark: 0,
            final_style: Style::new("final"),
            overrides: StyleState::default(),
            has_overrides: false,
            rendered: StyleState::default(),
            transition_from: StyleState::default(),
            transition_to: StyleState::default(),
            clock: TransitionClock::default(),
            rendered_once: false,
            composed_state: None,
            state: VisualState::Normal,
            resolved_state: VisualState::Normal,
            last_state: VisualState::Normal,
            params: NodeParams::default(),
            layout_box: LayoutBox::default(),
            clip: Rect::ZERO,
            event_record: EventRecord::default(),
            child_has_event: false,
            active: false,
            committed: false,
            style_dirty: true,
        }
    }

    /// Caller-supplied identity.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Text of a text node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(content) => Some(&content.text),
            NodeKind::Frame => None,
        }
    }

    pub(crate) fn set_text(&mut self, text: &str) {
        if let NodeKind::Text(content) = &mut self.kind {
            if content.text != text {
                content.text.clear();
                content.text.push_str(text);
            }
        }
    }

    /// Ordinal among the parent's children.
    #[must_use]
    pub fn position_in_parent(&self) -> usize {
        self.position_in_parent
    }

    /// Parent id; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    /// Own event state, before propagation.
    #[must_use]
    pub fn state(&self) -> VisualState {
        self.state
    }

    /// State used for styling, after propagation from ancestors.
    #[must_use]
    pub fn resolved_state(&self) -> VisualState {
        self.resolved_state
    }

    /// Resolved state of the previous frame.
    #[must_use]
    pub fn last_state(&self) -> VisualState {
        self.last_state
    }

    /// Resolved box.
    #[must_use]
    pub fn layout_box(&self) -> &LayoutBox {
        &self.layout_box
    }

    /// Clip rect applied to this node's drawing and hit-testing.
    #[must_use]
    pub fn clip_rect(&self) -> Rect {
        self.clip
    }

    /// Event record of the last committed frame.
    #[must_use]
    pub fn event_record(&self) -> EventRecord {
        self.event_record
    }

    /// A descendant was hovered, pressed or dragged in the last commit.
    /// Such a node stays `Normal` itself.
    #[must_use]
    pub fn child_has_event(&self) -> bool {
        self.child_has_event
    }

    /// False through the first committed frame that references this node,
    /// true from the next one on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Values read from the rendered style at the last commit.
    #[must_use]
    pub fn params(&self) -> &NodeParams {
        &self.params
    }

    /// The merge of every applied style.
    #[must_use]
    pub fn final_style(&self) -> &Style {
        &self.final_style
    }

    /// Styles applied by the caller this frame, in merge order.
    #[must_use]
    pub fn applied_styles(&self) -> &[Style] {
        &self.applied_styles
    }

    /// Most styles ever applied at once.
    #[must_use]
    pub fn applied_style_high_watermark(&self) -> usize {
        self.applied_style_high_watermark
    }

    /// The style state last emitted to geometry.
    #[must_use]
    pub fn rendered_style(&self) -> &StyleState {
        &self.rendered
    }

    /// The state the current transition runs toward.
    #[must_use]
    pub fn transition_target(&self) -> &StyleState {
        &self.transition_to
    }

    /// The state the current transition started from.
    #[must_use]
    pub fn transition_source(&self) -> &StyleState {
        &self.transition_from
    }

    /// Returns true while a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.clock.is_running()
    }

    /// Caller overrides.
    #[must_use]
    pub fn overrides(&self) -> &StyleState {
        &self.overrides
    }

    /// Overrides a property on this node. Overrides win over every style
    /// value and take part in transitions.
    pub fn set_override(&mut self, id: PropertyId, values: impl IntoValues) -> &mut Self {
        self.set_override_with(id, values, false)
    }

    /// [`Node::set_override`] with an explicit importance flag.
    pub fn set_override_with(
        &mut self,
        id: PropertyId,
        values: impl IntoValues,
        important: bool,
    ) -> &mut Self {
        if self.overrides.is_empty() {
            self.overrides = StyleState::new();
        }
        match self.overrides.set(id, values, important) {
            Ok(()) => {
                self.has_overrides = true;
                self.style_dirty = true;
            }
            Err(err) => {
                tracing::debug!(key = %self.key, property = %id, "override dropped");
                diagnose(&err);
            }
        }
        self
    }

    /// Removes an override.
    pub fn clear_override(&mut self, id: PropertyId) -> &mut Self {
        if !self.overrides.is_empty() {
            self.overrides.reset(id);
            self.has_overrides = self.overrides.iter_set().next().is_some();
            self.style_dirty = true;
        }
        self
    }

    /// Copies and merges `styles` when they differ from the last frame's.
    pub(crate) fn apply_styles(&mut self, styles: &[&Style]) {
        let hash = style_hash(styles);
        if hash == self.applied_style_hash && styles.len() == self.applied_styles.len() {
            return;
        }
        self.applied_style_hash = hash;
        self.applied_style_high_watermark = self.applied_style_high_watermark.max(styles.len());

        self.applied_styles.clear();
        self.applied_styles.extend(styles.iter().map(|style| (*style).clone()));

        let mut merged = Style::new("final");
        for style in &self.applied_styles {
            merged.merge(style);
        }
        self.final_style = merged;
        self.style_dirty = true;
    }

    /// Target of the transition for the current resolved state: the final
    /// style's layer for that state with overrides laid over it.
    pub(crate) fn compose_target(&self) -> StyleState {
        let mut target = self.final_style.resolve_state(self.resolved_state);
        if self.has_overrides {
            target.overlay(&self.overrides);
        }
        target
    }
}

/// Folds `(uid, revision)` of each style, in order.
fn style_hash(styles: &[&Style]) -> u64 {
    let mut hasher = DefaultHasher::new();
    styles.len().hash(&mut hasher);
    for style in styles {
        style.uid().hash(&mut hasher);
        style.revision().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use lumen_shared::Vec4;

    use super::*;
    use crate::property::props;
    use crate::values::ValueRegistry;

    #[test]
    fn test_style_copies_refresh_on_revision() {
        let mut node = Node::new(Key::named("n"), NodeKind::Frame, None, 0);
        let mut style = Style::new("s");
        style.text_size(10.0);

        node.apply_styles(&[&style]);
        let first = node.applied_style_hash;
        node.style_dirty = false;

        node.apply_styles(&[&style]);
        assert_eq!(node.applied_style_hash, first);
        assert!(!node.style_dirty);

        style.text_size(12.0);
        node.apply_styles(&[&style]);
        assert_ne!(node.applied_style_hash, first);
        assert!(node.style_dirty);
        assert_eq!(
            node.compose_target().try_get(props::TEXT_SIZE, &ValueRegistry::new(), 0.0_f32),
            12.0
        );
    }

    #[test]
    fn test_override_beats_important_style() {
        let mut node = Node::new(Key::named("n"), NodeKind::Frame, None, 0);
        let mut style = Style::new("s");
        style.background_color(Vec4::rgb(1.0, 1.0, 1.0)).important();
        node.apply_styles(&[&style]);

        node.set_override(props::BACKGROUND_COLOR, Vec4::rgb(9.0, 9.0, 9.0));
        let values = ValueRegistry::new();
        assert_eq!(
            node.compose_target().try_get(props::BACKGROUND_COLOR, &values, Vec4::ZERO),
            Vec4::rgb(9.0, 9.0, 9.0)
        );

        node.clear_override(props::BACKGROUND_COLOR);
        assert_eq!(
            node.compose_target().try_get(props::BACKGROUND_COLOR, &values, Vec4::ZERO),
            Vec4::rgb(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_text_kind() {
        let mut node = Node::new(
            Key::named("t"),
            NodeKind::Text(TextContent { text: "Hi".into() }),
            None,
            0,
        );
        node.set_text("Hello");
        assert_eq!(node.text(), Some("Hello"));
        assert!(node.kind().same_variant(&NodeKind::Text(TextContent::default())));
        assert!(!node.kind().same_variant(&NodeKind::Frame));
    }
}
