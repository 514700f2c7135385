//! # Event resolution
//!
//! Runs once per committed frame over the reconciled tree:
//!
//! ```text
//!   reverse pre-order (topmost first)        pre-order
//!  ┌─────────────────────────────────┐    ┌──────────────────────┐
//!  │ hit test → captures → own state │ →  │ propagate to children │
//!  └─────────────────────────────────┘    └──────────────────────┘
//! ```
//!
//! Later siblings paint over earlier ones and children paint over their
//! parent, so walking pre-order backwards meets the topmost node first.
//! The first opaque node under the cursor takes the hit; every node below
//! it stays unhovered.
//!
//! A node whose descendant is hovered, pressed or dragged is marked
//! `child_has_event` and keeps the `Normal` state, so only the innermost
//! interacting node shows an interaction state.

use lumen_shared::Vec2;

use crate::input::InputSnapshot;
use crate::style::VisualState;
use crate::tree::{NodeArena, NodeId};

/// Per-node result of one frame's event resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventRecord {
    /// The cursor is over this node and nothing opaque covers it.
    pub is_hovered: bool,
    /// This node holds press capture.
    pub is_pressed: bool,
    /// A press that started on this node was released over it.
    pub is_clicked: bool,
    /// The press that landed on this node completed a double click.
    pub is_double_clicked: bool,
    /// This node holds drag capture.
    pub is_dragging: bool,
    /// This node holds focus.
    pub is_focused: bool,
    /// Wheel movement delivered to the hovered node.
    pub scroll_delta: Vec2,
}

/// Singleton capture registers of one context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Captures {
    press: Option<NodeId>,
    drag: Option<NodeId>,
    focus: Option<NodeId>,
}

impl Captures {
    /// Node holding press capture.
    #[must_use]
    pub fn press(&self) -> Option<NodeId> {
        self.press
    }

    /// Node holding drag capture.
    #[must_use]
    pub fn drag(&self) -> Option<NodeId> {
        self.drag
    }

    /// Node holding focus.
    #[must_use]
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Gives press capture to `id`. Fails while another node holds it.
    pub fn capture_press(&mut self, id: NodeId) -> bool {
        acquire(&mut self.press, id)
    }

    /// Gives drag capture to `id`. Fails while another node holds it.
    pub fn capture_drag(&mut self, id: NodeId) -> bool {
        acquire(&mut self.drag, id)
    }

    /// Moves focus to `id`.
    pub fn capture_focus(&mut self, id: NodeId) {
        self.focus = Some(id);
    }

    /// Releases press capture if `id` holds it.
    pub fn release_press(&mut self, id: NodeId) -> bool {
        release(&mut self.press, id)
    }

    /// Releases drag capture if `id` holds it.
    pub fn release_drag(&mut self, id: NodeId) -> bool {
        release(&mut self.drag, id)
    }

    /// Releases focus if `id` holds it.
    pub fn release_focus(&mut self, id: NodeId) -> bool {
        release(&mut self.focus, id)
    }

    /// Clears registers that name destroyed nodes.
    pub fn retain_live(&mut self, arena: &NodeArena) {
        for slot in [&mut self.press, &mut self.drag, &mut self.focus] {
            if slot.is_some_and(|id| !arena.contains(id)) {
                *slot = None;
            }
        }
    }

    fn release_pointer(&mut self) {
        self.press = None;
        self.drag = None;
    }
}

fn acquire(slot: &mut Option<NodeId>, id: NodeId) -> bool {
    match *slot {
        Some(holder) if holder != id => false,
        _ => {
            *slot = Some(id);
            true
        }
    }
}

fn release(slot: &mut Option<NodeId>, id: NodeId) -> bool {
    if *slot == Some(id) {
        *slot = None;
        true
    } else {
        false
    }
}

/// Resolves states and event records for every node in `order`, which must
/// be the tree's pre-order.
pub(crate) fn resolve(
    arena: &mut NodeArena,
    order: &[NodeId],
    captures: &mut Captures,
    input: &InputSnapshot,
) {
    captures.retain_live(arena);

    if input.cursor_locked {
        captures.release_pointer();
        for &id in order {
            if let Some(node) = arena.get_mut(id) {
                node.last_state = node.resolved_state;
                node.state = VisualState::Normal;
                node.resolved_state = VisualState::Normal;
                node.event_record = EventRecord::default();
                node.child_has_event = false;
            }
        }
        return;
    }

    for &id in order {
        if let Some(node) = arena.get_mut(id) {
            node.child_has_event = false;
        }
    }

    if input.left_down && !input.left_just_down && input.mouse_delta.is_nonzero() {
        if let Some(pressed) = captures.press {
            captures.capture_drag(pressed);
        }
    }

    let mouse = input.mouse_position;
    let mut hit_taken = false;

    for &id in order.iter().rev() {
        let Some(node) = arena.get_mut(id) else { continue };
        let p = &node.params;
        let inside = node.clip.contains(mouse) && node.layout_box.rect().contains(mouse);
        let opaque = p.pointer_events && !p.hit_test_transparent;
        let covered = hit_taken;
        if inside && opaque {
            hit_taken = true;
        }

        if p.disabled {
            captures.release_press(id);
            captures.release_drag(id);
            captures.release_focus(id);
            node.state = VisualState::Disabled;
            node.event_record = EventRecord::default();
            if node.child_has_event {
                let parent = node.parent();
                mark_child_event(arena, parent);
            }
            continue;
        }

        let hovered = inside && opaque && !covered;
        let mut record = EventRecord {
            is_hovered: hovered,
            ..EventRecord::default()
        };

        if hovered && input.left_just_down && captures.capture_press(id) {
            captures.capture_focus(id);
            record.is_double_clicked = input.double_clicked;
        }

        let holds_press = captures.press == Some(id);
        record.is_clicked = input.left_just_up && holds_press && hovered;
        record.is_pressed = holds_press && !input.left_just_up;
        record.is_dragging = captures.drag == Some(id) && !input.left_just_up;
        record.is_focused = captures.focus == Some(id);
        if hovered {
            record.scroll_delta = input.scroll_delta;
        }

        node.state = if node.child_has_event {
            VisualState::Normal
        } else if record.is_pressed {
            VisualState::Pressed
        } else if hovered {
            VisualState::Hover
        } else if record.is_focused {
            VisualState::Focused
        } else {
            VisualState::Normal
        };
        let consumed =
            node.child_has_event || record.is_hovered || record.is_pressed || record.is_dragging;
        node.event_record = record;
        if consumed {
            let parent = node.parent();
            mark_child_event(arena, parent);
        }
    }

    if input.left_just_up {
        captures.release_pointer();
    }

    propagate(arena, order);
}

fn mark_child_event(arena: &mut NodeArena, parent: Option<NodeId>) {
    if let Some(node) = parent.and_then(|parent| arena.get_mut(parent)) {
        node.child_has_event = true;
    }
}

/// Pre-order pass: a child in the `Normal` state takes the resolved state
/// of a parent that propagates to its children.
fn propagate(arena: &mut NodeArena, order: &[NodeId]) {
    for &id in order {
        let inherited = arena
            .get(id)
            .and_then(|node| node.parent())
            .and_then(|parent| arena.get(parent))
            .filter(|parent| parent.params.propagate_state_to_children)
            .map(|parent| parent.resolved_state)
            .filter(|state| *state != VisualState::Normal);

        if let Some(node) = arena.get_mut(id) {
            node.last_state = node.resolved_state;
            node.resolved_state = match inherited {
                Some(state) if node.state == VisualState::Normal => state,
                _ => node.state,
            };
        }
    }
}
