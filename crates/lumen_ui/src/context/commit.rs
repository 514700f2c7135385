//! Root-close pipeline.
//!
//! ```text
//!  tick transitions ─► read params ─► layout ─► events
//!                                        ▲          │
//!                                        └─ retarget on state change
//!                                                   │
//!                                                 paint ─► stats
//! ```

use lumen_shared::{Rect, Vec2};

use super::{Context, FrameStats};
use crate::event;
use crate::layout::{clip_rect, PositionType};
use crate::node::Node;
use crate::text::TextMetrics;
use crate::tree::{NodeArena, NodeId};
use crate::values::value_registry;

impl Context {
    /// Runs the frame pipeline over the tree under `root`.
    pub(super) fn commit(&mut self, root: NodeId) {
        let order = self.arena.collect_dfs(root);
        let window = self.window_rect();
        let scale = self.metrics.content_scale;
        let values = value_registry().read();

        for &id in &order {
            if let Some(node) = self.arena.get_mut(id) {
                node.update_transition(&values, self.frame_delta_ms);
                node.refresh_params(&values);
            }
        }
        layout_tree(&mut self.arena, &order, window, scale, &*self.text_metrics);

        let input = self.input.snapshot();
        event::resolve(&mut self.arena, &order, &mut self.captures, &input);

        // A state change retargets transitions; a zero-duration one lands
        // this frame and can move geometry.
        let mut moved = false;
        for &id in &order {
            if let Some(node) = self.arena.get_mut(id) {
                if node.update_transition(&values, 0.0) {
                    node.refresh_params(&values);
                    moved = true;
                }
            }
        }
        drop(values);
        if moved {
            layout_tree(&mut self.arena, &order, window, scale, &*self.text_metrics);
        }

        self.draw_list.clear();
        for &id in &order {
            if let Some(node) = self.arena.get_mut(id) {
                node.paint(&mut self.draw_list, scale);
                node.active = node.committed;
                node.committed = true;
            }
        }

        self.stats = FrameStats {
            live_nodes: self.arena.len(),
            created: std::mem::take(&mut self.created),
            destroyed: std::mem::take(&mut self.destroyed),
            draw_commands: self.draw_list.len(),
            frame_index: self.stats.frame_index + 1,
        };
        if self.stats.created > 0 || self.stats.destroyed > 0 {
            tracing::debug!(
                frame = self.stats.frame_index,
                created = self.stats.created,
                destroyed = self.stats.destroyed,
                live = self.stats.live_nodes,
                "tree reconciled"
            );
        }
    }
}

/// Sizes and places every node in `order` (pre-order from the root).
///
/// The root sits inside the window by its margin and fills the rest on
/// every axis it leaves unsized. Each node then arranges its children: flow
/// children along its content box, absolute children against the nearest
/// relative ancestor or the root.
fn layout_tree(
    arena: &mut NodeArena,
    order: &[NodeId],
    window: Rect,
    scale: f32,
    metrics: &dyn TextMetrics,
) {
    let Some(&root) = order.first() else { return };

    if let Some(node) = arena.get_mut(root) {
        let margin = node.params.margin.scaled(scale);
        let measured = node.compute_size(window.size(), scale, metrics);
        let fill = Vec2::new(
            (window.width - margin.left - margin.right).max(0.0),
            (window.height - margin.top - margin.bottom).max(0.0),
        );
        let size = Vec2::new(
            if node.params.width_set { measured.x } else { fill.x },
            if node.params.height_set { measured.y } else { fill.y },
        );
        node.layout_box.position = window.origin() + Vec2::new(margin.left, margin.top);
        node.layout_box.size = size;
        node.layout_box.padding = node.params.padding.scaled(scale);
        node.layout_box.margin = margin;
        node.clip = window;
    }

    for &id in order {
        layout_children(arena, id, root, scale, metrics);
    }
}

fn layout_children(
    arena: &mut NodeArena,
    parent: NodeId,
    root: NodeId,
    scale: f32,
    metrics: &dyn TextMetrics,
) {
    let Some(node) = arena.get(parent) else { return };
    if node.children().is_empty() {
        return;
    }
    let children = node.children().to_vec();
    let parent_size = node.layout_box.size;
    let parent_clip = node.clip;
    let content = node.layout_box.content_rect(node.params.border_inset(scale));
    let flow = node.params.flow;

    let mut flowing = Vec::with_capacity(children.len());
    let mut outer = Vec::with_capacity(children.len());
    let mut absolute = Vec::new();

    for &child in &children {
        let Some(node) = arena.get_mut(child) else { continue };
        node.layout_box.size = node.compute_size(parent_size, scale, metrics);
        node.layout_box.padding = node.params.padding.scaled(scale);
        node.layout_box.margin = node.params.margin.scaled(scale);
        if node.params.position_type == PositionType::Absolute {
            absolute.push(child);
        } else {
            flowing.push(child);
            outer.push(node.layout_box.outer_size());
        }
    }

    for (&child, origin) in flowing.iter().zip(flow.arrange(content, &outer)) {
        let Some(node) = arena.get_mut(child) else { continue };
        let margin = node.layout_box.margin;
        let mut position = origin + Vec2::new(margin.left, margin.top);
        if node.params.position_type == PositionType::Relative {
            position += node.params.resolve_offsets(parent_size, scale).shift();
        }
        place(node, position, parent_clip);
    }

    if absolute.is_empty() {
        return;
    }
    let anchor = relative_anchor(arena, parent, root);
    for child in absolute {
        let Some(node) = arena.get_mut(child) else { continue };
        let position = node
            .params
            .resolve_offsets(anchor.size(), scale)
            .place(anchor, node.layout_box.size);
        place(node, position, parent_clip);
    }
}

fn place(node: &mut Node, position: Vec2, parent_clip: Rect) {
    node.layout_box.position = position;
    node.clip = clip_rect(
        parent_clip,
        node.layout_box.rect(),
        node.params.overflow_hidden_x,
        node.params.overflow_hidden_y,
    );
}

/// Border box of the nearest relatively positioned node at or above
/// `from`, or of the root.
fn relative_anchor(arena: &NodeArena, from: NodeId, root: NodeId) -> Rect {
    let mut current = Some(from);
    while let Some(id) = current {
        let Some(node) = arena.get(id) else { break };
        if id == root || node.params.position_type == PositionType::Relative {
            return node.layout_box.rect();
        }
        current = node.parent();
    }
    arena.get(root).map_or(Rect::ZERO, |node| node.layout_box.rect())
}
