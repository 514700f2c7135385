//! Node storage.
//!
//! Nodes live in a generational slot arena. A [`NodeId`] is the node's
//! stable address: reuse keeps it, destruction invalidates it, and a slot
//! recycled for a new node hands out a new generation so stale ids never
//! alias the newcomer.

use crate::key::Key;
use crate::node::{Node, NodeKind};

/// Generational handle to a node.
///
/// Lower 32 bits: slot index. Upper 32 bits: generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Null/invalid node id.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates an id from slot index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Slot index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Slot generation.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this id is null.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Slot arena owning every node of one context.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    /// Creates an arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Stores a node and returns its id.
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX - 1);
        self.slots.push(Slot { generation: 0, node: Some(node) });
        NodeId::new(index, 0)
    }

    /// Looks up a live node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    /// Looks up a live node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Returns true if `id` names a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Destroys `id` and all its descendants. Does not touch the parent's
    /// child list. Returns the number of nodes destroyed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index() as usize) else { continue };
            if slot.generation != current.generation() {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend_from_slice(node.children());
                self.free.push(current.index());
                self.live -= 1;
                removed += 1;
            }
        }
        removed
    }

    /// Appends a new child to `parent` and links it back. The child's
    /// ordinal is the parent's current child count. `None` if `parent` is
    /// not live.
    pub fn add_child(&mut self, parent: NodeId, key: Key, kind: NodeKind) -> Option<NodeId> {
        let position = self.get(parent)?.children().len();
        let id = self.insert(Node::new(key, kind, Some(parent), position));
        if let Some(node) = self.get_mut(parent) {
            node.children_mut().push(id);
        }
        Some(id)
    }

    /// The child of `parent` at `position`, if its key is `key`.
    #[must_use]
    pub fn child_at(&self, parent: NodeId, position: usize, key: Key) -> Option<NodeId> {
        let id = *self.get(parent)?.children().get(position)?;
        (self.get(id)?.key() == key).then_some(id)
    }

    /// Destroys the children of `parent` at ordinals `position..` and their
    /// subtrees. Returns the number of nodes destroyed.
    pub fn remove_children_from(&mut self, parent: NodeId, position: usize) -> usize {
        let tail = match self.get_mut(parent) {
            Some(node) if position < node.children().len() => {
                node.children_mut().split_off(position)
            }
            _ => return 0,
        };
        tail.into_iter().map(|id| self.remove_subtree(id)).sum()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        for (index, slot) in (0_u32..).zip(self.slots.iter_mut()) {
            if slot.node.take().is_some() {
                self.free.push(index);
            }
        }
        self.live = 0;
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no node is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Ids of `root` and its descendants in pre-order (children left to
    /// right).
    pub fn iter_dfs(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        NodeDfsIterator {
            arena: self,
            stack: if self.contains(root) { vec![root] } else { Vec::new() },
        }
    }

    /// Pre-order ids collected into a vector, so callers can mutate nodes
    /// while walking.
    #[must_use]
    pub fn collect_dfs(&self, root: NodeId) -> Vec<NodeId> {
        self.iter_dfs(root).collect()
    }
}

/// Depth-first iterator over a subtree.
struct NodeDfsIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl Iterator for NodeDfsIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        if let Some(node) = self.arena.get(id) {
            self.stack.extend(node.children().iter().rev().copied());
        }

        Some(id)
    }
}
