//! # Context
//!
//! Owns one window's node tree and reconciles the caller's frame calls
//! against it.
//!
//! ## Build cursor
//!
//! ```text
//!   begin_frame("root")          open: [root:0]
//!     add_frame("a")             open: [root:1]          a reused at 0
//!     begin_frame("b")           open: [root:2, b:0]     b reused at 1
//!       add_text("t", "Hi")      open: [root:2, b:1]
//!     end_frame()                open: [root:2]          b's tail ≥ 1 dropped
//!   end_frame()                  open: []                root's tail ≥ 2 dropped,
//!                                                        frame committed
//! ```
//!
//! Every open frame records the next ordinal it expects. A call whose key
//! matches the child at that ordinal reuses it; a mismatch drops the child
//! and every later sibling and builds a new one in its place.

mod commit;

use std::collections::HashSet;
use std::sync::Arc;

use lumen_shared::{Rect, Vec2};
use parking_lot::Mutex;

use crate::config::UiConfig;
use crate::error::{diagnose, UiError, UiResult};
use crate::event::{Captures, EventRecord};
use crate::input::{InputSnapshot, InputSource};
use crate::key::Key;
use crate::node::{Node, NodeKind, TextContent};
use crate::render::DrawList;
use crate::style::Style;
use crate::text::TextMetrics;
use crate::tree::{NodeArena, NodeId};
use crate::window::{ResizeHandle, WindowHost, WindowId, WindowMetrics};

/// Counters of the last committed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Nodes alive after the commit.
    pub live_nodes: usize,
    /// Nodes built since the previous commit.
    pub created: usize,
    /// Nodes destroyed since the previous commit.
    pub destroyed: usize,
    /// Draw commands recorded.
    pub draw_commands: usize,
    /// Number of commits so far, this one included.
    pub frame_index: u64,
}

/// A frame whose `end_frame` is pending.
#[derive(Debug)]
struct OpenFrame {
    node: NodeId,
    next_ordinal: usize,
    /// Keys placed under this frame so far; tracked in debug builds only.
    seen: HashSet<Key>,
}

impl OpenFrame {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            next_ordinal: 0,
            seen: HashSet::new(),
        }
    }
}

struct WindowBinding {
    host: Arc<dyn WindowHost>,
    id: WindowId,
    handle: ResizeHandle,
}

/// A retained UI tree for one window.
pub struct Context {
    config: UiConfig,
    arena: NodeArena,
    root: Option<NodeId>,
    open: Vec<OpenFrame>,
    captures: Captures,

    input: Arc<dyn InputSource>,
    text_metrics: Box<dyn TextMetrics>,
    window: Option<WindowBinding>,
    metrics: WindowMetrics,
    pending_resize: Arc<Mutex<Option<WindowMetrics>>>,
    frame_delta_ms: f32,

    draw_list: DrawList,
    stats: FrameStats,
    created: usize,
    destroyed: usize,

    /// Receives calls made with no open frame.
    scratch: Node,
}

impl Context {
    /// Creates a context with no window. Layout uses the baseline size at
    /// scale `1.0` until [`Context::set_context_window`] binds one.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        let metrics = WindowMetrics {
            size: config.baseline(),
            content_scale: 1.0,
        };
        Self {
            arena: NodeArena::with_capacity(config.node_capacity),
            draw_list: DrawList::with_capacity(config.draw_capacity),
            text_metrics: Box::new(config.text_metrics()),
            config,
            root: None,
            open: Vec::new(),
            captures: Captures::default(),
            input: Arc::new(InputSnapshot::default()),
            window: None,
            metrics,
            pending_resize: Arc::new(Mutex::new(None)),
            frame_delta_ms: 0.0,
            stats: FrameStats::default(),
            created: 0,
            destroyed: 0,
            scratch: Node::new(Key::new(0), NodeKind::Frame, None, 0),
        }
    }

    /// Creates a context bound to a window.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidWindow`] if `id` names no window of `host`.
    pub fn with_window(
        config: UiConfig,
        host: Arc<dyn WindowHost>,
        id: WindowId,
    ) -> UiResult<Self> {
        let mut context = Self::new(config);
        context.set_context_window(host, id)?;
        Ok(context)
    }

    /// Binds the context to a window: caches its metrics and subscribes to
    /// its resizes. A previous binding is dropped.
    ///
    /// Resizes are picked up when the next root frame opens; transitions in
    /// flight keep running.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidWindow`] if `id` names no window of `host`. The
    /// previous binding is kept.
    pub fn set_context_window(&mut self, host: Arc<dyn WindowHost>, id: WindowId) -> UiResult<()> {
        let metrics = host.metrics(id).ok_or(UiError::InvalidWindow(id))?;
        let pending = Arc::clone(&self.pending_resize);
        let handle = host
            .register_on_resize(
                id,
                Box::new(move |metrics| {
                    *pending.lock() = Some(metrics);
                }),
            )
            .ok_or(UiError::InvalidWindow(id))?;

        self.unbind_window();
        self.metrics = metrics;
        self.window = Some(WindowBinding { host, id, handle });
        tracing::debug!(window = id.0, scale = metrics.content_scale, "context bound to window");
        Ok(())
    }

    fn unbind_window(&mut self) {
        if let Some(binding) = self.window.take() {
            binding.host.unregister(binding.handle);
        }
    }

    /// Window the context is bound to.
    #[must_use]
    pub fn window(&self) -> Option<WindowId> {
        self.window.as_ref().map(|binding| binding.id)
    }

    /// Window size and content scale used by layout.
    #[must_use]
    pub fn window_metrics(&self) -> WindowMetrics {
        self.metrics
    }

    /// Replaces the input source read at every commit.
    pub fn set_input_source(&mut self, input: Arc<dyn InputSource>) {
        self.input = input;
    }

    /// Replaces the text metrics provider.
    pub fn set_text_metrics(&mut self, metrics: Box<dyn TextMetrics>) {
        self.text_metrics = metrics;
    }

    /// Sets the time step used by every following commit. NaN and negative
    /// values become zero; values above the configured maximum are capped.
    pub fn set_frame_delta_ms(&mut self, delta_ms: f32) {
        self.frame_delta_ms = if delta_ms.is_nan() || delta_ms < 0.0 {
            diagnose(&UiError::Clamped { what: "frame delta" });
            0.0
        } else {
            delta_ms.min(self.config.max_frame_delta_ms)
        };
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Opens a frame node. With no frame open this is the root: a root
    /// with a different key replaces the whole tree.
    ///
    /// Reopening the root's key while frames are still open starts a new
    /// frame: the unclosed ones are closed and committed first.
    pub fn begin_frame(&mut self, key: impl Into<Key>, styles: &[&Style]) -> &mut Node {
        let key = key.into();
        if !self.open.is_empty() && self.is_root_key(key) {
            self.close_unfinished();
        }
        let id = if self.open.is_empty() {
            self.open_root(key)
        } else {
            match self.place_child(key, None) {
                Some(id) => id,
                None => return self.orphan(key, None),
            }
        };
        self.open.push(OpenFrame::new(id));
        self.styled(id, styles)
    }

    /// Adds a frame node that takes no children and needs no `end_frame`.
    pub fn add_frame(&mut self, key: impl Into<Key>, styles: &[&Style]) -> &mut Node {
        let key = key.into();
        match self.place_child(key, None) {
            Some(id) => {
                // A node opened with `begin_frame` last frame keeps no children.
                self.destroyed += self.arena.remove_children_from(id, 0);
                self.styled(id, styles)
            }
            None => self.orphan(key, None),
        }
    }

    /// Adds a text node.
    pub fn add_text(&mut self, key: impl Into<Key>, text: &str, styles: &[&Style]) -> &mut Node {
        let key = key.into();
        match self.place_child(key, Some(text)) {
            Some(id) => self.styled(id, styles),
            None => self.orphan(key, Some(text)),
        }
    }

    /// Closes the innermost open frame and drops its children that were not
    /// referenced since it opened. Closing the root commits the frame:
    /// transitions tick, layout runs, events resolve and the draw list is
    /// rebuilt.
    ///
    /// Returns the closed node's event record: the fresh one for the root,
    /// the previous commit's for inner frames.
    pub fn end_frame(&mut self) -> EventRecord {
        let Some(frame) = self.open.pop() else {
            diagnose(&UiError::UnpairedEndFrame);
            return EventRecord::default();
        };
        self.destroyed += self.arena.remove_children_from(frame.node, frame.next_ordinal);
        if self.open.is_empty() {
            self.commit(frame.node);
        }
        self.arena
            .get(frame.node)
            .map(Node::event_record)
            .unwrap_or_default()
    }

    /// Drops the tree and the window subscription.
    pub fn destroy(self) {
        tracing::debug!(nodes = self.arena.len(), "context destroyed");
    }

    fn is_root_key(&self, key: Key) -> bool {
        self.root
            .and_then(|root| self.arena.get(root))
            .is_some_and(|node| node.key() == key)
    }

    /// Closes every open frame as `end_frame` would and commits the root.
    fn close_unfinished(&mut self) {
        diagnose(&UiError::UnclosedFrame { open: self.open.len() });
        let mut root = None;
        while let Some(frame) = self.open.pop() {
            self.destroyed += self.arena.remove_children_from(frame.node, frame.next_ordinal);
            root = Some(frame.node);
        }
        if let Some(root) = root {
            self.commit(root);
        }
    }

    fn open_root(&mut self, key: Key) -> NodeId {
        self.apply_pending_resize();
        match self.root {
            Some(root) if self.arena.get(root).is_some_and(|node| node.key() == key) => root,
            previous => {
                if let Some(old) = previous {
                    self.destroyed += self.arena.remove_subtree(old);
                }
                self.created += 1;
                let root = self.arena.insert(Node::new(key, NodeKind::Frame, None, 0));
                self.root = Some(root);
                root
            }
        }
    }

    /// Reconciles one child call under the innermost open frame. `text` is
    /// `Some` for text nodes. `None` when no frame is open.
    fn place_child(&mut self, key: Key, text: Option<&str>) -> Option<NodeId> {
        let top = self.open.last_mut()?;
        let parent = top.node;
        let ordinal = top.next_ordinal;
        top.next_ordinal += 1;

        if cfg!(debug_assertions) {
            if !top.seen.insert(key) {
                diagnose(&UiError::DuplicateKey { key, position: ordinal });
            }
        }

        if let Some(id) = self.arena.child_at(parent, ordinal, key) {
            if let Some(node) = self.arena.get_mut(id) {
                if node.text().is_some() == text.is_some() {
                    if let Some(text) = text {
                        node.set_text(text);
                    }
                    return Some(id);
                }
            }
        }

        self.destroyed += self.arena.remove_children_from(parent, ordinal);
        let id = self.arena.add_child(parent, key, node_kind(text))?;
        self.created += 1;
        Some(id)
    }

    fn styled(&mut self, id: NodeId, styles: &[&Style]) -> &mut Node {
        match self.arena.get_mut(id) {
            Some(node) => {
                node.apply_styles(styles);
                node
            }
            None => &mut self.scratch,
        }
    }

    fn orphan(&mut self, key: Key, text: Option<&str>) -> &mut Node {
        diagnose(&UiError::NoOpenFrame(key));
        self.scratch = Node::new(key, node_kind(text), None, 0);
        &mut self.scratch
    }

    fn apply_pending_resize(&mut self) {
        if let Some(metrics) = self.pending_resize.lock().take() {
            tracing::debug!(
                width = metrics.size.x,
                height = metrics.size.y,
                scale = metrics.content_scale,
                "applying window resize"
            );
            self.metrics = metrics;
        }
    }

    /// Gives press capture to `id`. Fails while another node holds it.
    pub fn capture_press(&mut self, id: NodeId) -> bool {
        self.captures.capture_press(id)
    }

    /// Gives drag capture to `id`. Fails while another node holds it.
    pub fn capture_drag(&mut self, id: NodeId) -> bool {
        self.captures.capture_drag(id)
    }

    /// Moves focus to `id`.
    pub fn capture_focus(&mut self, id: NodeId) {
        self.captures.capture_focus(id);
    }

    /// Releases press capture if `id` holds it.
    pub fn release_press(&mut self, id: NodeId) -> bool {
        self.captures.release_press(id)
    }

    /// Releases drag capture if `id` holds it.
    pub fn release_drag(&mut self, id: NodeId) -> bool {
        self.captures.release_drag(id)
    }

    /// Releases focus if `id` holds it.
    pub fn release_focus(&mut self, id: NodeId) -> bool {
        self.captures.release_focus(id)
    }

    /// Current capture registers.
    #[must_use]
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Root node id.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Looks a node up by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Looks a node up by id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id)
    }

    /// Follows a path of keys from the root: the first key names the root,
    /// each following key a child of the previous node.
    #[must_use]
    pub fn find(&self, path: &[Key]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let root = self.root?;
        if self.arena.get(root)?.key() != *first {
            return None;
        }
        rest.iter().try_fold(root, |current, key| {
            self.arena
                .get(current)?
                .children()
                .iter()
                .copied()
                .find(|child| self.arena.get(*child).is_some_and(|node| node.key() == *key))
        })
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Statistics of the last commit.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Draw commands of the last commit.
    #[must_use]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// The window rect in pixels.
    fn window_rect(&self) -> Rect {
        Rect::from_pos_size(Vec2::ZERO, self.metrics.size)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.unbind_window();
    }
}

fn node_kind(text: Option<&str>) -> NodeKind {
    match text {
        Some(text) => NodeKind::Text(TextContent { text: text.to_owned() }),
        None => NodeKind::Frame,
    }
}
