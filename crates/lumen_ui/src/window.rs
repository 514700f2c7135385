//! Window collaborator.
//!
//! A context binds to one window through a [`WindowHost`]: it reads the
//! window's size and content scale and subscribes to resize notifications.
//! [`HeadlessWindows`] is an in-memory host for tools and tests.

use std::collections::HashMap;

use lumen_shared::Vec2;
use parking_lot::Mutex;

use crate::error::{UiError, UiResult};

/// Identifies a window owned by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// Size and content scale of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMetrics {
    /// Drawable size in pixels.
    pub size: Vec2,
    /// Pixel multiplier; `1.0` at the baseline resolution.
    pub content_scale: f32,
}

impl WindowMetrics {
    /// Metrics for a window of `size` against a `baseline` resolution: the
    /// scale is the smaller of the two axis ratios.
    #[must_use]
    pub fn for_size(size: Vec2, baseline: Vec2) -> Self {
        let sx = if baseline.x > 0.0 { size.x / baseline.x } else { 1.0 };
        let sy = if baseline.y > 0.0 { size.y / baseline.y } else { 1.0 };
        let scale = sx.min(sy);
        Self {
            size,
            content_scale: if scale.is_finite() && scale > 0.0 { scale } else { 1.0 },
        }
    }
}

/// Handle returned by [`WindowHost::register_on_resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeHandle(pub u64);

/// Resize listener.
pub type ResizeCallback = Box<dyn Fn(WindowMetrics) + Send + Sync>;

/// Windowing system as seen by a context.
pub trait WindowHost: Send + Sync {
    /// Current metrics, or `None` when `id` names no window.
    fn metrics(&self, id: WindowId) -> Option<WindowMetrics>;

    /// Subscribes `callback` to resizes of `id`. `None` when `id` names no
    /// window.
    fn register_on_resize(&self, id: WindowId, callback: ResizeCallback) -> Option<ResizeHandle>;

    /// Drops a subscription. Unknown handles are ignored.
    fn unregister(&self, handle: ResizeHandle);
}

struct Listener {
    window: WindowId,
    callback: ResizeCallback,
}

#[derive(Default)]
struct HeadlessInner {
    windows: HashMap<WindowId, WindowMetrics>,
    listeners: HashMap<ResizeHandle, Listener>,
    next_window: u32,
    next_handle: u64,
}

/// In-memory window host.
pub struct HeadlessWindows {
    baseline: Vec2,
    inner: Mutex<HeadlessInner>,
}

impl HeadlessWindows {
    /// Creates a host whose scale is `1.0` at `baseline`.
    #[must_use]
    pub fn new(baseline: Vec2) -> Self {
        Self {
            baseline,
            inner: Mutex::new(HeadlessInner::default()),
        }
    }

    /// Opens a window of `width` × `height` pixels.
    pub fn create_window(&self, width: f32, height: f32) -> WindowId {
        let metrics = WindowMetrics::for_size(Vec2::new(width, height), self.baseline);
        let mut inner = self.inner.lock();
        let id = WindowId(inner.next_window);
        inner.next_window += 1;
        inner.windows.insert(id, metrics);
        id
    }

    /// Resizes a window and notifies its listeners.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidWindow`] if `id` names no window.
    pub fn resize(&self, id: WindowId, width: f32, height: f32) -> UiResult<()> {
        let metrics = WindowMetrics::for_size(Vec2::new(width, height), self.baseline);
        let inner = &mut *self.inner.lock();
        let slot = inner.windows.get_mut(&id).ok_or(UiError::InvalidWindow(id))?;
        *slot = metrics;
        tracing::debug!(window = id.0, width, height, "window resized");
        for listener in inner.listeners.values().filter(|l| l.window == id) {
            (listener.callback)(metrics);
        }
        Ok(())
    }

    /// Number of live resize subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

impl Default for HeadlessWindows {
    fn default() -> Self {
        Self::new(Vec2::new(1920.0, 1080.0))
    }
}

impl WindowHost for HeadlessWindows {
    fn metrics(&self, id: WindowId) -> Option<WindowMetrics> {
        self.inner.lock().windows.get(&id).copied()
    }

    fn register_on_resize(&self, id: WindowId, callback: ResizeCallback) -> Option<ResizeHandle> {
        let mut inner = self.inner.lock();
        if !inner.windows.contains_key(&id) {
            return None;
        }
        let handle = ResizeHandle(inner.next_handle);
        inner.next_handle += 1;
        inner.listeners.insert(handle, Listener { window: id, callback });
        Some(handle)
    }

    fn unregister(&self, handle: ResizeHandle) {
        self.inner.lock().listeners.remove(&handle);
    }
}
