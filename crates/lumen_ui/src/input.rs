//! Input handling for the UI.
//!
//! The context reads one [`InputSnapshot`] per committed frame from an
//! [`InputSource`]. [`InputState`] is an accumulator a platform layer can
//! feed raw mouse events into; wrapped in a `parking_lot::Mutex` it is an
//! input source itself.

use lumen_shared::Vec2;
use parking_lot::Mutex;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Frame-consistent view of the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Cursor position in window pixels.
    pub mouse_position: Vec2,
    /// Cursor movement since the previous frame.
    pub mouse_delta: Vec2,
    /// Left button is held.
    pub left_down: bool,
    /// Left button went down this frame.
    pub left_just_down: bool,
    /// Left button went up this frame.
    pub left_just_up: bool,
    /// Wheel movement this frame.
    pub scroll_delta: Vec2,
    /// The window captured the cursor; UI events are suppressed.
    pub cursor_locked: bool,
    /// The press this frame completes a double click.
    pub double_clicked: bool,
}

/// Supplier of per-frame input.
pub trait InputSource: Send + Sync {
    /// Returns the input for the frame being committed.
    fn snapshot(&self) -> InputSnapshot;
}

impl InputSource for InputSnapshot {
    fn snapshot(&self) -> InputSnapshot {
        *self
    }
}

impl InputSource for Mutex<InputState> {
    fn snapshot(&self) -> InputSnapshot {
        self.lock().snapshot()
    }
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mouse: Vec2,
    prev_mouse: Vec2,
    /// Mouse buttons pressed this frame.
    buttons_pressed: u8,
    /// Mouse buttons released this frame.
    buttons_released: u8,
    /// Mouse buttons currently held.
    buttons_down: u8,
    scroll_delta: Vec2,
    cursor_locked: bool,
    /// Time and position of the last left press that did not complete a
    /// double click.
    last_click: Option<(f64, Vec2)>,
    /// Double-click detected this frame.
    double_clicked: bool,
}

impl InputState {
    /// Double-click time threshold (seconds).
    const DOUBLE_CLICK_TIME: f64 = 0.3;
    /// Double-click position threshold (pixels).
    const DOUBLE_CLICK_DISTANCE: f32 = 5.0;

    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new frame, clearing per-frame state.
    pub fn begin_frame(&mut self) {
        self.prev_mouse = self.mouse;
        self.buttons_pressed = 0;
        self.buttons_released = 0;
        self.scroll_delta = Vec2::ZERO;
        self.double_clicked = false;
    }

    /// Updates mouse position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse = Vec2::new(x, y);
    }

    /// Records a mouse button press at `time_secs`.
    pub fn mouse_button_down(&mut self, button: MouseButton, time_secs: f64) {
        let mask = Self::button_mask(button);
        self.buttons_pressed |= mask;
        self.buttons_down |= mask;

        if button != MouseButton::Left {
            return;
        }
        let repeat = self.last_click.is_some_and(|(time, pos)| {
            let d = self.mouse - pos;
            time_secs - time <= Self::DOUBLE_CLICK_TIME
                && (d.x * d.x + d.y * d.y).sqrt() <= Self::DOUBLE_CLICK_DISTANCE
        });
        if repeat {
            self.double_clicked = true;
            self.last_click = None;
        } else {
            self.last_click = Some((time_secs, self.mouse));
        }
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_released |= mask;
        self.buttons_down &= !mask;
    }

    /// Records scroll input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.scroll_delta += Vec2::new(dx, dy);
    }

    /// Records whether the window holds the cursor.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    /// Returns true if the mouse button was clicked this frame.
    #[must_use]
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        (self.buttons_pressed & Self::button_mask(button)) != 0
    }

    /// Returns true if the mouse button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        (self.buttons_released & Self::button_mask(button)) != 0
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Returns true if a double-click occurred this frame.
    #[must_use]
    pub fn double_clicked(&self) -> bool {
        self.double_clicked
    }

    /// Returns the mouse movement delta.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse - self.prev_mouse
    }

    /// Freezes the current frame's state.
    #[must_use]
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            mouse_position: self.mouse,
            mouse_delta: self.mouse_delta(),
            left_down: self.mouse_down(MouseButton::Left),
            left_just_down: self.mouse_clicked(MouseButton::Left),
            left_just_up: self.mouse_released(MouseButton::Left),
            scroll_delta: self.scroll_delta,
            cursor_locked: self.cursor_locked,
            double_clicked: self.double_clicked,
        }
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}
