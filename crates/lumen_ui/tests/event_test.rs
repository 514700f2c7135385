//! # Event Integration Test
//!
//! Hit-testing, press capture, cursor lock, state propagation and window
//! resize delivery through full frame commits.

use std::sync::Arc;

use lumen_shared::Vec2;
use lumen_ui::{
    props, Context, EventRecord, HeadlessWindows, InputSource, InputState, Key, MouseButton,
    NodeId, PositionType, Style, UiConfig, VisualState,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct Harness {
    ui: Context,
    input: Arc<Mutex<InputState>>,
    clock: f64,
}

impl Harness {
    fn new() -> Self {
        let input = Arc::new(Mutex::new(InputState::new()));
        let mut ui = Context::new(UiConfig::default());
        let source: Arc<dyn InputSource> = input.clone();
        ui.set_input_source(source);
        Self { ui, input, clock: 0.0 }
    }

    /// Starts a new input frame and applies `edit` to it.
    fn input(&mut self, edit: impl FnOnce(&mut InputState, f64)) {
        self.clock += 0.5;
        let mut input = self.input.lock();
        input.begin_frame();
        edit(&mut *input, self.clock);
    }

    fn id(&self, path: &[&str]) -> NodeId {
        let keys: Vec<Key> = path.iter().map(|k| Key::named(k)).collect();
        self.ui.find(&keys).unwrap()
    }

    fn record(&self, path: &[&str]) -> EventRecord {
        self.ui.node(self.id(path)).unwrap().event_record()
    }

    fn state(&self, path: &[&str]) -> VisualState {
        self.ui.node(self.id(path)).unwrap().resolved_state()
    }
}

fn button_style() -> Style {
    let mut style = Style::new("button");
    style.size(200.0, 100.0);
    style
}

/// Root with one 200 × 100 button at the origin.
fn button_frame(ui: &mut Context, style: &Style) {
    ui.begin_frame("root", &[]);
    ui.add_frame("button", &[style]);
    ui.end_frame();
}

/// Press, hold, release over the button, then hover.
#[test]
fn test_press_hold_release_click() {
    let style = button_style();
    let mut h = Harness::new();

    h.input(|i, t| {
        i.set_mouse_pos(50.0, 50.0);
        i.mouse_button_down(MouseButton::Left, t);
    });
    button_frame(&mut h.ui, &style);
    assert_eq!(h.state(&["root", "button"]), VisualState::Pressed);
    assert_eq!(h.ui.captures().press(), Some(h.id(&["root", "button"])));

    h.input(|_, _| {});
    button_frame(&mut h.ui, &style);
    assert_eq!(h.state(&["root", "button"]), VisualState::Pressed);
    assert!(!h.record(&["root", "button"]).is_clicked);

    h.input(|i, _| i.mouse_button_up(MouseButton::Left));
    button_frame(&mut h.ui, &style);
    let record = h.record(&["root", "button"]);
    assert!(record.is_clicked);
    assert!(!record.is_pressed);
    assert_eq!(h.ui.captures().press(), None);

    h.input(|_, _| {});
    button_frame(&mut h.ui, &style);
    assert_eq!(h.state(&["root", "button"]), VisualState::Hover);
    assert!(!h.record(&["root", "button"]).is_clicked);
}

#[test]
fn test_release_outside_is_not_a_click() {
    let style = button_style();
    let mut h = Harness::new();

    h.input(|i, t| {
        i.set_mouse_pos(50.0, 50.0);
        i.mouse_button_down(MouseButton::Left, t);
    });
    button_frame(&mut h.ui, &style);

    h.input(|i, _| i.set_mouse_pos(900.0, 900.0));
    button_frame(&mut h.ui, &style);
    // Capture keeps the press while the cursor is elsewhere.
    assert_eq!(h.state(&["root", "button"]), VisualState::Pressed);
    assert!(h.record(&["root", "button"]).is_dragging);

    h.input(|i, _| i.mouse_button_up(MouseButton::Left));
    button_frame(&mut h.ui, &style);
    assert!(!h.record(&["root", "button"]).is_clicked);

    h.input(|_, _| {});
    button_frame(&mut h.ui, &style);
    assert_eq!(h.state(&["root", "button"]), VisualState::Normal);
}

#[test]
fn test_double_click_flag() {
    let style = button_style();
    let mut h = Harness::new();
    h.input(|i, _| i.set_mouse_pos(20.0, 20.0));

    for (frame, expect) in [(0, false), (1, false), (2, true)] {
        h.clock = 10.0 + f64::from(frame) * 0.05;
        let at = h.clock;
        {
            let mut input = h.input.lock();
            input.begin_frame();
            if frame % 2 == 0 {
                input.mouse_button_down(MouseButton::Left, at);
            } else {
                input.mouse_button_up(MouseButton::Left);
            }
        }
        button_frame(&mut h.ui, &style);
        assert_eq!(h.record(&["root", "button"]).is_double_clicked, expect, "frame {frame}");
    }
}

#[test]
fn test_capture_singleton() {
    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.add_frame("a", &[]);
    ui.add_frame("b", &[]);
    ui.end_frame();
    let a = ui.find(&[Key::named("root"), Key::named("a")]).unwrap();
    let b = ui.find(&[Key::named("root"), Key::named("b")]).unwrap();

    assert!(ui.capture_press(a));
    assert!(ui.capture_press(a));
    assert!(!ui.capture_press(b));
    assert_eq!(ui.captures().press(), Some(a));

    assert!(!ui.release_press(b));
    assert!(ui.release_press(a));
    assert!(!ui.release_press(a));
    assert!(ui.capture_press(b));

    // Destroying the holder clears the register at the next commit.
    ui.begin_frame("root", &[]);
    ui.add_frame("a", &[]);
    ui.end_frame();
    assert_eq!(ui.captures().press(), None);
}

/// No node that has an opaque descendant under the cursor is hovered, and
/// at most one node is.
#[test]
fn test_hover_exclusivity() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xe7e7);

    for _ in 0..50 {
        let mut styles = Vec::new();
        for _ in 0..12 {
            let mut style = Style::new("box");
            style
                .position_type(PositionType::Absolute)
                .set(props::TOP, rng.gen_range(0.0_f32..400.0))
                .set(props::LEFT, rng.gen_range(0.0_f32..400.0))
                .size(rng.gen_range(10.0..300.0), rng.gen_range(10.0..300.0))
                .hit_test_transparent(rng.gen_bool(0.2))
                .pointer_events(rng.gen_bool(0.9))
                .overflow_hidden(rng.gen_bool(0.3), rng.gen_bool(0.3));
            styles.push(style);
        }

        let mut h = Harness::new();
        let (x, y) = (rng.gen_range(0.0..700.0), rng.gen_range(0.0..700.0));
        h.input(|i, _| i.set_mouse_pos(x, y));

        h.ui.begin_frame("root", &[]);
        for (i, chunk) in styles.chunks(3).enumerate() {
            h.ui.begin_frame(Key::named("group").indexed(i as u64), &[&chunk[0]]);
            h.ui.begin_frame("inner", &[&chunk[1]]);
            h.ui.add_frame("leaf", &[&chunk[2]]);
            h.ui.end_frame();
            h.ui.end_frame();
        }
        h.ui.end_frame();

        let root = h.ui.root().unwrap();
        let mouse = Vec2::new(x, y);
        let all = subtree(&h.ui, root);
        let hovered: Vec<NodeId> = all
            .iter()
            .copied()
            .filter(|id| h.ui.node(*id).unwrap().event_record().is_hovered)
            .collect();
        assert!(hovered.len() <= 1);

        for id in hovered {
            let covered = subtree(&h.ui, id).into_iter().skip(1).any(|d| {
                let node = h.ui.node(d).unwrap();
                let opaque = node.params().pointer_events && !node.params().hit_test_transparent;
                opaque
                    && node.clip_rect().contains(mouse)
                    && node.layout_box().rect().contains(mouse)
            });
            assert!(!covered);
        }
    }
}

fn subtree(ui: &Context, id: NodeId) -> Vec<NodeId> {
    let mut out = vec![id];
    for &child in ui.node(id).unwrap().children() {
        out.extend(subtree(ui, child));
    }
    out
}

#[test]
fn test_cursor_lock_suppresses_events() {
    let style = button_style();
    let mut h = Harness::new();
    h.input(|i, t| {
        i.set_mouse_pos(50.0, 50.0);
        i.mouse_button_down(MouseButton::Left, t);
        i.scroll(0.0, 3.0);
    });
    button_frame(&mut h.ui, &style);
    assert_eq!(h.state(&["root", "button"]), VisualState::Pressed);

    h.input(|i, _| {
        i.set_cursor_locked(true);
        i.scroll(0.0, 3.0);
    });
    button_frame(&mut h.ui, &style);
    for path in [&["root"][..], &["root", "button"][..]] {
        assert_eq!(h.record(path), EventRecord::default());
        assert_eq!(h.state(path), VisualState::Normal);
    }
    assert_eq!(h.ui.captures().press(), None);
}

#[test]
fn test_scroll_goes_to_hovered_node() {
    let style = button_style();
    let mut h = Harness::new();
    h.input(|i, _| {
        i.set_mouse_pos(50.0, 50.0);
        i.scroll(0.0, -2.0);
    });
    button_frame(&mut h.ui, &style);
    assert_eq!(h.record(&["root", "button"]).scroll_delta, Vec2::new(0.0, -2.0));
    assert_eq!(h.record(&["root"]).scroll_delta, Vec2::ZERO);
}

#[test]
fn test_disabled_swallows_the_pointer() {
    let mut style = button_style();
    style.disabled(true);
    let mut h = Harness::new();
    h.input(|i, t| {
        i.set_mouse_pos(50.0, 50.0);
        i.mouse_button_down(MouseButton::Left, t);
    });
    button_frame(&mut h.ui, &style);

    assert_eq!(h.state(&["root", "button"]), VisualState::Disabled);
    assert_eq!(h.record(&["root", "button"]), EventRecord::default());
    assert!(!h.record(&["root"]).is_hovered);
    assert_eq!(h.ui.captures().press(), None);
}

/// A propagating parent hands its state to children that have none.
#[test]
fn test_state_propagates_to_passive_children() {
    let mut card = Style::new("card");
    card.size(300.0, 300.0).propagate_state_to_children(true);
    let mut icon = Style::new("icon");
    icon.size(50.0, 50.0).pointer_events(false);

    let mut h = Harness::new();
    h.input(|i, _| i.set_mouse_pos(10.0, 10.0));
    h.ui.begin_frame("root", &[]);
    h.ui.begin_frame("card", &[&card]);
    h.ui.add_frame("icon", &[&icon]);
    h.ui.end_frame();
    h.ui.end_frame();

    assert_eq!(h.state(&["root", "card"]), VisualState::Hover);
    let icon = h.ui.node(h.id(&["root", "card", "icon"])).unwrap();
    assert_eq!(icon.state(), VisualState::Normal);
    assert_eq!(icon.resolved_state(), VisualState::Hover);
}

/// A pressed panel goes back to `Normal` while the cursor is over one of
/// its children.
#[test]
fn test_child_event_clears_parent_state() {
    let mut panel = Style::new("panel");
    panel.size(300.0, 200.0);
    let mut button = Style::new("btn");
    button.size(100.0, 50.0);
    let build = |ui: &mut Context| {
        ui.begin_frame("root", &[]);
        ui.begin_frame("panel", &[&panel]);
        ui.add_frame("btn", &[&button]);
        ui.end_frame();
        ui.end_frame();
    };
    let mut h = Harness::new();

    h.input(|i, t| {
        i.set_mouse_pos(250.0, 150.0);
        i.mouse_button_down(MouseButton::Left, t);
    });
    build(&mut h.ui);
    assert_eq!(h.state(&["root", "panel"]), VisualState::Pressed);

    h.input(|i, _| i.set_mouse_pos(20.0, 20.0));
    build(&mut h.ui);
    let panel_node = h.ui.node(h.id(&["root", "panel"])).unwrap();
    assert!(panel_node.child_has_event());
    assert_eq!(panel_node.state(), VisualState::Normal);
    assert_eq!(h.state(&["root", "panel", "btn"]), VisualState::Hover);
    assert!(h.record(&["root", "panel", "btn"]).is_hovered);
    // Capture still belongs to the panel.
    assert_eq!(h.ui.captures().press(), Some(h.id(&["root", "panel"])));

    // The root is an ancestor of the hovered button too.
    assert!(h.ui.node(h.id(&["root"])).unwrap().child_has_event());
}

#[test]
fn test_resize_applies_at_next_root_frame() {
    let host = Arc::new(HeadlessWindows::default());
    let window = host.create_window(1920.0, 1080.0);
    let mut ui = Context::with_window(UiConfig::default(), host.clone(), window).unwrap();
    assert_eq!(host.listener_count(), 1);

    ui.begin_frame("root", &[]);
    ui.end_frame();
    let root = ui.root().unwrap();
    assert_eq!(ui.node(root).unwrap().layout_box().size, Vec2::new(1920.0, 1080.0));

    host.resize(window, 3840.0, 2160.0).unwrap();
    assert!((ui.window_metrics().content_scale - 1.0).abs() < f32::EPSILON);

    ui.begin_frame("root", &[]);
    ui.end_frame();
    assert!((ui.window_metrics().content_scale - 2.0).abs() < f32::EPSILON);
    assert_eq!(ui.node(root).unwrap().layout_box().size, Vec2::new(3840.0, 2160.0));

    ui.destroy();
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn test_unknown_window_is_rejected() {
    let host = Arc::new(HeadlessWindows::default());
    let missing = lumen_ui::WindowId(99);
    assert!(Context::with_window(UiConfig::default(), host.clone(), missing).is_err());
    assert!(host.resize(missing, 10.0, 10.0).is_err());
    assert_eq!(host.listener_count(), 0);
}
