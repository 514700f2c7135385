//! # Layout Integration Test
//!
//! Flow placement, units, positioning modes, overflow clipping and draw
//! order after a full commit.

use lumen_shared::{Rect, Vec2, Vec4};
use lumen_ui::{
    props, Alignment, Context, Key, LayoutDirection, NodeId, PositionType, RenderCommand, Style,
    UiConfig, UnitType,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn rect_of(ui: &Context, path: &[&str]) -> Rect {
    let keys: Vec<Key> = path.iter().map(|k| Key::named(k)).collect();
    ui.node(ui.find(&keys).unwrap()).unwrap().layout_box().rect()
}

fn sized(name: &str, width: f32, height: f32) -> Style {
    let mut style = Style::new(name);
    style.size(width, height);
    style
}

#[test]
fn test_vertical_flow_with_padding_and_margin() {
    let mut panel = sized("panel", 400.0, 300.0);
    panel.padding(10.0, 10.0, 10.0, 20.0);
    let mut item = sized("item", 100.0, 40.0);
    item.margin(5.0, 0.0, 5.0, 0.0);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.begin_frame("panel", &[&panel]);
    ui.add_frame("a", &[&item]);
    ui.add_frame("b", &[&item]);
    ui.end_frame();
    ui.end_frame();

    assert_eq!(rect_of(&ui, &["root", "panel"]), Rect::new(0.0, 0.0, 400.0, 300.0));
    assert_eq!(rect_of(&ui, &["root", "panel", "a"]), Rect::new(20.0, 15.0, 100.0, 40.0));
    assert_eq!(rect_of(&ui, &["root", "panel", "b"]), Rect::new(20.0, 65.0, 100.0, 40.0));
}

#[test]
fn test_horizontal_centered_run() {
    let mut row = sized("row", 500.0, 100.0);
    row.layout_direction(LayoutDirection::Horizontal)
        .alignment(Alignment::Center, Alignment::End);
    let cell = sized("cell", 100.0, 20.0);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.begin_frame("row", &[&row]);
    for key in ["x", "y", "z"] {
        ui.add_frame(key, &[&cell]);
    }
    ui.end_frame();
    ui.end_frame();

    assert_eq!(rect_of(&ui, &["root", "row", "x"]).origin(), Vec2::new(100.0, 80.0));
    assert_eq!(rect_of(&ui, &["root", "row", "y"]).origin(), Vec2::new(200.0, 80.0));
    assert_eq!(rect_of(&ui, &["root", "row", "z"]).origin(), Vec2::new(300.0, 80.0));
}

#[test]
fn test_percentages_follow_parent_box() {
    let panel = sized("panel", 800.0, 400.0);
    let mut half = Style::new("half");
    half.size_unit(UnitType::Percentage, UnitType::PercentageW)
        .size(50.0, 10.0);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.begin_frame("panel", &[&panel]);
    ui.add_frame("half", &[&half]);
    ui.end_frame();
    ui.end_frame();

    let rect = rect_of(&ui, &["root", "panel", "half"]);
    assert_eq!(rect.size(), Vec2::new(400.0, 80.0));
}

#[test]
fn test_absolute_anchors_to_relative_ancestor() {
    let spacer = sized("spacer", 100.0, 50.0);
    let mut card = sized("card", 300.0, 200.0);
    card.position_type(PositionType::Relative).offsets(10.0, 20.0, 0.0, 0.0);
    let plain = sized("plain", 200.0, 100.0);
    let mut badge = sized("badge", 30.0, 30.0);
    badge
        .position_type(PositionType::Absolute)
        .set(props::BOTTOM, 5.0_f32)
        .set(props::RIGHT, 5.0_f32);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.add_frame("spacer", &[&spacer]);
    ui.begin_frame("card", &[&card]);
    ui.begin_frame("plain", &[&plain]);
    ui.add_frame("badge", &[&badge]);
    ui.end_frame();
    ui.end_frame();
    ui.end_frame();

    // The card flows below the spacer, then shifts by its offsets.
    let card_rect = rect_of(&ui, &["root", "card"]);
    assert_eq!(card_rect, Rect::new(20.0, 60.0, 300.0, 200.0));
    // The badge skips its flow parent and anchors to the card.
    let badge = rect_of(&ui, &["root", "card", "plain", "badge"]);
    assert_eq!(badge.origin(), Vec2::new(20.0 + 300.0 - 5.0 - 30.0, 60.0 + 200.0 - 5.0 - 30.0));
}

#[test]
fn test_absolute_without_relative_uses_root() {
    let mut overlay = sized("overlay", 10.0, 10.0);
    overlay
        .position_type(PositionType::Absolute)
        .set(props::TOP_UNIT, UnitType::Percentage)
        .set(props::TOP, 50.0_f32)
        .set(props::LEFT, 7.0_f32);
    let mut nested = sized("nested", 100.0, 100.0);
    nested.margin(30.0, 0.0, 0.0, 30.0);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.begin_frame("nested", &[&nested]);
    ui.add_frame("overlay", &[&overlay]);
    ui.end_frame();
    ui.end_frame();

    let rect = rect_of(&ui, &["root", "nested", "overlay"]);
    assert_eq!(rect.origin(), Vec2::new(7.0, 540.0));
}

#[test]
fn test_bad_lengths_collapse_to_zero() {
    let negative = sized("negative", -40.0, f32::NAN);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.add_frame("bad", &[&negative]);
    ui.end_frame();
    assert_eq!(rect_of(&ui, &["root", "bad"]).size(), Vec2::ZERO);
}

#[test]
fn test_text_is_measured() {
    let mut label = Style::new("label");
    label.text_size(10.0).padding(2.0, 3.0, 2.0, 3.0);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.add_text("label", "abc\nde", &[&label]);
    ui.end_frame();

    // Three columns of 6 px and two lines of 12.5 px, plus padding.
    let size = rect_of(&ui, &["root", "label"]).size();
    assert!((size.x - 24.0).abs() < 1e-4);
    assert!((size.y - 29.0).abs() < 1e-4);
}

/// Hidden overflow keeps every clip inside the parent's clip on that axis.
#[test]
fn test_overflow_clip_is_subset() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xc11b);

    for _ in 0..50 {
        let styles: Vec<Style> = (0..16)
            .map(|_| {
                let position = if rng.gen_bool(0.5) {
                    PositionType::Absolute
                } else {
                    PositionType::Flow
                };
                let mut style = Style::new("box");
                style
                    .position_type(position)
                    .set(props::TOP, rng.gen_range(-100.0_f32..600.0))
                    .set(props::LEFT, rng.gen_range(-100.0_f32..600.0))
                    .size(rng.gen_range(0.0..700.0), rng.gen_range(0.0..700.0))
                    .overflow_hidden(rng.gen_bool(0.5), rng.gen_bool(0.5));
                style
            })
            .collect();

        let mut ui = Context::new(UiConfig::default());
        ui.begin_frame("root", &[]);
        for (i, chunk) in styles.chunks(4).enumerate() {
            ui.begin_frame(Key::new(i as u64), &[&chunk[0]]);
            ui.begin_frame(1_u64, &[&chunk[1]]);
            ui.begin_frame(2_u64, &[&chunk[2]]);
            ui.add_frame(3_u64, &[&chunk[3]]);
            ui.end_frame();
            ui.end_frame();
            ui.end_frame();
        }
        ui.end_frame();

        check_clips(&ui, ui.root().unwrap());
    }
}

fn check_clips(ui: &Context, id: NodeId) {
    let node = ui.node(id).unwrap();
    let clip = node.clip_rect();
    for &child in node.children() {
        let child_node = ui.node(child).unwrap();
        let inner = child_node.clip_rect();
        let params = child_node.params();
        if params.overflow_hidden_x {
            assert!(inner.x >= clip.x - 1e-3 && inner.right() <= clip.right() + 1e-3);
        }
        if params.overflow_hidden_y {
            assert!(inner.y >= clip.y - 1e-3 && inner.bottom() <= clip.bottom() + 1e-3);
        }
        check_clips(ui, child);
    }
}

#[test]
fn test_draw_list_is_back_to_front() {
    let mut back = sized("back", 300.0, 300.0);
    back.background_color(Vec4::rgb(10.0, 10.0, 10.0))
        .border(Vec4::rgb(255.0, 255.0, 255.0), 2.0)
        .overflow_hidden(true, true);
    let mut front = sized("front", 500.0, 50.0);
    front.background_color(Vec4::rgb(200.0, 0.0, 0.0));

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.begin_frame("back", &[&back]);
    ui.add_frame("front", &[&front]);
    ui.end_frame();
    ui.end_frame();

    let commands = ui.draw_list().commands();
    let fills: Vec<Vec4> = commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::FillRect { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(fills, vec![Vec4::rgb(10.0, 10.0, 10.0), Vec4::rgb(200.0, 0.0, 0.0)]);
    assert!(commands
        .iter()
        .any(|c| matches!(c, RenderCommand::StrokeRect { width, .. } if *width == 2.0)));

    // The front box is clipped to its hidden-overflow parent.
    let last_clip = commands
        .iter()
        .rev()
        .find_map(|c| match c {
            RenderCommand::SetClip(rect) => Some(*rect),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_clip, Rect::new(0.0, 0.0, 300.0, 300.0));
    assert_eq!(ui.stats().draw_commands, commands.len());
}

#[test]
fn test_root_margin_insets_it_from_the_window() {
    let mut inset = Style::new("inset");
    inset.margin(10.0, 30.0, 40.0, 20.0);
    let child = sized("child", 50.0, 50.0);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[&inset]);
    ui.add_frame("child", &[&child]);
    ui.end_frame();

    assert_eq!(rect_of(&ui, &["root"]), Rect::new(20.0, 10.0, 1870.0, 1030.0));
    assert_eq!(rect_of(&ui, &["root", "child"]).origin(), Vec2::new(20.0, 10.0));
}
