//! # Style Cascade Integration Test
//!
//! Merge priority, importance, composite expansion and unit resolution as
//! seen through a live context.

use std::sync::Arc;

use lumen_shared::Vec4;
use lumen_ui::{
    props, value_registry, Context, HeadlessWindows, Key, PropertyId, PropertyRegistry,
    PropertyValue, RenderCommand, Style, StyleState, UiConfig, UnitType, ValueRegistry,
    VisualState,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const RED: Vec4 = Vec4::rgb(255.0, 0.0, 0.0);
const BLUE: Vec4 = Vec4::rgb(0.0, 0.0, 255.0);

/// Scalar properties the random cases draw from.
const SCALARS: [PropertyId; 6] = [
    props::WIDTH,
    props::HEIGHT,
    props::TEXT_SIZE,
    props::BORDER_WIDTH,
    props::PADDING_TOP,
    props::MARGIN_LEFT,
];

fn random_state(rng: &mut ChaCha8Rng) -> StyleState {
    let mut state = StyleState::new();
    for id in SCALARS {
        if rng.gen_bool(0.5) {
            state.set(id, rng.gen_range(0.0_f32..500.0), false).unwrap();
        }
    }
    state
}

/// An important value in an earlier style beats a later plain one.
#[test]
fn test_important_cascade() {
    let mut a = Style::new("a");
    a.text_color(RED).important();
    let mut b = Style::new("b");
    b.text_color(BLUE);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[]);
    ui.add_text("label", "alert", &[&a, &b]);
    ui.end_frame();

    let id = ui.find(&[Key::named("root"), Key::named("label")]).unwrap();
    let node = ui.node(id).unwrap();
    assert_eq!(
        node.rendered_style().try_get(props::TEXT_COLOR, &ValueRegistry::new(), Vec4::ZERO),
        RED
    );
    assert!(ui
        .draw_list()
        .commands()
        .iter()
        .any(|c| matches!(c, RenderCommand::Text { color, .. } if *color == RED)));
}

/// `Px` follows the content scale; percentages follow the parent.
#[test]
fn test_composite_size_units() {
    let host = Arc::new(HeadlessWindows::default());
    let window = host.create_window(3840.0, 2160.0);

    let mut style = Style::new("panel");
    style
        .set(props::SIZE_UNIT, (UnitType::Px, UnitType::Percentage))
        .set(props::SIZE, (100.0_f32, 50.0_f32));

    let mut ui = Context::with_window(UiConfig::default(), host, window).unwrap();
    ui.begin_frame("root", &[]);
    ui.add_frame("panel", &[&style]);
    ui.end_frame();

    let id = ui.find(&[Key::named("root"), Key::named("panel")]).unwrap();
    let size = ui.node(id).unwrap().layout_box().size;
    assert!((size.x - 200.0).abs() < 1e-3);
    assert!((size.y - 1080.0).abs() < 1e-3);
}

/// Plain merges are a left-to-right per-property override.
#[test]
fn test_plain_merge_is_override() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let values = ValueRegistry::new();

    for _ in 0..100 {
        let a = random_state(&mut rng);
        let b = random_state(&mut rng);
        let mut merged = StyleState::new();
        merged.merge(&a);
        merged.merge(&b);

        for id in SCALARS {
            let expected = b.try_get_if_set::<f32>(id, &values).or(a.try_get_if_set(id, &values));
            assert_eq!(merged.try_get_if_set::<f32>(id, &values), expected, "property {id}");
        }
    }
}

/// An important resident survives any plain incoming value.
#[test]
fn test_important_dominates() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    for _ in 0..100 {
        let resident = PropertyValue::from(rng.gen_range(-100.0_f32..100.0)).important();
        let incoming = PropertyValue::from(rng.gen_range(-100.0_f32..100.0));
        let mut merged = resident.clone();
        assert!(!merged.merge_with_priority(&incoming));
        assert_eq!(merged, resident);

        // An important incoming value does replace it.
        let forced = incoming.important();
        assert!(merged.merge_with_priority(&forced));
        assert_eq!(merged, forced);
    }
}

/// A composite assignment equals assigning each part in order.
#[test]
fn test_composite_expansion() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    for _ in 0..50 {
        let edges: [f32; 4] = std::array::from_fn(|_| rng.gen_range(0.0..64.0));
        let important = rng.gen_bool(0.5);

        let mut composite = StyleState::new();
        composite
            .set(props::PADDING, (edges[0], edges[1], edges[2], edges[3]), important)
            .unwrap();

        let mut parts = StyleState::new();
        let sides = [
            props::PADDING_TOP,
            props::PADDING_RIGHT,
            props::PADDING_BOTTOM,
            props::PADDING_LEFT,
        ];
        for (id, value) in sides.into_iter().zip(edges) {
            parts.set(id, value, important).unwrap();
        }
        assert_eq!(composite, parts);
    }
}

#[test]
fn test_composite_arity_rejected() {
    let mut state = StyleState::new();
    assert!(state.set(props::PADDING, (1.0_f32, 2.0_f32), false).is_err());
    assert!(!state.is_set(props::PADDING_TOP));
}

#[test]
fn test_state_layer_over_normal() {
    let mut style = Style::new("button");
    style
        .background_color(BLUE)
        .text_size(12.0)
        .set_active_state(VisualState::Hover)
        .background_color(RED);

    let values = ValueRegistry::new();
    let hover = style.resolve_state(VisualState::Hover);
    assert_eq!(hover.try_get(props::BACKGROUND_COLOR, &values, Vec4::ZERO), RED);
    assert_eq!(hover.try_get(props::TEXT_SIZE, &values, 0.0_f32), 12.0);
    let pressed = style.resolve_state(VisualState::Pressed);
    assert_eq!(pressed.try_get(props::BACKGROUND_COLOR, &values, Vec4::ZERO), BLUE);
}

#[test]
fn test_edited_style_reaches_node() {
    let mut style = Style::new("live");
    style.background_color(BLUE);

    let mut ui = Context::new(UiConfig::default());
    let frame = |ui: &mut Context, style: &Style| {
        ui.begin_frame("root", &[style]);
        ui.end_frame();
    };
    frame(&mut ui, &style);
    style.background_color(RED);
    frame(&mut ui, &style);

    let root = ui.node(ui.root().unwrap()).unwrap();
    assert_eq!(root.params().background_color, RED);
    assert_eq!(root.applied_styles().len(), 1);
}

/// Application properties live beside the base set in a private registry.
#[test]
fn test_local_registry_composite() {
    let mut registry = PropertyRegistry::with_base();
    let radius = registry.register_property("corner_radius", "rounded corners", 0.0_f32);
    let shadow = registry.register_property("shadow_color", "drop shadow", Vec4::ZERO);
    let decor = registry
        .register_composite("decor", "radius and shadow", &[radius, shadow])
        .unwrap();
    assert_eq!(registry.find("decor"), Some(decor));
    assert_eq!(registry.register_property("corner_radius", "", 1.0_f32), radius);

    let mut state = StyleState::from_registry(&registry);
    state
        .set_in(&registry, decor, vec![PropertyValue::from(6_i32), PropertyValue::from(BLUE)], true)
        .unwrap();

    let values = ValueRegistry::new();
    // Integers coerce to the float default of the part.
    assert_eq!(state.get(radius).unwrap().data(), &lumen_ui::property::ValueData::Float(6.0));
    assert!(state.get(shadow).unwrap().is_important());
    assert_eq!(state.try_get(shadow, &values, Vec4::ZERO), BLUE);

    let wrong = state.set_in(&registry, shadow, vec![PropertyValue::from(true)], false);
    assert!(wrong.is_err());
    assert_eq!(state.try_get(shadow, &values, Vec4::ZERO), BLUE);
}

/// A style holding a color id follows later edits of the pooled color.
#[test]
fn test_color_id_follows_pool() {
    let id = value_registry().write().register_color(BLUE);
    let mut style = Style::new("themed");
    style.set(props::BACKGROUND_COLOR, id);

    let mut ui = Context::new(UiConfig::default());
    ui.begin_frame("root", &[&style]);
    ui.end_frame();
    let root = ui.root().unwrap();
    assert_eq!(ui.node(root).unwrap().params().background_color, BLUE);

    value_registry().write().update_color(id, RED).unwrap();
    ui.begin_frame("root", &[&style]);
    ui.end_frame();
    assert_eq!(ui.node(root).unwrap().params().background_color, RED);
}
