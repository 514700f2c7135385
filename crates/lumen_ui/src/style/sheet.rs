//! # Style
//!
//! One [`StyleState`] layer per [`VisualState`] plus a builder cursor. The
//! fluent setters write into the layer the cursor points at; the resolved
//! state for a non-normal visual state is the normal layer with that
//! state's layer merged on top.

use std::sync::atomic::{AtomicU64, Ordering};

use lumen_shared::Vec4;

use super::{StyleState, VisualState};
use crate::animation::{Easing, TimeUnit};
use crate::error::{diagnose, UiResult};
use crate::layout::{Alignment, LayoutDirection, PositionType, UnitType};
use crate::property::{property_registry, props, IntoValues, PropertyId};
use crate::values::{FontRef, TextureRef};

static NEXT_STYLE_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> u64 {
    NEXT_STYLE_UID.fetch_add(1, Ordering::Relaxed)
}

/// A named, layered set of property assignments.
#[derive(Debug)]
pub struct Style {
    name: String,
    uid: u64,
    revision: u64,
    layers: [Option<StyleState>; VisualState::COUNT],
    cursor: VisualState,
    last_set: Option<PropertyId>,
}

impl Clone for Style {
    /// A clone is a new style: it gets its own uid so edits to either copy
    /// never alias the other's `(uid, revision)` pair.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            uid: next_uid(),
            revision: self.revision,
            layers: self.layers.clone(),
            cursor: self.cursor,
            last_set: self.last_set,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new("")
    }
}

impl Style {
    /// Creates an empty style. The name is used in diagnostics only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: next_uid(),
            revision: 0,
            layers: Default::default(),
            cursor: VisualState::Normal,
            last_set: None,
        }
    }

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Process-unique id.
    #[must_use]
    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// Bumped by every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Points the builder cursor at `state`.
    pub fn set_active_state(&mut self, state: VisualState) -> &mut Self {
        self.cursor = state;
        self
    }

    /// Layer the cursor points at.
    #[must_use]
    pub fn active_state(&self) -> VisualState {
        self.cursor
    }

    /// Assigns a value in the active layer. Errors are diagnosed and the
    /// assignment dropped.
    pub fn set(&mut self, id: PropertyId, values: impl IntoValues) -> &mut Self {
        self.set_with(id, values, false)
    }

    /// [`Style::set`] with an explicit importance flag.
    pub fn set_with(
        &mut self,
        id: PropertyId,
        values: impl IntoValues,
        important: bool,
    ) -> &mut Self {
        if let Err(err) = self.try_set(id, values, important) {
            tracing::debug!(style = %self.name, property = %id, "style assignment dropped");
            diagnose(&err);
        }
        self
    }

    /// Assigns a value in the active layer.
    ///
    /// # Errors
    ///
    /// See [`StyleState::set`]; the style is unchanged on error.
    pub fn try_set(
        &mut self,
        id: PropertyId,
        values: impl IntoValues,
        important: bool,
    ) -> UiResult<()> {
        let cursor = self.cursor;
        self.get_state(cursor).set(id, values, important)?;
        self.last_set = Some(id);
        Ok(())
    }

    /// Marks the most recently set property important. A composite marks
    /// every sub-property.
    pub fn important(&mut self) -> &mut Self {
        if let Some(id) = self.last_set {
            let cursor = self.cursor;
            let layer = self.get_state(cursor);
            let registry = property_registry().read();
            layer.set_important_flag(&registry, id, true);
        }
        self
    }

    /// Resets a property in the active layer to its unset default.
    pub fn reset(&mut self, id: PropertyId) -> &mut Self {
        let cursor = self.cursor;
        self.get_state(cursor).reset(id);
        self
    }

    /// Layers `other` on top, state by state.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        for state in VisualState::ALL {
            if let Some(incoming) = &other.layers[state.index()] {
                self.get_state(state).merge(incoming);
            }
        }
        self
    }

    /// The layer for `state`, created on demand.
    pub fn get_state(&mut self, state: VisualState) -> &mut StyleState {
        self.revision += 1;
        self.layers[state.index()].get_or_insert_with(StyleState::new)
    }

    /// The layer for `state`, if one was created.
    #[must_use]
    pub fn state(&self, state: VisualState) -> Option<&StyleState> {
        self.layers[state.index()].as_ref()
    }

    /// Effective state: the normal layer with `state`'s layer merged on top.
    #[must_use]
    pub fn resolve_state(&self, state: VisualState) -> StyleState {
        let mut resolved = self.state(VisualState::Normal).cloned().unwrap_or_else(StyleState::new);
        if state != VisualState::Normal {
            if let Some(layer) = self.state(state) {
                resolved.merge(layer);
            }
        }
        resolved
    }

    /// Sets width and height.
    pub fn size(&mut self, width: f32, height: f32) -> &mut Self {
        self.set(props::SIZE, (width, height))
    }

    /// Sets width.
    pub fn width(&mut self, width: f32) -> &mut Self {
        self.set(props::WIDTH, width)
    }

    /// Sets height.
    pub fn height(&mut self, height: f32) -> &mut Self {
        self.set(props::HEIGHT, height)
    }

    /// Sets width and height units.
    pub fn size_unit(&mut self, width: UnitType, height: UnitType) -> &mut Self {
        self.set(props::SIZE_UNIT, (width, height))
    }

    /// Sets padding, clockwise from the top.
    pub fn padding(&mut self, top: f32, right: f32, bottom: f32, left: f32) -> &mut Self {
        self.set(props::PADDING, (top, right, bottom, left))
    }

    /// Sets margin, clockwise from the top.
    pub fn margin(&mut self, top: f32, right: f32, bottom: f32, left: f32) -> &mut Self {
        self.set(props::MARGIN, (top, right, bottom, left))
    }

    /// Sets the child flow direction.
    pub fn layout_direction(&mut self, direction: LayoutDirection) -> &mut Self {
        self.set(props::LAYOUT_DIRECTION, direction)
    }

    /// Sets horizontal and vertical child alignment.
    pub fn alignment(&mut self, horizontal: Alignment, vertical: Alignment) -> &mut Self {
        self.set(props::ALIGNMENT, (horizontal, vertical))
    }

    /// Sets the positioning mode.
    pub fn position_type(&mut self, position: PositionType) -> &mut Self {
        self.set(props::POSITION_TYPE, position)
    }

    /// Sets the top, left, bottom and right offsets.
    pub fn offsets(&mut self, top: f32, left: f32, bottom: f32, right: f32) -> &mut Self {
        self.set(props::OFFSETS, (top, left, bottom, right))
    }

    /// Sets the background color.
    pub fn background_color(&mut self, color: Vec4) -> &mut Self {
        self.set(props::BACKGROUND_COLOR, color)
    }

    /// Sets the background texture.
    pub fn background_texture(&mut self, texture: TextureRef) -> &mut Self {
        self.set(props::BACKGROUND_TEXTURE, texture)
    }

    /// Sets border color and width.
    pub fn border(&mut self, color: Vec4, width: f32) -> &mut Self {
        self.set(props::BORDER, (color, width))
    }

    /// Sets overflow clipping per axis.
    pub fn overflow_hidden(&mut self, x: bool, y: bool) -> &mut Self {
        self.set(props::OVERFLOW, (x, y))
    }

    /// Sets whether the node takes part in hit-testing.
    pub fn pointer_events(&mut self, enabled: bool) -> &mut Self {
        self.set(props::POINTER_EVENTS, enabled)
    }

    /// Sets whether the pointer passes through the node.
    pub fn hit_test_transparent(&mut self, transparent: bool) -> &mut Self {
        self.set(props::HIT_TEST_TRANSPARENT, transparent)
    }

    /// Sets whether children inherit this node's resolved state.
    pub fn propagate_state_to_children(&mut self, propagate: bool) -> &mut Self {
        self.set(props::PROPAGATE_STATE_TO_CHILDREN, propagate)
    }

    /// Sets the disabled flag.
    pub fn disabled(&mut self, disabled: bool) -> &mut Self {
        self.set(props::DISABLED, disabled)
    }

    /// Sets transition duration, unit and easing.
    pub fn transition(&mut self, duration: f32, unit: TimeUnit, easing: Easing) -> &mut Self {
        self.set(props::TRANSITION, (duration, unit, easing))
    }

    /// Sets the text font.
    pub fn font(&mut self, font: FontRef) -> &mut Self {
        self.set(props::FONT, font)
    }

    /// Sets the text size.
    pub fn text_size(&mut self, size: f32) -> &mut Self {
        self.set(props::TEXT_SIZE, size)
    }

    /// Sets the text color.
    pub fn text_color(&mut self, color: Vec4) -> &mut Self {
        self.set(props::TEXT_COLOR, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::ValueData;
    use crate::values::ValueRegistry;

    #[test]
    fn test_fluent_setters_target_cursor() {
        let mut style = Style::new("button");
        style
            .background_color(Vec4::rgb(10.0, 10.0, 10.0))
            .set_active_state(VisualState::Hover)
            .background_color(Vec4::rgb(50.0, 50.0, 50.0));

        let values = ValueRegistry::new();
        let normal = style.resolve_state(VisualState::Normal);
        let hover = style.resolve_state(VisualState::Hover);
        assert_eq!(
            normal.try_get(props::BACKGROUND_COLOR, &values, Vec4::ZERO),
            Vec4::rgb(10.0, 10.0, 10.0)
        );
        assert_eq!(
            hover.try_get(props::BACKGROUND_COLOR, &values, Vec4::ZERO),
            Vec4::rgb(50.0, 50.0, 50.0)
        );
        // Pressed has no layer: falls back to normal.
        assert_eq!(style.resolve_state(VisualState::Pressed), normal);
    }

    #[test]
    fn test_important_marks_composite_parts() {
        let mut style = Style::new("box");
        style.size(10.0, 20.0).important();

        let normal = style.state(VisualState::Normal).unwrap();
        assert!(normal.get(props::WIDTH).unwrap().is_important());
        assert!(normal.get(props::HEIGHT).unwrap().is_important());
    }

    #[test]
    fn test_revision_and_uid() {
        let mut style = Style::new("a");
        let before = style.revision();
        style.width(5.0);
        assert!(style.revision() > before);

        let copy = style.clone();
        assert_ne!(copy.uid(), style.uid());
        assert_eq!(copy.state(VisualState::Normal), style.state(VisualState::Normal));
    }

    #[test]
    fn test_bad_assignment_is_dropped() {
        let mut style = Style::new("bad");
        style.set(props::WIDTH, true);
        assert!(!style.state(VisualState::Normal).unwrap().is_set(props::WIDTH));
        assert!(style.try_set(props::SIZE, 1.0_f32, false).is_err());
    }

    #[test]
    fn test_merge_layers_per_state() {
        let mut base = Style::new("base");
        base.text_size(12.0);
        let mut accent = Style::new("accent");
        accent.set_active_state(VisualState::Pressed).text_size(30.0);

        base.merge(&accent);
        assert_eq!(
            base.state(VisualState::Pressed).unwrap().get(props::TEXT_SIZE).unwrap().data(),
            &ValueData::Float(30.0)
        );
        assert_eq!(
            base.state(VisualState::Normal).unwrap().get(props::TEXT_SIZE).unwrap().data(),
            &ValueData::Float(12.0)
        );
    }
}
