//! # Style State
//!
//! A dense map over every registered concrete property for one visual
//! state. Unset entries hold the registry default with `is_set == false`,
//! so merging a state never clobbers a value set further up the cascade.

use crate::animation::Easing;
use crate::error::{diagnose, UiError, UiResult};
use crate::property::{
    property_registry, DescriptorKind, FromValue, IntoValues, PropertyId, PropertyRegistry,
    PropertyValue,
};
use crate::values::ValueRegistry;

/// Property values of one visual state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleState {
    /// Indexed by `PropertyId`. `None` for composite ids.
    values: Vec<Option<PropertyValue>>,
}

impl StyleState {
    /// Creates a state holding every default of the global registry.
    #[must_use]
    pub fn new() -> Self {
        Self::from_registry(&property_registry().read())
    }

    /// Creates a state holding every default of `registry`.
    #[must_use]
    pub fn from_registry(registry: &PropertyRegistry) -> Self {
        let mut state = Self { values: Vec::with_capacity(registry.len()) };
        state.grow(registry);
        state
    }

    /// Adds defaults for properties registered after this state was built.
    fn grow(&mut self, registry: &PropertyRegistry) {
        if self.values.len() >= registry.len() {
            return;
        }
        let start = self.values.len();
        self.values.extend(
            registry
                .all()
                .skip(start)
                .map(|(_, descriptor)| descriptor.default_value()),
        );
    }

    /// Number of slots (registered property count when last grown).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no slot exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored value of a concrete property, set or default.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyValue> {
        self.values.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns true if `id` was explicitly assigned.
    #[must_use]
    pub fn is_set(&self, id: PropertyId) -> bool {
        self.get(id).is_some_and(PropertyValue::is_set)
    }

    /// Assigns a value (or, for a composite, one value per sub-property).
    ///
    /// # Errors
    ///
    /// Fails without touching the state on an unknown id, a wrong number of
    /// values or a value of the wrong class.
    pub fn set(
        &mut self,
        id: PropertyId,
        values: impl IntoValues,
        important: bool,
    ) -> UiResult<()> {
        self.set_in(&property_registry().read(), id, values.into_values(), important)
    }

    /// [`StyleState::set`] against an explicit registry.
    ///
    /// # Errors
    ///
    /// See [`StyleState::set`].
    pub fn set_in(
        &mut self,
        registry: &PropertyRegistry,
        id: PropertyId,
        values: Vec<PropertyValue>,
        important: bool,
    ) -> UiResult<()> {
        let descriptor = registry.try_get(id).ok_or(UiError::UnknownProperty(id))?;
        let targets: Vec<PropertyId> = match &descriptor.kind {
            DescriptorKind::Concrete { .. } => vec![id],
            DescriptorKind::Composite { parts } => parts.clone(),
        };
        if targets.len() != values.len() {
            return Err(UiError::CompositeArity {
                property: id,
                expected: targets.len(),
                got: values.len(),
            });
        }

        // Validate every part before assigning any.
        let mut staged = Vec::with_capacity(targets.len());
        for (target, value) in targets.into_iter().zip(values) {
            let DescriptorKind::Concrete { default } = &registry
                .try_get(target)
                .ok_or(UiError::UnknownProperty(target))?
                .kind
            else {
                return Err(UiError::UnknownProperty(target));
            };
            if default.class() != value.class() {
                return Err(UiError::ClassMismatch {
                    property: target,
                    expected: default.class(),
                    got: value.class(),
                });
            }

            let important = important || value.is_important();
            let mut value = value.with_importance(important);
            if default.is_concrete_numeric() {
                if let Some(scalar) = value.data().concrete_scalar() {
                    value.replace_data(default.with_scalar(scalar));
                }
            }
            staged.push((target, value));
        }

        self.grow(registry);
        for (target, value) in staged {
            self.values[target.index()] = Some(value);
        }
        Ok(())
    }

    /// Sets or clears the important flag of a set value. Composite ids
    /// apply to every sub-property.
    pub fn set_important_flag(
        &mut self,
        registry: &PropertyRegistry,
        id: PropertyId,
        important: bool,
    ) {
        for target in expand(registry, id) {
            if let Some(Some(value)) = self.values.get_mut(target.index()) {
                if value.is_set() {
                    value.set_important_flag(important);
                }
            }
        }
    }

    /// Clears `is_set` and `is_important`, keeping the default value.
    pub fn reset(&mut self, id: PropertyId) {
        let registry = property_registry().read();
        self.reset_in(&registry, id);
    }

    /// [`StyleState::reset`] against an explicit registry.
    pub fn reset_in(&mut self, registry: &PropertyRegistry, id: PropertyId) {
        for target in expand(registry, id) {
            let default = registry.try_get(target).and_then(|d| d.default_value());
            if let (Some(slot), Some(default)) = (self.values.get_mut(target.index()), default) {
                *slot = Some(default);
            }
        }
    }

    /// Applies every entry of `other` with the importance rule.
    pub fn merge(&mut self, other: &Self) {
        for (index, incoming) in other.values.iter().enumerate() {
            let Some(incoming) = incoming else { continue };
            if index >= self.values.len() {
                self.values.resize(index + 1, None);
            }
            let slot = &mut self.values[index];
            match slot {
                Some(resident) => {
                    resident.merge_with_priority(incoming);
                }
                None => *slot = Some(incoming.clone()),
            }
        }
    }

    /// Applies every set entry of `other`, ignoring importance.
    pub fn overlay(&mut self, other: &Self) {
        for (index, incoming) in other.values.iter().enumerate() {
            let Some(incoming) = incoming.as_ref().filter(|v| v.is_set()) else { continue };
            if index >= self.values.len() {
                self.values.resize(index + 1, None);
            }
            self.values[index] = Some(incoming.clone());
        }
    }

    /// Reads a value only when it was explicitly assigned.
    #[must_use]
    pub fn try_get_if_set<T: FromValue>(
        &self,
        id: PropertyId,
        values: &ValueRegistry,
    ) -> Option<T> {
        let value = self.get(id).filter(|v| v.is_set())?;
        match value.try_get(values) {
            Ok(v) => Some(v),
            Err(err) => {
                diagnose(&err);
                None
            }
        }
    }

    /// Reads a value (set or default), or `fallback` when it is missing or
    /// cannot be read as `T`.
    #[must_use]
    pub fn try_get<T: FromValue>(&self, id: PropertyId, values: &ValueRegistry, fallback: T) -> T {
        let Some(value) = self.get(id) else {
            return fallback;
        };
        match value.try_get(values) {
            Ok(v) => v,
            Err(err) => {
                diagnose(&err);
                fallback
            }
        }
    }

    /// Per-property blend of two states.
    ///
    /// Entries set on both sides interpolate; otherwise the end entry wins
    /// when set, else the start entry is kept.
    #[must_use]
    pub fn interpolate(
        start: &Self,
        end: &Self,
        t: f32,
        easing: Easing,
        values: &ValueRegistry,
    ) -> Self {
        let len = start.values.len().max(end.values.len());
        let mut out = Vec::with_capacity(len);
        for index in 0..len {
            let a = start.values.get(index).and_then(Option::as_ref);
            let b = end.values.get(index).and_then(Option::as_ref);
            out.push(match (a, b) {
                (Some(a), Some(b)) if a.is_set() && b.is_set() => {
                    Some(PropertyValue::interpolate(a, b, t, easing, values))
                }
                (_, Some(b)) if b.is_set() => Some(b.clone()),
                (Some(a), _) => Some(a.clone()),
                (None, b) => b.cloned(),
            });
        }
        Self { values: out }
    }

    /// Iterates explicitly assigned entries.
    pub fn iter_set(&self) -> impl Iterator<Item = (PropertyId, &PropertyValue)> + '_ {
        self.values
            .iter()
            .zip(0_u32..)
            .filter_map(|(value, raw)| {
                value
                    .as_ref()
                    .filter(|v| v.is_set())
                    .map(|v| (PropertyId(raw), v))
            })
    }
}

/// The concrete ids a write to `id` touches.
fn expand(registry: &PropertyRegistry, id: PropertyId) -> Vec<PropertyId> {
    match registry.try_get(id).map(|d| &d.kind) {
        Some(DescriptorKind::Composite { parts }) => parts.clone(),
        Some(DescriptorKind::Concrete { .. }) => vec![id],
        None => Vec::new(),
    }
}
