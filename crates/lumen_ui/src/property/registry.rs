//! Global property registry.
//!
//! Properties are registered once at startup. Concrete and composite
//! properties share one monotonic id space; only their descriptors differ.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;

use super::props;
use super::value::{PropertyValue, ValueClass, ValueData};
use crate::error::{diagnose, UiError, UiResult};

/// Opaque property identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PropertyId(pub u32);

impl PropertyId {
    /// Reserved invalid id.
    pub const INVALID: Self = Self(u32::MAX);

    /// Position in dense per-property tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns false for [`Self::INVALID`].
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a descriptor describes.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorKind {
    /// A stored property with a default value.
    Concrete {
        /// Registry default. Always carried with `is_set == false`.
        default: ValueData,
    },
    /// A shorthand that fans out to concrete properties, in order.
    Composite {
        /// Sub-properties in declaration order.
        parts: Vec<PropertyId>,
    },
}

/// Registration record of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Unique property name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Concrete or composite.
    pub kind: DescriptorKind,
}

impl PropertyDescriptor {
    /// True for composite descriptors.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, DescriptorKind::Composite { .. })
    }

    /// Value class of a concrete property.
    #[must_use]
    pub fn class(&self) -> Option<ValueClass> {
        match &self.kind {
            DescriptorKind::Concrete { default } => Some(default.class()),
            DescriptorKind::Composite { .. } => None,
        }
    }

    /// Unset default value of a concrete property.
    #[must_use]
    pub fn default_value(&self) -> Option<PropertyValue> {
        match &self.kind {
            DescriptorKind::Concrete { default } => Some(PropertyValue::unset(default.clone())),
            DescriptorKind::Composite { .. } => None,
        }
    }

    /// Sub-properties of a composite (empty for concrete ones).
    #[must_use]
    pub fn parts(&self) -> &[PropertyId] {
        match &self.kind {
            DescriptorKind::Concrete { .. } => &[],
            DescriptorKind::Composite { parts } => parts,
        }
    }
}

/// Id-indexed catalog of property descriptors.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    descriptors: Vec<PropertyDescriptor>,
    by_name: HashMap<String, PropertyId>,
    base_registered: bool,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the base property set.
    #[must_use]
    pub fn with_base() -> Self {
        let mut registry = Self::new();
        registry.register_base();
        registry
    }

    /// Registers the base property set. Idempotent.
    ///
    /// On an empty registry the base ids equal the constants in
    /// [`props`](super::props).
    pub fn register_base(&mut self) {
        if self.base_registered {
            return;
        }
        props::register_base(self);
        self.base_registered = true;
    }

    /// Returns true once the base set is present.
    #[must_use]
    pub fn has_base(&self) -> bool {
        self.base_registered
    }

    /// Drops every registration and re-registers the base set.
    pub fn reset(&mut self) {
        self.descriptors.clear();
        self.by_name.clear();
        self.base_registered = false;
        self.register_base();
    }

    fn push(&mut self, descriptor: PropertyDescriptor) -> PropertyId {
        if let Some(&existing) = self.by_name.get(&descriptor.name) {
            tracing::debug!(name = %descriptor.name, id = %existing, "property already registered");
            return existing;
        }
        let Ok(raw) = u32::try_from(self.descriptors.len()) else {
            diagnose(&UiError::UnknownProperty(PropertyId::INVALID));
            return PropertyId::INVALID;
        };
        let id = PropertyId(raw);
        self.by_name.insert(descriptor.name.clone(), id);
        self.descriptors.push(descriptor);
        id
    }

    /// Registers a concrete property. Re-registering a name returns the
    /// existing id unchanged.
    pub fn register_property(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<PropertyValue>,
    ) -> PropertyId {
        let default = default_value.into().data().clone();
        self.push(PropertyDescriptor {
            name: name.into(),
            description: description.into(),
            kind: DescriptorKind::Concrete { default },
        })
    }

    /// Registers a composite property over existing concrete properties.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownProperty`] if a part is unregistered or is
    /// itself composite.
    pub fn register_composite(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parts: &[PropertyId],
    ) -> UiResult<PropertyId> {
        if let Some(&bad) = parts
            .iter()
            .find(|id| self.try_get(**id).map_or(true, PropertyDescriptor::is_composite))
        {
            return Err(UiError::UnknownProperty(bad));
        }
        Ok(self.push(PropertyDescriptor {
            name: name.into(),
            description: description.into(),
            kind: DescriptorKind::Composite { parts: parts.to_vec() },
        }))
    }

    /// Looks up a descriptor.
    #[must_use]
    pub fn try_get(&self, id: PropertyId) -> Option<&PropertyDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Looks up an id by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<PropertyId> {
        self.by_name.get(name).copied()
    }

    /// Iterates every registration in id order.
    pub fn all(&self) -> impl Iterator<Item = (PropertyId, &PropertyDescriptor)> + '_ {
        self.descriptors
            .iter()
            .zip(0_u32..)
            .map(|(descriptor, raw)| (PropertyId(raw), descriptor))
    }

    /// Number of registered properties (concrete and composite).
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

static GLOBAL_PROPERTIES: OnceLock<RwLock<PropertyRegistry>> = OnceLock::new();

/// The process-wide property registry, created with the base set.
pub fn property_registry() -> &'static RwLock<PropertyRegistry> {
    GLOBAL_PROPERTIES.get_or_init(|| RwLock::new(PropertyRegistry::with_base()))
}
