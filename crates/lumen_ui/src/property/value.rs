//! Tagged property values with priority merge and interpolation.

use lumen_shared::{Vec2, Vec4};

use crate::animation::Easing;
use crate::error::{diagnose, UiError, UiResult};
use crate::values::{ColorId, FontId, FontRef, NumberId, TextureId, TextureRef, ValueRegistry};

/// Comparison class of a value. Equality and interpolation are only
/// defined between values of the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    /// `Int`, `Float`, `Double` and `NumberId`.
    Numeric,
    /// `Bool`.
    Bool,
    /// `Vec2`.
    Vec2,
    /// `Vec4` and `ColorId`.
    Vec4,
    /// `Texture` and `TextureId`.
    Texture,
    /// `Font` and `FontId`.
    Font,
}

/// Raw payload of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    /// 32-bit integer (also used for enum properties).
    Int(i32),
    /// Single precision scalar.
    Float(f32),
    /// Double precision scalar.
    Double(f64),
    /// Flag.
    Bool(bool),
    /// 2D vector.
    Vec2(Vec2),
    /// 4D vector or RGBA color.
    Vec4(Vec4),
    /// Texture handle.
    Texture(TextureRef),
    /// Font handle.
    Font(FontRef),
    /// Reference into the color pool.
    ColorId(ColorId),
    /// Reference into the font pool.
    FontId(FontId),
    /// Reference into the texture pool.
    TextureId(TextureId),
    /// Reference into the number pool.
    NumberId(NumberId),
}

impl ValueData {
    /// Returns the comparison class.
    #[must_use]
    pub fn class(&self) -> ValueClass {
        match self {
            Self::Int(_) | Self::Float(_) | Self::Double(_) | Self::NumberId(_) => {
                ValueClass::Numeric
            }
            Self::Bool(_) => ValueClass::Bool,
            Self::Vec2(_) => ValueClass::Vec2,
            Self::Vec4(_) | Self::ColorId(_) => ValueClass::Vec4,
            Self::Texture(_) | Self::TextureId(_) => ValueClass::Texture,
            Self::Font(_) | Self::FontId(_) => ValueClass::Font,
        }
    }

    /// Returns true for the concrete numeric variants.
    #[must_use]
    pub fn is_concrete_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Double(_))
    }

    /// Scalar of a concrete numeric variant.
    #[must_use]
    pub fn concrete_scalar(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(f64::from(*v)),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Re-expresses `scalar` in this value's concrete numeric variant.
    /// Integers round half away from zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn with_scalar(&self, scalar: f64) -> Self {
        match self {
            Self::Int(_) => {
                Self::Int(scalar.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
            }
            Self::Float(_) => Self::Float(scalar as f32),
            _ => Self::Double(scalar),
        }
    }
}

/// Types that can be read out of a [`ValueData`].
pub trait FromValue: Sized {
    /// Name used in type-mismatch diagnostics.
    const TYPE_NAME: &'static str;

    /// Reads `data`, following id references through `values`.
    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self>;
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Int(v) => Some(f64::from(*v)),
            ValueData::Float(v) => Some(f64::from(*v)),
            ValueData::Double(v) => Some(*v),
            ValueData::NumberId(id) => values.try_get_number(*id),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Float(v) => Some(*v),
            other => f64::from_value(other, values).map(|v| v as f32),
        }
    }
}

impl FromValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Int(v) => Some(*v),
            other => f64::from_value(other, values)
                .map(|v| v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32),
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(data: &ValueData, _values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for Vec2 {
    const TYPE_NAME: &'static str = "Vec2";

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Vec2(v) => Some(*v),
            ValueData::NumberId(id) => values.try_get_number(*id).map(|n| Vec2::splat(n as f32)),
            _ => None,
        }
    }
}

impl FromValue for Vec4 {
    const TYPE_NAME: &'static str = "Vec4";

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Vec4(v) => Some(*v),
            ValueData::ColorId(id) => values.try_get_color(*id),
            ValueData::NumberId(id) => values.try_get_number(*id).map(|n| Vec4::splat(n as f32)),
            _ => None,
        }
    }
}

impl FromValue for TextureRef {
    const TYPE_NAME: &'static str = "TextureRef";

    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Texture(t) => Some(t.clone()),
            ValueData::TextureId(id) => values.try_get_texture(*id).cloned(),
            _ => None,
        }
    }
}

impl FromValue for FontRef {
    const TYPE_NAME: &'static str = "FontRef";

    fn from_value(data: &ValueData, values: &ValueRegistry) -> Option<Self> {
        match data {
            ValueData::Font(f) => Some(f.clone()),
            ValueData::FontId(id) => values.try_get_font(*id).cloned(),
            _ => None,
        }
    }
}

/// A property value with its assignment flags.
///
/// `is_set` separates explicit assignments from registry defaults, so a
/// merge never clobbers a set value with a default. `is_important` is the
/// priority tag honoured by [`PropertyValue::merge_with_priority`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    data: ValueData,
    is_set: bool,
    is_important: bool,
}

impl PropertyValue {
    /// An explicitly assigned, non-important value.
    #[must_use]
    pub const fn new(data: ValueData) -> Self {
        Self {
            data,
            is_set: true,
            is_important: false,
        }
    }

    /// A default-initialized value (`is_set == false`).
    #[must_use]
    pub const fn unset(data: ValueData) -> Self {
        Self {
            data,
            is_set: false,
            is_important: false,
        }
    }

    /// Returns this value tagged important.
    #[must_use]
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }

    /// Returns this value with the given importance.
    #[must_use]
    pub fn with_importance(mut self, important: bool) -> Self {
        self.is_important = important;
        self
    }

    /// Payload.
    #[must_use]
    pub fn data(&self) -> &ValueData {
        &self.data
    }

    /// True when explicitly assigned.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    /// True when tagged important.
    #[must_use]
    pub fn is_important(&self) -> bool {
        self.is_important
    }

    /// Comparison class of the payload.
    #[must_use]
    pub fn class(&self) -> ValueClass {
        self.data.class()
    }

    /// True when both payloads share a comparison class.
    #[must_use]
    pub fn same_class(&self, other: &Self) -> bool {
        self.class() == other.class()
    }

    pub(crate) fn set_important_flag(&mut self, important: bool) {
        self.is_important = important;
    }

    pub(crate) fn replace_data(&mut self, data: ValueData) {
        self.data = data;
    }

    /// Clears both flags, keeping the payload.
    pub fn reset(&mut self) {
        self.is_set = false;
        self.is_important = false;
    }

    /// Applies `incoming` unless it is unset, or this value is important
    /// and `incoming` is not. Returns true when applied.
    pub fn merge_with_priority(&mut self, incoming: &Self) -> bool {
        if !incoming.is_set || (self.is_important && !incoming.is_important) {
            return false;
        }
        self.clone_from(incoming);
        true
    }

    /// Reads the payload as `T`, following id references.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::TypeMismatch`] when the payload cannot be read as
    /// `T` (including dangling ids).
    pub fn try_get<T: FromValue>(&self, values: &ValueRegistry) -> UiResult<T> {
        T::from_value(&self.data, values).ok_or(UiError::TypeMismatch {
            expected: T::TYPE_NAME,
            got: self.class(),
        })
    }

    /// Blends `start` toward `end` at normalized time `t`.
    ///
    /// `t` is clamped to `[0, 1]` and shaped by `easing`. Scalars, vectors
    /// and colors blend linearly; flags, textures and fonts step at `t == 1`.
    #[must_use]
    pub fn interpolate(
        start: &Self,
        end: &Self,
        t: f32,
        easing: Easing,
        values: &ValueRegistry,
    ) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        if start.is_important || !end.is_set {
            return start.clone();
        }
        if !start.same_class(end) {
            diagnose(&UiError::InterpolationMismatch {
                from: start.class(),
                to: end.class(),
            });
            return if t < 1.0 { start.clone() } else { end.clone() };
        }
        if t <= 0.0 {
            return start.clone();
        }
        if t >= 1.0 {
            return end.clone();
        }

        let eased = easing.apply(t);
        let data = match end.class() {
            ValueClass::Numeric => {
                match (f64::from_value(&start.data, values), f64::from_value(&end.data, values)) {
                    (Some(a), Some(b)) => {
                        let eased = f64::from(eased);
                        let scalar = a * (1.0 - eased) + b * eased;
                        numeric_result(&start.data, &end.data, scalar)
                    }
                    _ => start.data.clone(),
                }
            }
            ValueClass::Vec2 => {
                match (Vec2::from_value(&start.data, values), Vec2::from_value(&end.data, values)) {
                    (Some(a), Some(b)) => ValueData::Vec2(a.lerp(b, eased)),
                    _ => start.data.clone(),
                }
            }
            ValueClass::Vec4 => {
                match (Vec4::from_value(&start.data, values), Vec4::from_value(&end.data, values)) {
                    (Some(a), Some(b)) => ValueData::Vec4(a.lerp(b, eased)),
                    _ => start.data.clone(),
                }
            }
            ValueClass::Bool | ValueClass::Texture | ValueClass::Font => start.data.clone(),
        };

        Self {
            data,
            is_set: true,
            is_important: end.is_important,
        }
    }
}

/// Writes a numeric blend back as the end's concrete variant when it has
/// one, else the start's, else as a double.
fn numeric_result(start: &ValueData, end: &ValueData, scalar: f64) -> ValueData {
    if end.is_concrete_numeric() {
        end.with_scalar(scalar)
    } else if start.is_concrete_numeric() {
        start.with_scalar(scalar)
    } else {
        ValueData::Double(scalar)
    }
}

macro_rules! impl_from_payload {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    Self::new(ValueData::$variant(value))
                }
            }

            impl IntoValues for $ty {
                fn into_values(self) -> Vec<PropertyValue> {
                    vec![self.into()]
                }
            }
        )+
    };
}

impl_from_payload!(
    i32 => Int,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    Vec2 => Vec2,
    Vec4 => Vec4,
    TextureRef => Texture,
    FontRef => Font,
    ColorId => ColorId,
    FontId => FontId,
    TextureId => TextureId,
    NumberId => NumberId,
);

impl From<ValueData> for PropertyValue {
    fn from(data: ValueData) -> Self {
        Self::new(data)
    }
}

/// One value or a tuple of values handed to a property setter.
///
/// Concrete properties take exactly one value; composite properties take
/// one per sub-property, in declaration order.
pub trait IntoValues {
    /// Flattens into an ordered value list.
    fn into_values(self) -> Vec<PropertyValue>;
}

impl IntoValues for PropertyValue {
    fn into_values(self) -> Vec<PropertyValue> {
        vec![self]
    }
}

impl IntoValues for ValueData {
    fn into_values(self) -> Vec<PropertyValue> {
        vec![PropertyValue::new(self)]
    }
}

impl IntoValues for Vec<PropertyValue> {
    fn into_values(self) -> Vec<PropertyValue> {
        self
    }
}

impl<T: Into<PropertyValue>, const N: usize> IntoValues for [T; N] {
    fn into_values(self) -> Vec<PropertyValue> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! impl_tuple_values {
    ($($name:ident),+) => {
        impl<$($name: Into<PropertyValue>),+> IntoValues for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<PropertyValue> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_tuple_values!(A, B);
impl_tuple_values!(A, B, C);
impl_tuple_values!(A, B, C, D);
