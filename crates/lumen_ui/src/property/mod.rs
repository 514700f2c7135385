//! Property catalog and property values.
//!
//! Every styleable attribute is a [`PropertyId`] registered in the global
//! [`PropertyRegistry`]. Concrete properties carry a default value and a
//! [`ValueClass`]; composite properties fan out to an ordered list of
//! concrete ones on assignment.

mod registry;
mod value;

pub mod props;

pub use registry::{
    property_registry, DescriptorKind, PropertyDescriptor, PropertyId, PropertyRegistry,
};
pub use value::{FromValue, IntoValues, PropertyValue, ValueClass, ValueData};

/// Declares a fieldless enum stored in property values as an integer.
///
/// Generates the enum, raw conversions, `From<Enum> for PropertyValue`,
/// [`FromValue`] and [`IntoValues`].
macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $raw:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Integer stored in property values.
            #[must_use]
            pub const fn to_raw(self) -> i32 {
                match self {
                    $( Self::$variant => $raw ),+
                }
            }

            /// Parses the integer stored in property values.
            #[must_use]
            pub const fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $( $raw => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for $crate::property::PropertyValue {
            fn from(value: $name) -> Self {
                Self::new($crate::property::ValueData::Int(value.to_raw()))
            }
        }

        impl $crate::property::FromValue for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn from_value(
                data: &$crate::property::ValueData,
                _values: &$crate::values::ValueRegistry,
            ) -> Option<Self> {
                match data {
                    $crate::property::ValueData::Int(raw) => Self::from_raw(*raw),
                    _ => None,
                }
            }
        }

        impl $crate::property::IntoValues for $name {
            fn into_values(self) -> Vec<$crate::property::PropertyValue> {
                vec![self.into()]
            }
        }
    };
}

pub(crate) use property_enum;
