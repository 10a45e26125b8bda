use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

use crate::deserialize::{EnumType, EnumValue, Value, ValueType};

mod dynamic;
mod slot;

pub use dynamic::DynamicInstance;
pub use slot::*;

/// A failure to assign a value onto an instance property.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlotError {
    /// The instance has no property of this name.
    #[error("No property '{0}'.")]
    Missing(String),

    /// The value does not satisfy the property's type.
    #[error("Expected {expected}, found {actual}.")]
    Mismatch {
        /// The property (or element) type.
        expected: String,
        /// The type of the offending value.
        actual: String,
    },
}

/// Late-bound, named access to the properties of a deserialization target.
///
/// Typically implemented via `#[derive(Instance)]`, or by using a [`DynamicInstance`].
pub trait Instance: Any {
    /// The name of the instance's type.
    fn type_name(&self) -> &str;

    /// Whether the instance has a settable property `name`.
    fn has_name(&self, name: &str) -> bool;

    /// The declared type of the property `name`.
    fn value_type(&self, name: &str) -> Option<ValueType>;

    /// The current value of the property `name`, if it has one.
    fn get_value(&self, name: &str) -> Option<Value>;

    /// Assign `value` to the property `name`.
    ///
    /// Scalars are overwritten, while collections accumulate.
    fn set_value(&mut self, name: &str, value: Value) -> Result<(), SlotError>;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Instance {
    /// Borrow the concrete instance.
    pub fn downcast_ref<T: Instance>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the concrete instance.
    pub fn downcast_mut<T: Instance>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Produces a fresh instance for a command's group of tokens.
pub type InstanceFactory = Arc<dyn Fn() -> Box<dyn Instance> + Send + Sync>;

/// A unit enum whose variants may be parsed from the command line.
///
/// Typically implemented via `#[derive(ValueEnum)]`.
pub trait ValueEnum: Sized {
    /// The descriptor of this enum.
    fn enum_type() -> EnumType;

    /// The variant at `index` (in declaration order).
    fn from_index(index: usize) -> Option<Self>;

    /// The index of this variant.
    fn index(&self) -> usize;
}

#[doc(hidden)]
pub fn enum_from_value<E: ValueEnum>(value: Value) -> Result<E, Value> {
    if let Value::Enum(v) = &value {
        if v.enum_type() == &E::enum_type() {
            if let Some(variant) = E::from_index(v.index()) {
                return Ok(variant);
            }
        }
    }

    Err(value)
}

#[doc(hidden)]
pub fn enum_to_value<E: ValueEnum>(variant: &E) -> Value {
    Value::Enum(EnumValue::new(E::enum_type(), variant.index()))
}

/// A user type built from raw strings, rather than parsed by a strategy.
///
/// Hook the type into deserialization with [`constructible!`](crate::constructible).
pub trait Constructible: Sized + Clone + Send + Sync + 'static {
    /// The type name used in messages.
    const NAME: &'static str;

    /// The number of strings `construct` expects, or `None` to accept any number of them.
    const ARITY: Option<usize>;

    /// Build the value.
    fn construct(values: &[String]) -> Result<Self, String>;
}

/// Implement [`ScalarSlot`] and [`Slot`] for a [`Constructible`] type.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{constructible, Constructible, ScalarSlot, ScalarType};
///
/// #[derive(Clone)]
/// struct Point(i32, i32);
///
/// impl Constructible for Point {
///     const NAME: &'static str = "Point";
///     const ARITY: Option<usize> = Some(2);
///
///     fn construct(values: &[String]) -> Result<Self, String> {
///         let x = values[0].parse().map_err(|e| format!("{e}"))?;
///         let y = values[1].parse().map_err(|e| format!("{e}"))?;
///         Ok(Point(x, y))
///     }
/// }
///
/// constructible!(Point);
///
/// let constructor = Point::scalar_type().constructor().copied().unwrap();
/// assert!(constructor.accepts(2));
/// assert!(!constructor.accepts(1));
/// ```
#[macro_export]
macro_rules! constructible {
    ($ty:ty) => {
        impl $crate::ScalarSlot for $ty {
            fn scalar_type() -> $crate::ScalarType {
                fn construct(values: &[String]) -> Result<$crate::Value, String> {
                    <$ty as $crate::Constructible>::construct(values)
                        .map(|v| $crate::Value::custom(<$ty as $crate::Constructible>::NAME, v))
                }

                let constructor = match <$ty as $crate::Constructible>::ARITY {
                    Some(arity) => $crate::Constructor::Exact(arity, construct),
                    None => $crate::Constructor::List(construct),
                };

                $crate::ScalarType::Custom($crate::CustomType::of::<$ty>(
                    <$ty as $crate::Constructible>::NAME,
                    Some(constructor),
                ))
            }

            fn from_value(value: $crate::Value) -> Result<Self, $crate::Value> {
                value.into_custom::<$ty>()
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::custom(<$ty as $crate::Constructible>::NAME, self.clone())
            }
        }

        impl $crate::Slot for $ty {
            fn value_type() -> $crate::ValueType {
                $crate::ValueType::Scalar(<$ty as $crate::ScalarSlot>::scalar_type())
            }

            fn get(&self) -> Option<$crate::Value> {
                $crate::scalar_get(self)
            }

            fn set(&mut self, value: $crate::Value) -> Result<(), $crate::SlotError> {
                $crate::scalar_set(self, value)
            }
        }
    };
}
