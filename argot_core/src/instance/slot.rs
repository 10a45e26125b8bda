use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::deserialize::{CollectionKind, ScalarType, Stack, Value, ValueType};
use crate::instance::SlotError;
use crate::prelude::Collectable;

/// A Rust type which maps onto a [`ScalarType`].
pub trait ScalarSlot: Sized {
    /// The descriptor of this type.
    fn scalar_type() -> ScalarType;

    /// Take the typed value out, or hand the value back when it is of another type.
    fn from_value(value: Value) -> Result<Self, Value>;

    /// Wrap this into a [`Value`].
    fn to_value(&self) -> Value;
}

/// A property type which may be the target of an assignment.
///
/// Implemented for every [`ScalarSlot`], as well as `Option` and the supported collections of them.
pub trait Slot {
    /// The declared type of this property.
    fn value_type() -> ValueType
    where
        Self: Sized;

    /// The current value.
    fn get(&self) -> Option<Value>;

    /// Assign `value`: scalars are overwritten, while collections accumulate.
    fn set(&mut self, value: Value) -> Result<(), SlotError>;
}

fn mismatch(expected: &ScalarType, actual: &Value) -> SlotError {
    SlotError::Mismatch {
        expected: expected.name().to_string(),
        actual: actual.type_name(),
    }
}

#[doc(hidden)]
pub fn scalar_get<T: ScalarSlot>(slot: &T) -> Option<Value> {
    Some(slot.to_value())
}

#[doc(hidden)]
pub fn scalar_set<T: ScalarSlot>(slot: &mut T, value: Value) -> Result<(), SlotError> {
    *slot = T::from_value(value).map_err(|other| mismatch(&T::scalar_type(), &other))?;
    Ok(())
}

macro_rules! scalar_slot {
    ($ty:ty, $variant:ident) => {
        impl ScalarSlot for $ty {
            fn scalar_type() -> ScalarType {
                ScalarType::$variant
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }

        impl Slot for $ty {
            fn value_type() -> ValueType {
                ValueType::Scalar(ScalarType::$variant)
            }

            fn get(&self) -> Option<Value> {
                scalar_get(self)
            }

            fn set(&mut self, value: Value) -> Result<(), SlotError> {
                scalar_set(self, value)
            }
        }
    };
}

scalar_slot!(bool, Bool);
scalar_slot!(char, Char);
scalar_slot!(i8, I8);
scalar_slot!(i16, I16);
scalar_slot!(i32, I32);
scalar_slot!(i64, I64);
scalar_slot!(i128, I128);
scalar_slot!(isize, Isize);
scalar_slot!(u8, U8);
scalar_slot!(u16, U16);
scalar_slot!(u32, U32);
scalar_slot!(u64, U64);
scalar_slot!(u128, U128);
scalar_slot!(usize, Usize);
scalar_slot!(f32, F32);
scalar_slot!(f64, F64);
scalar_slot!(Decimal, Decimal);
scalar_slot!(String, String);
scalar_slot!(DateTime<FixedOffset>, DateTime);
scalar_slot!(NaiveDateTime, NaiveDateTime);
scalar_slot!(NaiveDate, Date);
scalar_slot!(NaiveTime, Time);

impl<T: ScalarSlot> Slot for Option<T> {
    fn value_type() -> ValueType {
        ValueType::Optional(T::scalar_type())
    }

    fn get(&self) -> Option<Value> {
        self.as_ref().map(ScalarSlot::to_value)
    }

    fn set(&mut self, value: Value) -> Result<(), SlotError> {
        let inner = T::from_value(value).map_err(|other| mismatch(&T::scalar_type(), &other))?;
        self.replace(inner);
        Ok(())
    }
}

fn collection_set<C, T>(collection: &mut C, value: Value) -> Result<(), SlotError>
where
    C: Collectable<T>,
    T: ScalarSlot,
{
    let items = match value {
        Value::Collection(_, items) => items,
        single => vec![single],
    };

    // All the elements are checked before any of them are added.
    let mut converted = Vec::with_capacity(items.len());

    for item in items {
        converted.push(T::from_value(item).map_err(|other| mismatch(&T::scalar_type(), &other))?);
    }

    for item in converted {
        collection.add(item);
    }

    Ok(())
}

macro_rules! collection_slot {
    ($collection:ident, $kind:ident $(, $bound:path)*) => {
        impl<T: ScalarSlot $(+ $bound)*> Slot for $collection<T> {
            fn value_type() -> ValueType {
                ValueType::Collection(CollectionKind::$kind, T::scalar_type())
            }

            fn get(&self) -> Option<Value> {
                Some(Value::Collection(
                    CollectionKind::$kind,
                    self.iter().map(ScalarSlot::to_value).collect(),
                ))
            }

            fn set(&mut self, value: Value) -> Result<(), SlotError> {
                collection_set(self, value)
            }
        }
    };
}

collection_slot!(Vec, List);
collection_slot!(VecDeque, Queue);
collection_slot!(LinkedList, LinkedList);
collection_slot!(Stack, Stack);
collection_slot!(HashSet, HashSet, Eq, std::hash::Hash);
collection_slot!(BTreeSet, SortedSet, Ord);

impl<T: ScalarSlot> Slot for Box<[T]> {
    fn value_type() -> ValueType {
        ValueType::Collection(CollectionKind::Array, T::scalar_type())
    }

    fn get(&self) -> Option<Value> {
        Some(Value::Collection(
            CollectionKind::Array,
            self.iter().map(ScalarSlot::to_value).collect(),
        ))
    }

    fn set(&mut self, value: Value) -> Result<(), SlotError> {
        collection_set(self, value)
    }
}
