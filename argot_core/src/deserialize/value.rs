use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// Builds a custom value directly from raw strings.
#[derive(Debug, Clone, Copy)]
pub enum Constructor {
    /// Accepts precisely `arity` strings.
    Exact(usize, fn(&[String]) -> Result<Value, String>),
    /// Accepts any number of strings.
    List(fn(&[String]) -> Result<Value, String>),
}

impl Constructor {
    /// Whether this constructor accepts `count` strings.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Constructor::Exact(arity, _) => *arity == count,
            Constructor::List(_) => true,
        }
    }

    /// Invoke the constructor.
    pub fn construct(&self, values: &[String]) -> Result<Value, String> {
        match self {
            Constructor::Exact(_, construct) | Constructor::List(construct) => construct(values),
        }
    }
}

/// The descriptor of a user enum, as produced by `#[derive(ValueEnum)]`.
#[derive(Debug, Clone, Copy)]
pub struct EnumType {
    name: &'static str,
    type_id: TypeId,
    variants: &'static [&'static str],
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EnumType {}

impl EnumType {
    /// Describe the enum `E`, named `name`, with the Cli spellings of its `variants` (in declaration order).
    pub fn of<E: Any>(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self {
            name,
            type_id: TypeId::of::<E>(),
            variants,
        }
    }

    /// The enum name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The variant spellings.
    pub fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Resolve `value` (case-insensitively) to a variant index.
    pub fn parse(&self, value: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|variant| variant.eq_ignore_ascii_case(value))
    }
}

/// The descriptor of a user type which is not one of the built-in scalars.
#[derive(Debug, Clone, Copy)]
pub struct CustomType {
    name: &'static str,
    type_id: TypeId,
    constructor: Option<Constructor>,
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CustomType {}

impl CustomType {
    /// Describe the type `T`.
    pub fn of<T: Any>(name: &'static str, constructor: Option<Constructor>) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            constructor,
        }
    }

    /// The type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this describes `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// The constructor, if any.
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

/// A single (non-collection) deserialization target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ScalarType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    /// A fixed-point decimal, free of binary rounding.
    Decimal,
    String,
    /// Any value, kept as its raw string.
    Object,
    /// A date-time with a UTC offset.
    DateTime,
    NaiveDateTime,
    Date,
    Time,
    Enum(EnumType),
    Custom(CustomType),
}

impl ScalarType {
    /// A human readable type name.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Char => "char",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::I128 => "i128",
            ScalarType::Isize => "isize",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::U128 => "u128",
            ScalarType::Usize => "usize",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Decimal => "Decimal",
            ScalarType::String => "String",
            ScalarType::Object => "object",
            ScalarType::DateTime => "DateTime",
            ScalarType::NaiveDateTime => "NaiveDateTime",
            ScalarType::Date => "NaiveDate",
            ScalarType::Time => "NaiveTime",
            ScalarType::Enum(enum_type) => enum_type.name(),
            ScalarType::Custom(custom_type) => custom_type.name(),
        }
    }

    /// Whether this is one of the integer types.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::I8
                | ScalarType::I16
                | ScalarType::I32
                | ScalarType::I64
                | ScalarType::I128
                | ScalarType::Isize
                | ScalarType::U8
                | ScalarType::U16
                | ScalarType::U32
                | ScalarType::U64
                | ScalarType::U128
                | ScalarType::Usize
        )
    }

    /// The constructor of a custom type.
    pub fn constructor(&self) -> Option<&Constructor> {
        match self {
            ScalarType::Custom(custom_type) => custom_type.constructor(),
            _ => None,
        }
    }
}

/// The supported container shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// A fixed size array (`Box<[T]>`).
    Array,
    /// `Vec<T>`.
    List,
    /// `LinkedList<T>`.
    LinkedList,
    /// `VecDeque<T>`, first in first out.
    Queue,
    /// [`Stack<T>`](crate::Stack), last in first out.
    Stack,
    /// `HashSet<T>`.
    HashSet,
    /// `BTreeSet<T>`.
    SortedSet,
}

impl CollectionKind {
    /// A human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Array => "Box<[_]>",
            CollectionKind::List => "Vec",
            CollectionKind::LinkedList => "LinkedList",
            CollectionKind::Queue => "VecDeque",
            CollectionKind::Stack => "Stack",
            CollectionKind::HashSet => "HashSet",
            CollectionKind::SortedSet => "BTreeSet",
        }
    }

    /// Add `item` to `items` with this container's insertion semantics.
    pub fn insert(&self, items: &mut Vec<Value>, item: Value) {
        match self {
            CollectionKind::Stack => items.insert(0, item),
            CollectionKind::HashSet => {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
            CollectionKind::SortedSet => {
                if !items.contains(&item) {
                    let index = items
                        .iter()
                        .position(|existing| item.compare(existing) == Some(Ordering::Less))
                        .unwrap_or(items.len());
                    items.insert(index, item);
                }
            }
            CollectionKind::Array
            | CollectionKind::List
            | CollectionKind::LinkedList
            | CollectionKind::Queue => items.push(item),
        }
    }
}

/// The declared type of an instance property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// A required scalar (ex: `u32`).
    Scalar(ScalarType),
    /// An optional scalar (ex: `Option<u32>`).
    Optional(ScalarType),
    /// A container of scalars (ex: `Vec<u32>`).
    Collection(CollectionKind, ScalarType),
}

impl ValueType {
    /// The scalar (or element) type.
    pub fn scalar(&self) -> &ScalarType {
        match self {
            ValueType::Scalar(scalar)
            | ValueType::Optional(scalar)
            | ValueType::Collection(_, scalar) => scalar,
        }
    }

    /// Whether this is a container.
    pub fn is_collection(&self) -> bool {
        matches!(self, ValueType::Collection(..))
    }

    /// A human readable type name.
    pub fn name(&self) -> String {
        match self {
            ValueType::Scalar(scalar) => scalar.name().to_string(),
            ValueType::Optional(scalar) => format!("Option<{}>", scalar.name()),
            ValueType::Collection(CollectionKind::Array, scalar) => {
                format!("Box<[{}]>", scalar.name())
            }
            ValueType::Collection(kind, scalar) => format!("{}<{}>", kind.name(), scalar.name()),
        }
    }
}

/// A variant of a user enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    enum_type: EnumType,
    index: usize,
}

impl EnumValue {
    /// The variant at `index` of `enum_type`.
    pub fn new(enum_type: EnumType, index: usize) -> Self {
        Self { enum_type, index }
    }

    /// The enum descriptor.
    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    /// The variant index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The variant spelling.
    pub fn name(&self) -> &'static str {
        self.enum_type.variants()[self.index]
    }
}

/// A user value, held behind a shared pointer.
#[derive(Clone)]
pub struct CustomValue {
    name: &'static str,
    type_id: TypeId,
    value: Arc<dyn Any + Send + Sync>,
}

impl std::fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomValue({})", self.name)
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl CustomValue {
    /// The type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Borrow the value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

/// A dynamically typed, deserialized value.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Value {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    String(String),
    Object(String),
    DateTime(DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Enum(EnumValue),
    Custom(CustomValue),
    /// The elements of a container.
    ///
    /// Converted values hold their elements in argument order; the container's insertion semantics apply on assignment.
    Collection(CollectionKind, Vec<Value>),
    /// Raw strings which no strategy could convert.
    /// These never satisfy a type check.
    Unconverted(Vec<String>),
}

macro_rules! integer_conversions {
    ($( $variant:ident: $ty:ty ),*) => {
        impl Value {
            /// The integer value, widened.
            pub fn as_i128(&self) -> Option<i128> {
                match self {
                    $( Value::$variant(v) => i128::try_from(*v).ok(), )*
                    _ => None,
                }
            }

            /// Narrow `n` into the integer type `scalar`.
            pub fn from_i128(scalar: &ScalarType, n: i128) -> Option<Value> {
                match scalar {
                    $( ScalarType::$variant => <$ty>::try_from(n).ok().map(Value::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

integer_conversions!(
    I8: i8,
    I16: i16,
    I32: i32,
    I64: i64,
    I128: i128,
    Isize: isize,
    U8: u8,
    U16: u16,
    U32: u32,
    U64: u64,
    U128: u128,
    Usize: usize
);

impl Value {
    /// Wrap a user value.
    pub fn custom<T: Any + Send + Sync>(name: &'static str, value: T) -> Self {
        Value::Custom(CustomValue {
            name,
            type_id: TypeId::of::<T>(),
            value: Arc::new(value),
        })
    }

    /// A human readable name of this value's type.
    pub fn type_name(&self) -> String {
        match self {
            Value::Bool(_) => ScalarType::Bool.name().to_string(),
            Value::Char(_) => ScalarType::Char.name().to_string(),
            Value::I8(_) => ScalarType::I8.name().to_string(),
            Value::I16(_) => ScalarType::I16.name().to_string(),
            Value::I32(_) => ScalarType::I32.name().to_string(),
            Value::I64(_) => ScalarType::I64.name().to_string(),
            Value::I128(_) => ScalarType::I128.name().to_string(),
            Value::Isize(_) => ScalarType::Isize.name().to_string(),
            Value::U8(_) => ScalarType::U8.name().to_string(),
            Value::U16(_) => ScalarType::U16.name().to_string(),
            Value::U32(_) => ScalarType::U32.name().to_string(),
            Value::U64(_) => ScalarType::U64.name().to_string(),
            Value::U128(_) => ScalarType::U128.name().to_string(),
            Value::Usize(_) => ScalarType::Usize.name().to_string(),
            Value::F32(_) => ScalarType::F32.name().to_string(),
            Value::F64(_) => ScalarType::F64.name().to_string(),
            Value::Decimal(_) => ScalarType::Decimal.name().to_string(),
            Value::String(_) => ScalarType::String.name().to_string(),
            Value::Object(_) => ScalarType::Object.name().to_string(),
            Value::DateTime(_) => ScalarType::DateTime.name().to_string(),
            Value::NaiveDateTime(_) => ScalarType::NaiveDateTime.name().to_string(),
            Value::Date(_) => ScalarType::Date.name().to_string(),
            Value::Time(_) => ScalarType::Time.name().to_string(),
            Value::Enum(v) => v.enum_type().name().to_string(),
            Value::Custom(v) => v.name().to_string(),
            Value::Collection(kind, items) => match items.first() {
                Some(item) => format!("{}<{}>", kind.name(), item.type_name()),
                None => format!("{}<_>", kind.name()),
            },
            Value::Unconverted(_) => "unconverted".to_string(),
        }
    }

    /// Whether this value is an instance of `scalar`.
    pub fn conforms_to(&self, scalar: &ScalarType) -> bool {
        match (self, scalar) {
            (Value::Bool(_), ScalarType::Bool)
            | (Value::Char(_), ScalarType::Char)
            | (Value::I8(_), ScalarType::I8)
            | (Value::I16(_), ScalarType::I16)
            | (Value::I32(_), ScalarType::I32)
            | (Value::I64(_), ScalarType::I64)
            | (Value::I128(_), ScalarType::I128)
            | (Value::Isize(_), ScalarType::Isize)
            | (Value::U8(_), ScalarType::U8)
            | (Value::U16(_), ScalarType::U16)
            | (Value::U32(_), ScalarType::U32)
            | (Value::U64(_), ScalarType::U64)
            | (Value::U128(_), ScalarType::U128)
            | (Value::Usize(_), ScalarType::Usize)
            | (Value::F32(_), ScalarType::F32)
            | (Value::F64(_), ScalarType::F64)
            | (Value::Decimal(_), ScalarType::Decimal)
            | (Value::String(_), ScalarType::String)
            | (Value::Object(_), ScalarType::Object)
            | (Value::String(_), ScalarType::Object)
            | (Value::DateTime(_), ScalarType::DateTime)
            | (Value::NaiveDateTime(_), ScalarType::NaiveDateTime)
            | (Value::Date(_), ScalarType::Date)
            | (Value::Time(_), ScalarType::Time) => true,
            (Value::Enum(v), ScalarType::Enum(enum_type)) => v.enum_type() == enum_type,
            (Value::Custom(v), ScalarType::Custom(custom_type)) => v.type_id == custom_type.type_id,
            _ => false,
        }
    }

    /// Order two values of the same scalar type.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if let (Some(left), Some(right)) = (self.as_i128(), other.as_i128()) {
            return Some(left.cmp(&right));
        }

        match (self, other) {
            (Value::Bool(l), Value::Bool(r)) => l.partial_cmp(r),
            (Value::Char(l), Value::Char(r)) => l.partial_cmp(r),
            (Value::F32(l), Value::F32(r)) => l.partial_cmp(r),
            (Value::F64(l), Value::F64(r)) => l.partial_cmp(r),
            (Value::Decimal(l), Value::Decimal(r)) => l.partial_cmp(r),
            (Value::String(l), Value::String(r)) | (Value::Object(l), Value::Object(r)) => {
                l.partial_cmp(r)
            }
            (Value::DateTime(l), Value::DateTime(r)) => l.partial_cmp(r),
            (Value::NaiveDateTime(l), Value::NaiveDateTime(r)) => l.partial_cmp(r),
            (Value::Date(l), Value::Date(r)) => l.partial_cmp(r),
            (Value::Time(l), Value::Time(r)) => l.partial_cmp(r),
            (Value::Enum(l), Value::Enum(r)) => l.index().partial_cmp(&r.index()),
            _ => None,
        }
    }

    /// Take the user value out, if it is a `T`.
    pub fn into_custom<T: Any + Clone>(self) -> Result<T, Value> {
        if let Value::Custom(v) = &self {
            if let Some(inner) = v.downcast_ref::<T>() {
                return Ok(inner.clone());
            }
        }

        Err(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn stack_insert() {
        let mut items = Vec::default();
        CollectionKind::Stack.insert(&mut items, Value::I32(1));
        CollectionKind::Stack.insert(&mut items, Value::I32(2));
        assert_eq!(items, vec![Value::I32(2), Value::I32(1)]);
    }

    #[test]
    fn set_insert() {
        let mut items = Vec::default();
        CollectionKind::HashSet.insert(&mut items, Value::I32(2));
        CollectionKind::HashSet.insert(&mut items, Value::I32(2));
        CollectionKind::HashSet.insert(&mut items, Value::I32(1));
        assert_eq!(items, vec![Value::I32(2), Value::I32(1)]);
    }

    #[test]
    fn sorted_set_insert() {
        let mut items = Vec::default();

        for value in ["b", "c", "a", "b"] {
            CollectionKind::SortedSet.insert(&mut items, Value::String(value.to_string()));
        }

        assert_eq!(
            items,
            vec![
                Value::String("a".to_string()),
                Value::String("b".to_string()),
                Value::String("c".to_string()),
            ]
        );
    }

    #[rstest]
    #[case(Value::I32(1), ScalarType::I32, true)]
    #[case(Value::I32(1), ScalarType::I64, false)]
    #[case(Value::String("a".to_string()), ScalarType::Object, true)]
    #[case(Value::Object("a".to_string()), ScalarType::String, false)]
    #[case(Value::Unconverted(vec!["a".to_string()]), ScalarType::String, false)]
    fn conforms_to(#[case] value: Value, #[case] scalar: ScalarType, #[case] expected: bool) {
        assert_eq!(value.conforms_to(&scalar), expected);
    }

    #[rstest]
    #[case(ScalarType::U8, 255, Some(Value::U8(255)))]
    #[case(ScalarType::U8, 256, None)]
    #[case(ScalarType::I64, -3, Some(Value::I64(-3)))]
    #[case(ScalarType::String, 1, None)]
    fn from_i128(#[case] scalar: ScalarType, #[case] n: i128, #[case] expected: Option<Value>) {
        assert_eq!(Value::from_i128(&scalar, n), expected);
    }

    #[test]
    fn enum_type() {
        struct Color;
        static VARIANTS: [&str; 2] = ["red", "green"];
        let enum_type = EnumType::of::<Color>("Color", &VARIANTS);

        assert_eq!(enum_type.parse("GREEN"), Some(1));
        assert_eq!(enum_type.parse("blue"), None);
        assert_eq!(EnumValue::new(enum_type, 0).name(), "red");
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Point(i32, i32);

    #[test]
    fn custom() {
        // Setup
        let custom_type = CustomType::of::<Point>("Point", None);
        let value = Value::custom("Point", Point(1, 2));

        // Execute & Verify
        assert!(value.conforms_to(&ScalarType::Custom(custom_type)));
        assert!(!Value::custom("Other", 1u8).conforms_to(&ScalarType::Custom(custom_type)));
        assert_eq!(value.type_name(), "Point");
        assert_eq!(value.into_custom::<Point>(), Ok(Point(1, 2)));
    }

    #[test]
    fn names() {
        assert_eq!(
            ValueType::Collection(CollectionKind::List, ScalarType::U32).name(),
            "Vec<u32>"
        );
        assert_eq!(
            ValueType::Collection(CollectionKind::Array, ScalarType::U32).name(),
            "Box<[u32]>"
        );
        assert_eq!(ValueType::Optional(ScalarType::String).name(), "Option<String>");
        assert_eq!(
            Value::Collection(CollectionKind::Queue, vec![Value::Bool(true)]).type_name(),
            "VecDeque<bool>"
        );
    }
}
