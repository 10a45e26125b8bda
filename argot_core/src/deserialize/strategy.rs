use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::deserialize::{EnumValue, ScalarType, Value, ValueType};
use crate::instance::Instance;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A strategy which could not convert its input.
///
/// The registry treats this as "the strategy does not apply" and moves on to the next one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot convert '{value}' into {type_name}: {reason}")]
pub struct InvalidConversion {
    /// The raw input.
    pub value: String,
    /// The target type name.
    pub type_name: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl InvalidConversion {
    /// Describe a failure to convert `value` into `target`.
    pub fn new(value: &str, target: &ScalarType, reason: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            type_name: target.name().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Converts a single raw string into a scalar [`Value`].
pub trait Deserializer: Send + Sync {
    /// Whether this strategy handles `target`.
    fn matches_type(&self, target: &ScalarType) -> bool;

    /// Convert `value` into `target`.
    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion>;
}

/// Converts the full list of raw strings of a token at once.
///
/// These are consulted before any element-wise conversion, so they may implement custom multi-value semantics (ex: joining).
pub trait ValueListDeserializer: Send + Sync {
    /// Whether this strategy handles `target`.
    fn matches_type(&self, target: &ValueType) -> bool;

    /// Convert `values` into `target`.
    fn deserialize(&self, target: &ValueType, values: &[String])
        -> Result<Value, InvalidConversion>;
}

/// Intercepts the assignment of values onto instances.
pub trait ValueAggregator: Send + Sync {
    /// Whether this aggregator handles instances of `type_name`.
    fn matches_instance(&self, type_name: &str) -> bool;

    /// Assign `value` to the property `name` of `instance`.
    ///
    /// Returns `true` when the assignment was handled, or `false` to fall through to the default assignment.
    fn aggregate(&self, instance: &mut dyn Instance, name: &str, value: &Value) -> bool;
}

type Predicate = Box<dyn Fn(&ScalarType) -> bool + Send + Sync>;
type Conversion = Box<dyn Fn(&ScalarType, &str) -> Result<Value, String> + Send + Sync>;

/// A scalar strategy built from a predicate and a conversion closure.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{Deserializer, FnDeserializer, ScalarType, Value};
///
/// let hex = FnDeserializer::new(
///     |target| target == &ScalarType::U32,
///     |_, value| {
///         u32::from_str_radix(value.trim_start_matches("0x"), 16)
///             .map(Value::U32)
///             .map_err(|e| e.to_string())
///     },
/// );
///
/// assert_eq!(hex.deserialize(&ScalarType::U32, "0xff").unwrap(), Value::U32(255));
/// ```
pub struct FnDeserializer {
    predicate: Predicate,
    conversion: Conversion,
}

impl FnDeserializer {
    /// Create a strategy handling the types accepted by `predicate`, converting via `conversion`.
    pub fn new(
        predicate: impl Fn(&ScalarType) -> bool + Send + Sync + 'static,
        conversion: impl Fn(&ScalarType, &str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            conversion: Box::new(conversion),
        }
    }
}

impl Deserializer for FnDeserializer {
    fn matches_type(&self, target: &ScalarType) -> bool {
        (self.predicate)(target)
    }

    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion> {
        (self.conversion)(target, value).map_err(|reason| InvalidConversion::new(value, target, reason))
    }
}

/// Accepts `1`/`0` as well as `true`/`false` (in any case).
pub struct BoolDeserializer;

impl Deserializer for BoolDeserializer {
    fn matches_type(&self, target: &ScalarType) -> bool {
        target == &ScalarType::Bool
    }

    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion> {
        match value {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            _ if value.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            _ if value.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(InvalidConversion::new(
                value,
                target,
                "expected one of 1, 0, true, false",
            )),
        }
    }
}

/// Converts the numeric types (including [`Decimal`](rust_decimal::Decimal)) and `char` via [`FromStr`].
pub struct NumberDeserializer;

fn from_str<T>(target: &ScalarType, value: &str, wrap: fn(T) -> Value) -> Result<Value, InvalidConversion>
where
    T: FromStr,
    T::Err: ToString,
{
    T::from_str(value)
        .map(wrap)
        .map_err(|e| InvalidConversion::new(value, target, e))
}

impl Deserializer for NumberDeserializer {
    fn matches_type(&self, target: &ScalarType) -> bool {
        target.is_integer()
            || matches!(
                target,
                ScalarType::F32 | ScalarType::F64 | ScalarType::Decimal | ScalarType::Char
            )
    }

    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion> {
        match target {
            ScalarType::I8 => from_str(target, value, Value::I8),
            ScalarType::I16 => from_str(target, value, Value::I16),
            ScalarType::I32 => from_str(target, value, Value::I32),
            ScalarType::I64 => from_str(target, value, Value::I64),
            ScalarType::I128 => from_str(target, value, Value::I128),
            ScalarType::Isize => from_str(target, value, Value::Isize),
            ScalarType::U8 => from_str(target, value, Value::U8),
            ScalarType::U16 => from_str(target, value, Value::U16),
            ScalarType::U32 => from_str(target, value, Value::U32),
            ScalarType::U64 => from_str(target, value, Value::U64),
            ScalarType::U128 => from_str(target, value, Value::U128),
            ScalarType::Usize => from_str(target, value, Value::Usize),
            ScalarType::F32 => from_str(target, value, Value::F32),
            ScalarType::F64 => from_str(target, value, Value::F64),
            ScalarType::Decimal => from_str(target, value, Value::Decimal),
            ScalarType::Char => from_str(target, value, Value::Char),
            _ => unreachable!("internal error - NumberDeserializer must only receive numeric types"),
        }
    }
}

/// Identity conversions for `String` and object.
pub struct StringDeserializer;

impl Deserializer for StringDeserializer {
    fn matches_type(&self, target: &ScalarType) -> bool {
        matches!(target, ScalarType::String | ScalarType::Object)
    }

    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion> {
        match target {
            ScalarType::Object => Ok(Value::Object(value.to_string())),
            _ => Ok(Value::String(value.to_string())),
        }
    }
}

/// Case-insensitive parse of a variant name.
pub struct EnumDeserializer;

impl Deserializer for EnumDeserializer {
    fn matches_type(&self, target: &ScalarType) -> bool {
        matches!(target, ScalarType::Enum(_))
    }

    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion> {
        match target {
            ScalarType::Enum(enum_type) => match enum_type.parse(value) {
                Some(index) => Ok(Value::Enum(EnumValue::new(*enum_type, index))),
                None => Err(InvalidConversion::new(
                    value,
                    target,
                    format!("expected one of {}", enum_type.variants().join(", ")),
                )),
            },
            _ => unreachable!("internal error - EnumDeserializer must only receive enum types"),
        }
    }
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Date and time conversions via [`chrono`].
///
/// Date-times with an offset accept RFC 3339 and RFC 2822.
/// Naive date-times accept `T` or space separated ISO 8601 forms, as well as a bare date (at midnight).
pub struct DateTimeDeserializer;

impl DateTimeDeserializer {
    fn naive_date_time(value: &str) -> Option<NaiveDateTime> {
        NAIVE_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| Self::date(value).and_then(|date| date.and_hms_opt(0, 0, 0)))
    }

    fn date(value: &str) -> Option<NaiveDate> {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    }
}

impl Deserializer for DateTimeDeserializer {
    fn matches_type(&self, target: &ScalarType) -> bool {
        matches!(
            target,
            ScalarType::DateTime | ScalarType::NaiveDateTime | ScalarType::Date | ScalarType::Time
        )
    }

    fn deserialize(&self, target: &ScalarType, value: &str) -> Result<Value, InvalidConversion> {
        let result = match target {
            ScalarType::DateTime => DateTime::parse_from_rfc3339(value)
                .or_else(|_| DateTime::parse_from_rfc2822(value))
                .ok()
                .or_else(|| {
                    DATE_TIME_FORMATS
                        .iter()
                        .find_map(|format| DateTime::parse_from_str(value, format).ok())
                })
                .map(Value::DateTime),
            ScalarType::NaiveDateTime => Self::naive_date_time(value).map(Value::NaiveDateTime),
            ScalarType::Date => Self::date(value).map(Value::Date),
            ScalarType::Time => TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
                .map(Value::Time),
            _ => unreachable!("internal error - DateTimeDeserializer must only receive date/time types"),
        };

        result.ok_or_else(|| InvalidConversion::new(value, target, "unrecognized format"))
    }
}

/// The ordered strategies used during deserialization.
///
/// Lookup is first-match-wins: caller strategies are consulted in registration order, followed by the built-ins.
/// A strategy which fails to convert its input is skipped in favour of the next one.
pub struct DeserializerRegistry {
    deserializers: Vec<Box<dyn Deserializer>>,
    list_deserializers: Vec<Box<dyn ValueListDeserializer>>,
    aggregators: Vec<Box<dyn ValueAggregator>>,
    builtins: Vec<Box<dyn Deserializer>>,
}

impl Default for DeserializerRegistry {
    fn default() -> Self {
        Self {
            deserializers: Vec::default(),
            list_deserializers: Vec::default(),
            aggregators: Vec::default(),
            builtins: vec![
                Box::new(BoolDeserializer),
                Box::new(NumberDeserializer),
                Box::new(StringDeserializer),
                Box::new(EnumDeserializer),
                Box::new(DateTimeDeserializer),
            ],
        }
    }
}

impl std::fmt::Debug for DeserializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeserializerRegistry")
            .field("deserializers", &self.deserializers.len())
            .field("list_deserializers", &self.list_deserializers.len())
            .field("aggregators", &self.aggregators.len())
            .finish()
    }
}

impl DeserializerRegistry {
    /// Register a scalar strategy, ahead of the built-ins.
    pub fn add_deserializer(&mut self, deserializer: impl Deserializer + 'static) {
        self.deserializers.push(Box::new(deserializer));
    }

    /// Register a value-list strategy.
    pub fn add_list_deserializer(&mut self, deserializer: impl ValueListDeserializer + 'static) {
        self.list_deserializers.push(Box::new(deserializer));
    }

    /// Register an assignment aggregator.
    pub fn add_aggregator(&mut self, aggregator: impl ValueAggregator + 'static) {
        self.aggregators.push(Box::new(aggregator));
    }

    /// Convert `value` with the first matching strategy that succeeds.
    ///
    /// Returns `Ok(None)` when no strategy matches `target`, or the last failure when every matching strategy failed.
    pub fn deserialize(
        &self,
        target: &ScalarType,
        value: &str,
    ) -> Result<Option<Value>, InvalidConversion> {
        let mut failure = None;

        for deserializer in self.deserializers.iter().chain(self.builtins.iter()) {
            if !deserializer.matches_type(target) {
                continue;
            }

            match deserializer.deserialize(target, value) {
                Ok(converted) => return Ok(Some(converted)),
                Err(error) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Strategy fall-through: {error}");
                    }

                    failure.replace(error);
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }

    /// Convert `values` with the first matching list strategy that succeeds.
    pub fn deserialize_list(&self, target: &ValueType, values: &[String]) -> Option<Value> {
        self.list_deserializers
            .iter()
            .filter(|deserializer| deserializer.matches_type(target))
            .find_map(|deserializer| match deserializer.deserialize(target, values) {
                Ok(converted) => Some(converted),
                Err(_error) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("List strategy fall-through: {_error}");
                    }

                    None
                }
            })
    }

    /// Offer the assignment to each matching aggregator, until one handles it.
    pub fn aggregate(&self, instance: &mut dyn Instance, name: &str, value: &Value) -> bool {
        let type_name = instance.type_name().to_string();

        for aggregator in &self.aggregators {
            if aggregator.matches_instance(&type_name) && aggregator.aggregate(instance, name, value)
            {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Aggregator intercepted the assignment of '{name}' on '{type_name}'.");
                }

                return true;
            }
        }

        false
    }
}
