use std::any::Any;
use std::collections::BTreeMap;

use crate::deserialize::{CollectionKind, ScalarType, Value, ValueType};
use crate::instance::{Instance, SlotError};
use crate::model::Scope;

#[derive(Debug, Clone)]
struct DynamicSlot {
    value_type: ValueType,
    value: Option<Value>,
}

/// An [`Instance`] backed by a dictionary of typed slots.
///
/// Useful when there is no Rust struct to deserialize into.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{CollectionKind, DynamicInstance, Instance, ScalarType, Value, ValueType};
///
/// let mut instance = DynamicInstance::new("Args")
///     .slot("Verbose", ValueType::Scalar(ScalarType::Bool))
///     .slot("Paths", ValueType::Collection(CollectionKind::List, ScalarType::String));
///
/// instance.set_value("Verbose", Value::Bool(true)).unwrap();
/// instance.set_value("Paths", Value::String("a".to_string())).unwrap();
/// instance.set_value("Paths", Value::String("b".to_string())).unwrap();
///
/// assert_eq!(instance.get("Verbose"), Some(&Value::Bool(true)));
/// assert_eq!(instance.strings("Paths"), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct DynamicInstance {
    type_name: String,
    slots: BTreeMap<String, DynamicSlot>,
}

impl DynamicInstance {
    /// Create an instance with no slots.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: BTreeMap::default(),
        }
    }

    /// Declare the slot `name` of type `value_type`.
    pub fn slot(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.slots.insert(
            name.into(),
            DynamicSlot {
                value_type,
                value: None,
            },
        );
        self
    }

    /// Infer string-typed slots from the declarations of a scope.
    ///
    /// * switches and options without values map to `bool`,
    /// * counters map to `i64`,
    /// * options accepting at most one value, and single-position values, map to `Option<String>`,
    /// * everything else maps to `Vec<String>`.
    pub fn for_scope(type_name: impl Into<String>, scope: &Scope) -> Self {
        let mut instance = Self::new(type_name);

        for option in scope.options() {
            let value_type = if option.is_counter() {
                ValueType::Scalar(ScalarType::I64)
            } else if option.is_switch() || !option.expected_range().takes_values() {
                ValueType::Scalar(ScalarType::Bool)
            } else if option.expected_range().max() == Some(1) {
                ValueType::Optional(ScalarType::String)
            } else {
                ValueType::Collection(CollectionKind::List, ScalarType::String)
            };
            instance = instance.slot(option.name(), value_type);
        }

        for value in scope.values() {
            let value_type = if value.end_index() == Some(value.start_index()) {
                ValueType::Optional(ScalarType::String)
            } else {
                ValueType::Collection(CollectionKind::List, ScalarType::String)
            };
            instance = instance.slot(value.name(), value_type);
        }

        instance
    }

    /// The current value of the slot `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).and_then(|slot| slot.value.as_ref())
    }

    /// The string (or strings) held by the slot `name`.
    pub fn strings(&self, name: &str) -> Vec<&str> {
        fn as_str(value: &Value) -> Option<&str> {
            match value {
                Value::String(s) | Value::Object(s) => Some(s.as_str()),
                _ => None,
            }
        }

        match self.get(name) {
            Some(Value::Collection(_, items)) => items.iter().filter_map(as_str).collect(),
            Some(value) => as_str(value).into_iter().collect(),
            None => Vec::default(),
        }
    }

    /// The names of the slots, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}

fn check(scalar: &ScalarType, value: &Value) -> Result<(), SlotError> {
    if value.conforms_to(scalar) {
        Ok(())
    } else {
        Err(SlotError::Mismatch {
            expected: scalar.name().to_string(),
            actual: value.type_name(),
        })
    }
}

impl Instance for DynamicInstance {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn has_name(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    fn value_type(&self, name: &str) -> Option<ValueType> {
        self.slots.get(name).map(|slot| slot.value_type)
    }

    fn get_value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), SlotError> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| SlotError::Missing(name.to_string()))?;

        match slot.value_type {
            ValueType::Scalar(scalar) | ValueType::Optional(scalar) => {
                check(&scalar, &value)?;
                slot.value.replace(value);
            }
            ValueType::Collection(kind, scalar) => {
                let items = match value {
                    Value::Collection(_, items) => items,
                    single => vec![single],
                };

                for item in &items {
                    check(&scalar, item)?;
                }

                let mut existing = match slot.value.take() {
                    Some(Value::Collection(_, existing)) => existing,
                    _ => Vec::default(),
                };

                for item in items {
                    kind.insert(&mut existing, item);
                }

                slot.value.replace(Value::Collection(kind, existing));
            }
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
