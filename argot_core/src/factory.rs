use std::collections::HashSet;

use crate::deserialize::{Constructor, DeserializerRegistry, ScalarType, Value, ValueType};
use crate::error::DeserializeError;
use crate::instance::{DynamicInstance, Instance, InstanceFactory, SlotError};
use crate::model::{ParserSettings, Scope};
use crate::tokenizer::{ArgumentToken, ArgumentTokenGroup, OptionToken, ValueToken};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

struct Converted {
    value: Value,
    reason: Option<String>,
}

impl Converted {
    fn of(value: Value) -> Self {
        Self {
            value,
            reason: None,
        }
    }
}

/// The state of deserializing one group of tokens onto one instance.
///
/// Tracks the running positional index and the names which have already been assigned.
pub struct DeserializationContext<'r, 'c> {
    registry: &'r DeserializerRegistry,
    settings: &'r ParserSettings,
    scope: Scope<'c>,
    positional: usize,
    assigned: HashSet<String>,
}

impl<'r, 'c> DeserializationContext<'r, 'c> {
    /// Create a context for the declarations of `scope`.
    pub fn new(
        registry: &'r DeserializerRegistry,
        settings: &'r ParserSettings,
        scope: Scope<'c>,
    ) -> Self {
        Self {
            registry,
            settings,
            scope,
            positional: 0,
            assigned: HashSet::default(),
        }
    }

    /// Assign the value(s) of `token` onto `instance`.
    pub fn deserialize_token(
        &mut self,
        instance: &mut dyn Instance,
        token: &ArgumentToken,
    ) -> Result<(), DeserializeError> {
        match token {
            ArgumentToken::Value(value) => self.deserialize_value(instance, value),
            ArgumentToken::Option(option) => self.deserialize_option(instance, option),
        }
    }

    fn deserialize_value(
        &mut self,
        instance: &mut dyn Instance,
        token: &ValueToken,
    ) -> Result<(), DeserializeError> {
        let index = self.positional;
        self.positional += 1;

        let name = match self.scope.find_value(index) {
            Some(value) => value.name(),
            None => {
                if self.settings.throw_on_missing_property() {
                    return Err(DeserializeError::TooManyValues {
                        argument: token.argument().to_string(),
                        position: token.position(),
                    });
                }

                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Skipping '{}': no value covers index {index}.", token.argument());
                }

                return Ok(());
            }
        };

        let target = match self.target(instance, name, token.argument(), token.position())? {
            Some(target) => target,
            None => return Ok(()),
        };
        let keep_first = self.settings.keep_first_value();
        let converted = self.convert(
            &target,
            &[token.argument().to_string()],
            keep_first,
            token.argument(),
            token.position(),
        )?;
        self.assign(
            instance,
            name,
            &target,
            converted,
            keep_first,
            token.argument(),
            token.position(),
        )
    }

    fn deserialize_option(
        &mut self,
        instance: &mut dyn Instance,
        token: &OptionToken,
    ) -> Result<(), DeserializeError> {
        let option = token.option();
        let name = option.name();
        let target = match self.target(instance, name, token.argument(), token.position())? {
            Some(target) => target,
            None => return Ok(()),
        };
        let keep_first = option
            .keep_first_value_override()
            .unwrap_or(self.settings.keep_first_value());

        if !token.values().is_empty() {
            let converted = self.convert(
                &target,
                token.values(),
                keep_first,
                token.argument(),
                token.position(),
            )?;
            self.assign(
                instance,
                name,
                &target,
                converted,
                keep_first,
                token.argument(),
                token.position(),
            )
        } else if option.is_switch() {
            self.assign(
                instance,
                name,
                &target,
                Converted::of(Value::Bool(!token.is_negated())),
                keep_first,
                token.argument(),
                token.position(),
            )
        } else if option.is_counter() {
            let current = instance
                .get_value(name)
                .and_then(|value| value.as_i128())
                .unwrap_or(0);
            let next = Value::from_i128(target.scalar(), current + 1).ok_or_else(|| {
                DeserializeError::TypeMismatch {
                    argument: token.argument().to_string(),
                    position: token.position(),
                    name: name.to_string(),
                    expected: target.name(),
                    actual: "counter".to_string(),
                    reason: None,
                }
            })?;
            // Counters accumulate regardless of keep-first.
            self.assign(
                instance,
                name,
                &target,
                Converted::of(next),
                false,
                token.argument(),
                token.position(),
            )
        } else if target.scalar() == &ScalarType::Bool {
            self.assign(
                instance,
                name,
                &target,
                Converted::of(Value::Bool(!token.is_negated())),
                keep_first,
                token.argument(),
                token.position(),
            )
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Nothing to assign for '{}' onto '{name}'.", token.argument());
            }

            Ok(())
        }
    }

    fn target(
        &self,
        instance: &dyn Instance,
        name: &str,
        argument: &str,
        position: usize,
    ) -> Result<Option<ValueType>, DeserializeError> {
        match instance.value_type(name) {
            Some(target) if instance.has_name(name) => Ok(Some(target)),
            _ => {
                if self.settings.throw_on_missing_property() {
                    Err(DeserializeError::MissingProperty {
                        argument: argument.to_string(),
                        position,
                        instance: instance.type_name().to_string(),
                        name: name.to_string(),
                    })
                } else {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!(
                            "Skipping '{argument}': instance '{}' has no property '{name}'.",
                            instance.type_name()
                        );
                    }

                    Ok(None)
                }
            }
        }
    }

    fn convert(
        &self,
        target: &ValueType,
        values: &[String],
        keep_first: bool,
        argument: &str,
        position: usize,
    ) -> Result<Converted, DeserializeError> {
        if let Some(value) = self.registry.deserialize_list(target, values) {
            return Ok(Converted::of(value));
        }

        let scalar = target.scalar();
        let mut converted = Vec::with_capacity(values.len());
        let mut reason = None;

        for value in values {
            match self.registry.deserialize(scalar, value) {
                Ok(Some(v)) => converted.push(v),
                Ok(None) => break,
                Err(error) => {
                    reason.replace(error.to_string());
                    break;
                }
            }
        }

        if converted.len() == values.len() {
            let value = match target {
                ValueType::Collection(kind, _) => Value::Collection(*kind, converted),
                _ => {
                    let value = if keep_first {
                        converted.into_iter().next()
                    } else {
                        converted.into_iter().last()
                    };
                    value.expect("internal error - tokens with values must carry at least one")
                }
            };
            return Ok(Converted::of(value));
        }

        if let Some(constructor) = scalar.constructor() {
            let construct = |chunk: &[String]| {
                constructor
                    .construct(chunk)
                    .map_err(|reason| DeserializeError::Construction {
                        argument: argument.to_string(),
                        position,
                        type_name: scalar.name().to_string(),
                        reason,
                    })
            };

            match target {
                ValueType::Collection(kind, _) => {
                    let chunk_size = match constructor {
                        Constructor::Exact(arity, _) => *arity,
                        Constructor::List(_) => values.len(),
                    };

                    if chunk_size > 0 && values.len() % chunk_size == 0 {
                        let items = values
                            .chunks(chunk_size)
                            .map(construct)
                            .collect::<Result<Vec<_>, _>>()?;

                        return Ok(Converted::of(Value::Collection(*kind, items)));
                    }
                }
                _ => {
                    if constructor.accepts(values.len()) {
                        return Ok(Converted::of(construct(values)?));
                    }
                }
            }
        }

        Ok(Converted {
            value: Value::Unconverted(values.to_vec()),
            reason,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn assign(
        &mut self,
        instance: &mut dyn Instance,
        name: &str,
        target: &ValueType,
        converted: Converted,
        keep_first: bool,
        argument: &str,
        position: usize,
    ) -> Result<(), DeserializeError> {
        if self.registry.aggregate(instance, name, &converted.value) {
            self.assigned.insert(name.to_string());
            return Ok(());
        }

        if keep_first && !target.is_collection() && self.assigned.contains(name) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Keeping the first value of '{name}'; ignoring '{argument}'.");
            }

            return Ok(());
        }

        instance
            .set_value(name, converted.value)
            .map_err(|error| match error {
                SlotError::Mismatch { expected, actual } => DeserializeError::TypeMismatch {
                    argument: argument.to_string(),
                    position,
                    name: name.to_string(),
                    expected,
                    actual,
                    reason: converted.reason,
                },
                SlotError::Missing(_) => DeserializeError::MissingProperty {
                    argument: argument.to_string(),
                    position,
                    instance: instance.type_name().to_string(),
                    name: name.to_string(),
                },
            })?;
        self.assigned.insert(name.to_string());
        Ok(())
    }
}

/// Builds and populates instances from tokenized groups.
pub struct ParserInstanceFactory<'r> {
    registry: &'r DeserializerRegistry,
}

impl<'r> ParserInstanceFactory<'r> {
    /// Create a factory deserializing via `registry`.
    pub fn new(registry: &'r DeserializerRegistry) -> Self {
        Self { registry }
    }

    /// Assign every token of `group` onto `instance`.
    ///
    /// `root` is the scope of groups which did not match a command.
    pub fn populate<'c>(
        &self,
        group: &ArgumentTokenGroup<'c>,
        root: Scope<'c>,
        instance: &mut dyn Instance,
    ) -> Result<(), DeserializeError> {
        let scope = group
            .matched_command()
            .map(|command| command.scope())
            .unwrap_or(root);
        let mut context = DeserializationContext::new(self.registry, group.settings(), scope);

        for token in group.tokens() {
            context.deserialize_token(instance, token)?;
        }

        Ok(())
    }

    /// Build an instance and populate it from `group`.
    ///
    /// Without a `factory`, a [`DynamicInstance`] is inferred from the group's scope.
    /// It is named after the matched command, or `type_name` for the root group.
    pub fn create<'c>(
        &self,
        group: &ArgumentTokenGroup<'c>,
        root: Scope<'c>,
        factory: Option<&InstanceFactory>,
        type_name: &str,
    ) -> Result<Box<dyn Instance>, DeserializeError> {
        let mut instance = match (factory, group.matched_command()) {
            (Some(factory), _) => factory(),
            (None, Some(command)) => {
                Box::new(DynamicInstance::for_scope(command.name(), &command.scope()))
            }
            (None, None) => Box::new(DynamicInstance::for_scope(type_name, &root)),
        };
        self.populate(group, root, instance.as_mut())?;
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deserialize::{
        CollectionKind, FnDeserializer, InvalidConversion, Stack, ValueAggregator,
        ValueListDeserializer,
    };
    use crate::instance::{Constructible, ScalarSlot, Slot};
    use crate::model::{Command, OptionConfig, ValueConfig, ValueCountRange};
    use crate::tokenizer::Tokenizer;
    use std::any::Any;

    fn deserialize(
        options: &[OptionConfig],
        values: &[ValueConfig],
        settings: ParserSettings,
        registry: &DeserializerRegistry,
        args: &[&str],
        instance: &mut dyn Instance,
    ) -> Result<(), DeserializeError> {
        let scope = Scope::new(options, values, &[], &[]);
        let tokenized = Tokenizer::new(&settings, scope).tokenize(args).unwrap();
        ParserInstanceFactory::new(registry).populate(tokenized.root(), scope, instance)
    }

    fn strings(values: &[&str]) -> Value {
        Value::Collection(
            CollectionKind::List,
            values.iter().map(|v| Value::String(v.to_string())).collect(),
        )
    }

    #[test]
    fn end_to_end() {
        // Setup
        let options = vec![OptionConfig::new("Name")
            .long("name")
            .values(ValueCountRange::exactly(1))];
        let values = vec![ValueConfig::at("File", 0), ValueConfig::at("Number", 1)];
        let mut instance = DynamicInstance::new("Args")
            .slot("Name", ValueType::Scalar(ScalarType::String))
            .slot("File", ValueType::Scalar(ScalarType::String))
            .slot("Number", ValueType::Scalar(ScalarType::I32));

        // Execute
        deserialize(
            &options,
            &values,
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["--name", "John", "output.txt", "3"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("Name"), Some(&Value::String("John".to_string())));
        assert_eq!(
            instance.get("File"),
            Some(&Value::String("output.txt".to_string()))
        );
        assert_eq!(instance.get("Number"), Some(&Value::I32(3)));
    }

    #[test]
    fn counter() {
        // Setup
        let options = vec![
            OptionConfig::new("abc").long("abc").counter(),
            OptionConfig::new("x").short('x').switch(),
        ];
        let mut instance = DynamicInstance::new("Args")
            .slot("abc", ValueType::Scalar(ScalarType::U8))
            .slot("x", ValueType::Scalar(ScalarType::Bool));

        // Execute
        deserialize(
            &options,
            &[],
            ParserSettings::default().with_keep_first_value(true),
            &DeserializerRegistry::default(),
            &["--abc", "-x", "--abc", "-x", "--abc"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("abc"), Some(&Value::U8(3)));
        assert_eq!(instance.get("x"), Some(&Value::Bool(true)));
    }

    #[test]
    fn counter_non_integer() {
        let options = vec![OptionConfig::new("abc").long("abc").counter()];
        let mut instance =
            DynamicInstance::new("Args").slot("abc", ValueType::Scalar(ScalarType::String));

        let result = deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["--abc"],
            &mut instance,
        );

        assert_matches!(result, Err(DeserializeError::TypeMismatch { name, actual, .. }) => {
            assert_eq!(name, "abc");
            assert_eq!(actual, "counter");
        });
    }

    #[rstest::rstest]
    #[case(ParserSettings::default(), None, "1234")]
    #[case(ParserSettings::default().with_keep_first_value(true), None, "asdf")]
    #[case(ParserSettings::default(), Some(true), "asdf")]
    #[case(ParserSettings::default().with_keep_first_value(true), Some(false), "1234")]
    fn keep_first_value(
        #[case] settings: ParserSettings,
        #[case] option_override: Option<bool>,
        #[case] expected: &str,
    ) {
        // Setup
        let mut option = OptionConfig::new("a")
            .short('a')
            .values(ValueCountRange::exactly(1));
        if let Some(keep_first) = option_override {
            option = option.keep_first_value(keep_first);
        }
        let options = vec![option, OptionConfig::new("b").short('b').values(ValueCountRange::exactly(1))];
        let mut instance = DynamicInstance::new("Args")
            .slot("a", ValueType::Scalar(ScalarType::String))
            .slot("b", ValueType::Collection(CollectionKind::List, ScalarType::String));

        // Execute
        deserialize(
            &options,
            &[],
            settings,
            &DeserializerRegistry::default(),
            &["-a", "asdf", "-b", "asdf", "-a", "1234", "-b", "1234"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("a"), Some(&Value::String(expected.to_string())));
        assert_eq!(instance.get("b"), Some(&strings(&["asdf", "1234"])));
    }

    #[test]
    fn multiple_values_onto_scalar() {
        // Setup
        let options = vec![OptionConfig::new("a")
            .short('a')
            .values(ValueCountRange::exactly(2))];
        let mut instance =
            DynamicInstance::new("Args").slot("a", ValueType::Scalar(ScalarType::U8));

        // Execute
        deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["-a", "1", "2"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("a"), Some(&Value::U8(2)));
    }

    #[rstest::rstest]
    #[case(CollectionKind::Array, vec![2, 1, 3, 2])]
    #[case(CollectionKind::List, vec![2, 1, 3, 2])]
    #[case(CollectionKind::LinkedList, vec![2, 1, 3, 2])]
    #[case(CollectionKind::Queue, vec![2, 1, 3, 2])]
    #[case(CollectionKind::Stack, vec![2, 3, 1, 2])]
    #[case(CollectionKind::HashSet, vec![2, 1, 3])]
    #[case(CollectionKind::SortedSet, vec![1, 2, 3])]
    fn collections(#[case] kind: CollectionKind, #[case] expected: Vec<u8>) {
        // Setup
        let options = vec![OptionConfig::new("a")
            .short('a')
            .values(ValueCountRange::exactly(2))];
        let mut instance =
            DynamicInstance::new("Args").slot("a", ValueType::Collection(kind, ScalarType::U8));

        // Execute
        deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["-a", "2", "1", "-a", "3", "2"],
            &mut instance,
        )
        .unwrap();

        // Verify
        let expected = expected.into_iter().map(Value::U8).collect();
        assert_eq!(instance.get("a"), Some(&Value::Collection(kind, expected)));
    }

    #[derive(Debug, Default)]
    struct Typed {
        names: Stack<String>,
        sizes: std::collections::BTreeSet<u32>,
        verbose: bool,
        level: Option<u8>,
    }

    impl Instance for Typed {
        fn type_name(&self) -> &str {
            "Typed"
        }

        fn has_name(&self, name: &str) -> bool {
            matches!(name, "names" | "sizes" | "verbose" | "level")
        }

        fn value_type(&self, name: &str) -> Option<ValueType> {
            match name {
                "names" => Some(<Stack<String> as Slot>::value_type()),
                "sizes" => Some(<std::collections::BTreeSet<u32> as Slot>::value_type()),
                "verbose" => Some(<bool as Slot>::value_type()),
                "level" => Some(<Option<u8> as Slot>::value_type()),
                _ => None,
            }
        }

        fn get_value(&self, name: &str) -> Option<Value> {
            match name {
                "names" => Slot::get(&self.names),
                "sizes" => Slot::get(&self.sizes),
                "verbose" => Slot::get(&self.verbose),
                "level" => Slot::get(&self.level),
                _ => None,
            }
        }

        fn set_value(&mut self, name: &str, value: Value) -> Result<(), SlotError> {
            match name {
                "names" => Slot::set(&mut self.names, value),
                "sizes" => Slot::set(&mut self.sizes, value),
                "verbose" => Slot::set(&mut self.verbose, value),
                "level" => Slot::set(&mut self.level, value),
                _ => Err(SlotError::Missing(name.to_string())),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn typed_instance() {
        // Setup
        let options = vec![
            OptionConfig::new("names")
                .short('n')
                .values(ValueCountRange::exactly(2)),
            OptionConfig::new("sizes")
                .short('s')
                .values(ValueCountRange::at_least(1)),
            OptionConfig::new("verbose")
                .long("verbose")
                .negate_long_prefix("--no-")
                .switch(),
            OptionConfig::new("level").short('l').counter(),
        ];
        let mut instance = Typed::default();

        // Execute
        deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["-n", "a", "b", "-s", "3", "1", "3", "--verbose", "-l", "--no-verbose", "-l"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.names.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(instance.sizes.iter().collect::<Vec<_>>(), vec![&1, &3]);
        assert!(!instance.verbose);
        assert_eq!(instance.level, Some(2));
    }

    #[test]
    fn implicit_switch() {
        let options = vec![OptionConfig::new("v").short('v')];
        let mut instance =
            DynamicInstance::new("Args").slot("v", ValueType::Optional(ScalarType::Bool));

        deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["-v"],
            &mut instance,
        )
        .unwrap();

        assert_eq!(instance.get("v"), Some(&Value::Bool(true)));
    }

    #[test]
    fn type_mismatch() {
        // Setup
        let values = vec![ValueConfig::at("Number", 0)];
        let mut instance =
            DynamicInstance::new("Args").slot("Number", ValueType::Scalar(ScalarType::I32));

        // Execute
        let result = deserialize(
            &[],
            &values,
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["abc"],
            &mut instance,
        );

        // Verify
        assert_matches!(result, Err(DeserializeError::TypeMismatch { argument, position, name, expected, actual, reason }) => {
            assert_eq!(argument, "abc");
            assert_eq!(position, 1);
            assert_eq!(name, "Number");
            assert_eq!(expected, "i32");
            assert_eq!(actual, "unconverted");
            assert!(reason.is_some());
        });
    }

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn too_many_values(#[case] throw: bool) {
        // Setup
        let values = vec![ValueConfig::at("File", 0)];
        let mut instance = DynamicInstance::new("Args")
            .slot("File", ValueType::Scalar(ScalarType::String));

        // Execute
        let result = deserialize(
            &[],
            &values,
            ParserSettings::default().with_throw_on_missing_property(throw),
            &DeserializerRegistry::default(),
            &["a", "b"],
            &mut instance,
        );

        // Verify
        if throw {
            assert_matches!(result, Err(DeserializeError::TooManyValues { argument, position }) => {
                assert_eq!(argument, "b");
                assert_eq!(position, 2);
            });
        } else {
            assert_matches!(result, Ok(()));
            assert_eq!(instance.get("File"), Some(&Value::String("a".to_string())));
        }
    }

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn missing_property(#[case] throw: bool) {
        // Setup
        let options = vec![OptionConfig::new("v").short('v').switch()];
        let mut instance = DynamicInstance::new("Args");

        // Execute
        let result = deserialize(
            &options,
            &[],
            ParserSettings::default().with_throw_on_missing_property(throw),
            &DeserializerRegistry::default(),
            &["-v"],
            &mut instance,
        );

        // Verify
        if throw {
            assert_matches!(result, Err(DeserializeError::MissingProperty { instance, name, .. }) => {
                assert_eq!(instance, "Args");
                assert_eq!(name, "v");
            });
        } else {
            assert_matches!(result, Ok(()));
        }
    }

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn missing_positional_property(#[case] throw: bool) {
        // Setup
        let values = vec![ValueConfig::at("File", 0)];
        let mut instance = DynamicInstance::new("Args");

        // Execute
        let result = deserialize(
            &[],
            &values,
            ParserSettings::default().with_throw_on_missing_property(throw),
            &DeserializerRegistry::default(),
            &["a"],
            &mut instance,
        );

        // Verify
        if throw {
            assert_matches!(result, Err(DeserializeError::MissingProperty { argument, position, instance, name }) => {
                assert_eq!(argument, "a");
                assert_eq!(position, 1);
                assert_eq!(instance, "Args");
                assert_eq!(name, "File");
            });
        } else {
            assert_matches!(result, Ok(()));
            assert_eq!(instance.get("File"), None);
        }
    }

    #[test]
    fn decimal() {
        // Setup
        let options = vec![OptionConfig::new("price")
            .long("price")
            .values(ValueCountRange::exactly(1))];
        let values = vec![ValueConfig::starting_at("Amounts", 0)];
        let mut instance = DynamicInstance::new("Args")
            .slot("price", ValueType::Optional(ScalarType::Decimal))
            .slot(
                "Amounts",
                ValueType::Collection(CollectionKind::List, ScalarType::Decimal),
            );

        // Execute
        deserialize(
            &options,
            &values,
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["--price", "19.99", "0.1", "0.2"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(
            instance.get("price"),
            Some(&Value::Decimal(rust_decimal::Decimal::new(1999, 2)))
        );
        assert_eq!(
            instance.get("Amounts"),
            Some(&Value::Collection(
                CollectionKind::List,
                vec![
                    Value::Decimal(rust_decimal::Decimal::new(1, 1)),
                    Value::Decimal(rust_decimal::Decimal::new(2, 1)),
                ]
            ))
        );
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Point(i32, i32);

    impl Constructible for Point {
        const NAME: &'static str = "Point";
        const ARITY: Option<usize> = Some(2);

        fn construct(values: &[String]) -> Result<Self, String> {
            let x = values[0].parse().map_err(|_| format!("invalid x '{}'", values[0]))?;
            let y = values[1].parse().map_err(|_| format!("invalid y '{}'", values[1]))?;
            Ok(Point(x, y))
        }
    }

    crate::constructible!(Point);

    #[test]
    fn constructor() {
        // Setup
        let options = vec![
            OptionConfig::new("at")
                .long("at")
                .values(ValueCountRange::exactly(2)),
            OptionConfig::new("path")
                .long("path")
                .values(ValueCountRange::at_least(2)),
        ];
        let mut instance = DynamicInstance::new("Args")
            .slot("at", ValueType::Scalar(Point::scalar_type()))
            .slot(
                "path",
                ValueType::Collection(CollectionKind::List, Point::scalar_type()),
            );

        // Execute
        deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["--at", "1", "2", "--path", "0", "0", "3", "4"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(
            instance.get_value("at").map(|v| v.into_custom::<Point>()),
            Some(Ok(Point(1, 2)))
        );
        assert_matches!(instance.get("path"), Some(Value::Collection(_, items)) => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[1].clone().into_custom::<Point>(), Ok(Point(3, 4)));
        });
    }

    #[test]
    fn constructor_failure() {
        let options = vec![OptionConfig::new("at")
            .long("at")
            .values(ValueCountRange::exactly(2))];
        let mut instance = DynamicInstance::new("Args")
            .slot("at", ValueType::Scalar(Point::scalar_type()));

        let result = deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &DeserializerRegistry::default(),
            &["--at", "1", "x"],
            &mut instance,
        );

        assert_matches!(result, Err(DeserializeError::Construction { type_name, reason, .. }) => {
            assert_eq!(type_name, "Point");
            assert_eq!(reason, "invalid y 'x'");
        });
    }

    #[test]
    fn custom_deserializer() {
        // Setup
        let mut registry = DeserializerRegistry::default();
        registry.add_deserializer(FnDeserializer::new(
            |target| target == &ScalarType::U32,
            |_, value| {
                u32::from_str_radix(value.trim_start_matches("0x"), 16)
                    .map(Value::U32)
                    .map_err(|e| e.to_string())
            },
        ));
        let values = vec![ValueConfig::at("Mask", 0)];
        let mut instance =
            DynamicInstance::new("Args").slot("Mask", ValueType::Scalar(ScalarType::U32));

        // Execute
        deserialize(
            &[],
            &values,
            ParserSettings::default(),
            &registry,
            &["0x10"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("Mask"), Some(&Value::U32(16)));
    }

    struct Joining;

    impl ValueListDeserializer for Joining {
        fn matches_type(&self, target: &ValueType) -> bool {
            target == &ValueType::Scalar(ScalarType::String)
        }

        fn deserialize(
            &self,
            _target: &ValueType,
            values: &[String],
        ) -> Result<Value, InvalidConversion> {
            Ok(Value::String(values.join(",")))
        }
    }

    #[test]
    fn list_deserializer() {
        // Setup
        let mut registry = DeserializerRegistry::default();
        registry.add_list_deserializer(Joining);
        let options = vec![OptionConfig::new("a")
            .short('a')
            .values(ValueCountRange::at_least(1))];
        let mut instance =
            DynamicInstance::new("Args").slot("a", ValueType::Scalar(ScalarType::String));

        // Execute
        deserialize(
            &options,
            &[],
            ParserSettings::default(),
            &registry,
            &["-a", "x", "y", "z"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("a"), Some(&Value::String("x,y,z".to_string())));
    }

    struct Uppercase;

    impl ValueAggregator for Uppercase {
        fn matches_instance(&self, type_name: &str) -> bool {
            type_name == "Args"
        }

        fn aggregate(&self, instance: &mut dyn Instance, name: &str, value: &Value) -> bool {
            match value {
                Value::String(s) => instance
                    .set_value(name, Value::String(s.to_uppercase()))
                    .is_ok(),
                _ => false,
            }
        }
    }

    #[test]
    fn aggregator() {
        // Setup
        let mut registry = DeserializerRegistry::default();
        registry.add_aggregator(Uppercase);
        let values = vec![ValueConfig::at("File", 0), ValueConfig::at("Number", 1)];
        let mut instance = DynamicInstance::new("Args")
            .slot("File", ValueType::Scalar(ScalarType::String))
            .slot("Number", ValueType::Scalar(ScalarType::I32));

        // Execute
        deserialize(
            &[],
            &values,
            ParserSettings::default(),
            &registry,
            &["abc", "3"],
            &mut instance,
        )
        .unwrap();

        // Verify
        assert_eq!(instance.get("File"), Some(&Value::String("ABC".to_string())));
        assert_eq!(instance.get("Number"), Some(&Value::I32(3)));
    }

    #[test]
    fn create_with_commands() {
        // Setup
        let commands = vec![Command::new("commit")
            .option(
                OptionConfig::new("Message")
                    .short('m')
                    .values(ValueCountRange::exactly(1)),
            )
            .value(ValueConfig::starting_at("Paths", 0))];
        let options = vec![OptionConfig::new("Verbose").short('v').switch()];
        let scope = Scope::new(&options, &[], &[], &commands);
        let settings = ParserSettings::default();
        let tokenized = Tokenizer::new(&settings, scope)
            .tokenize(&["-v", "commit", "-m", "hi", "a", "b"])
            .unwrap();
        let registry = DeserializerRegistry::default();
        let factory = ParserInstanceFactory::new(&registry);

        // Execute
        let instances: Vec<Box<dyn Instance>> = tokenized
            .groups()
            .iter()
            .map(|group| factory.create(group, scope, None, "root").unwrap())
            .collect();

        // Verify
        assert_eq!(instances.len(), 2);
        let root = instances[0].downcast_ref::<DynamicInstance>().unwrap();
        assert_eq!(root.get("Verbose"), Some(&Value::Bool(true)));
        let commit = instances[1].downcast_ref::<DynamicInstance>().unwrap();
        assert_eq!(commit.strings("Message"), vec!["hi"]);
        assert_eq!(commit.strings("Paths"), vec!["a", "b"]);
    }
}
