use thiserror::Error;

use crate::buffer::BufferError;
use crate::model::ValueCountRange;

/// An invalid or conflicting declaration.
///
/// These indicate a programming error in the parser configuration, rather than malformed input.
/// They are detected at the start of each scope's tokenization (or eagerly via `CommandLineParser::validate`), and always propagate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Two options share the same name.
    #[error("Cannot duplicate the option '{0}'.")]
    DuplicateOption(String),

    /// Two options accept the same short spelling.
    #[error("Options '{first}' and '{second}' both declare the short name '{spelling}'.")]
    DuplicateShortName {
        /// The colliding spelling, including its prefix.
        spelling: String,
        /// The option declared first.
        first: String,
        /// The option declared second.
        second: String,
    },

    /// Two options accept the same long spelling.
    #[error("Options '{first}' and '{second}' both declare the long name '{spelling}'.")]
    DuplicateLongName {
        /// The colliding spelling, including its prefix.
        spelling: String,
        /// The option declared first.
        first: String,
        /// The option declared second.
        second: String,
    },

    /// A value shares its name with another value or option.
    #[error("Cannot duplicate the value '{0}'.")]
    DuplicateValue(String),

    /// Two values claim overlapping positions.
    #[error("Values '{first}' and '{second}' have overlapping positions.")]
    OverlappingValues {
        /// The value with the lower start index.
        first: String,
        /// The value overlapping it.
        second: String,
    },

    /// Two commands (or their aliases) share a spelling.
    #[error("Commands '{first}' and '{second}' both declare the name '{spelling}'.")]
    DuplicateCommand {
        /// The colliding name or alias.
        spelling: String,
        /// The command declared first.
        first: String,
        /// The command declared second.
        second: String,
    },

    /// Two option groups share the same name.
    #[error("Cannot duplicate the option group '{0}'.")]
    DuplicateGroup(String),

    /// An option claims membership in a group that is not declared in its scope.
    #[error("Option '{option}' references the undeclared group '{group}'.")]
    UnknownGroup {
        /// The referencing option.
        option: String,
        /// The missing group.
        group: String,
    },

    /// An option violates a structural invariant.
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption {
        /// The offending option.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A value violates a structural invariant.
    #[error("Invalid value '{name}': {reason}")]
    InvalidValue {
        /// The offending value.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An option group violates a structural invariant.
    #[error("Invalid option group '{name}': {reason}")]
    InvalidGroup {
        /// The offending group.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A command violates a structural invariant.
    #[error("Invalid command '{name}': {reason}")]
    InvalidCommand {
        /// The offending command.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The scalar parser settings are unusable.
    #[error("Invalid parser settings: {0}")]
    InvalidSettings(String),
}

/// A failure to tokenize the input arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// The declarations of the scope being entered are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The lookahead buffer could not be created or rewound.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// A token looks like an option but matches none.
    #[error("Unknown option '{argument}' at position {position}.")]
    UnknownOption {
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
    },

    /// A character inside a short option cluster matches no short name.
    #[error("Unknown short option '{character}' in '{argument}' at position {position}.")]
    UnknownShortOption {
        /// The token containing the cluster.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
        /// The unmatched character.
        character: char,
    },

    /// A token matches no command, and the scope declares no values to absorb it.
    #[error("Unknown command '{argument}' at position {position}.")]
    UnknownCommand {
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
    },

    /// An option received a number of values outside of its range.
    #[error("Option '{option}' expects {expected} value(s) but received {actual} ('{argument}' at position {position}).")]
    ValueCountOutOfRange {
        /// The option name.
        option: String,
        /// The token which matched the option.
        argument: String,
        /// The 1-based position where the option started.
        position: usize,
        /// The declared range.
        expected: ValueCountRange,
        /// The number of values received.
        actual: usize,
    },

    /// An option which takes no values was given one via a key-value separator.
    #[error("Option '{option}' does not accept a value ('{argument}' at position {position}).")]
    UnexpectedKeyValue {
        /// The option name.
        option: String,
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
    },

    /// A required option was never specified in its scope.
    #[error("Required option '{0}' was not specified.")]
    RequiredOptionMissing(String),

    /// A unique option was specified more than once.
    #[error("Option '{option}' may only be specified once (positions {first} and {second}).")]
    MultipleUniqueOption {
        /// The option name.
        option: String,
        /// The 1-based position of the first occurrence.
        first: usize,
        /// The 1-based position of the second occurrence.
        second: usize,
    },

    /// More than one option of a mutually exclusive group was specified.
    #[error("Options {options:?} of group '{group}' are mutually exclusive.")]
    GroupMutuallyExclusive {
        /// The group name.
        group: String,
        /// The specified members.
        options: Vec<String>,
    },

    /// None of the options of a required group were specified.
    #[error("One of the options {options:?} of group '{group}' is required.")]
    GroupRequired {
        /// The group name.
        group: String,
        /// All members of the group.
        options: Vec<String>,
    },

    /// The number of specified options of a group is out of its range.
    #[error("Group '{group}' expects {} of the options {options:?}, but {actual} were specified.", describe_count(.min, .max))]
    GroupMismatch {
        /// The group name.
        group: String,
        /// All members of the group.
        options: Vec<String>,
        /// The declared minimum (`None` means all).
        min: Option<usize>,
        /// The declared maximum (`None` means unbounded).
        max: Option<usize>,
        /// The number of distinct members specified.
        actual: usize,
    },
}

fn describe_count(min: &Option<usize>, max: &Option<usize>) -> String {
    match (min, max) {
        (None, _) => "all or none".to_string(),
        (Some(i), Some(j)) if i == j => format!("precisely {i}"),
        (Some(i), Some(j)) => format!("between {i} and {j}"),
        (Some(i), None) => format!("at least {i}"),
    }
}

impl TokenizeError {
    /// The 1-based position of the offending token, when one exists.
    pub fn position(&self) -> Option<usize> {
        match self {
            TokenizeError::UnknownOption { position, .. }
            | TokenizeError::UnknownShortOption { position, .. }
            | TokenizeError::UnknownCommand { position, .. }
            | TokenizeError::ValueCountOutOfRange { position, .. }
            | TokenizeError::UnexpectedKeyValue { position, .. }
            | TokenizeError::MultipleUniqueOption {
                second: position, ..
            } => Some(*position),
            _ => None,
        }
    }
}

/// A failure to convert or assign tokenized values onto an instance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeserializeError {
    /// A value did not satisfy the type of its target property.
    #[error("Cannot assign '{argument}' (position {position}) to '{name}': expected {expected}, found {actual}.{}", describe_reason(.reason))]
    TypeMismatch {
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
        /// The target property.
        name: String,
        /// The target type.
        expected: String,
        /// The type that was produced.
        actual: String,
        /// The underlying conversion failure, if one was observed.
        reason: Option<String>,
    },

    /// A constructor rejected its inputs.
    #[error("Cannot construct {type_name} from '{argument}' (position {position}): {reason}")]
    Construction {
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
        /// The type being constructed.
        type_name: String,
        /// The constructor's failure.
        reason: String,
    },

    /// The instance has no property for a resolved name.
    #[error("Instance '{instance}' has no property '{name}' for '{argument}' (position {position}).")]
    MissingProperty {
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
        /// The instance type name.
        instance: String,
        /// The missing property.
        name: String,
    },

    /// A positional token is not covered by any declared value.
    #[error("Too many values: '{argument}' (position {position}) is not covered by any declared value.")]
    TooManyValues {
        /// The token.
        argument: String,
        /// The 1-based position of the token.
        position: usize,
    },
}

fn describe_reason(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" {r}"),
        None => String::default(),
    }
}

impl DeserializeError {
    /// The 1-based position of the offending token.
    pub fn position(&self) -> usize {
        match self {
            DeserializeError::TypeMismatch { position, .. }
            | DeserializeError::Construction { position, .. }
            | DeserializeError::MissingProperty { position, .. }
            | DeserializeError::TooManyValues { position, .. } => *position,
        }
    }
}

/// Any failure raised while parsing a command line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Tokenization failed.
    #[error("Parse error: {0}")]
    Tokenize(#[from] TokenizeError),

    /// Deserialization failed.
    #[error("Parse error: {0}")]
    Deserialize(#[from] DeserializeError),
}

impl From<ConfigError> for ParseError {
    fn from(error: ConfigError) -> Self {
        ParseError::Tokenize(TokenizeError::Config(error))
    }
}

impl ParseError {
    /// The 1-based position of the offending token, when one exists.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Tokenize(error) => error.position(),
            ParseError::Deserialize(error) => Some(error.position()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, "all or none")]
    #[case(Some(1), Some(1), "precisely 1")]
    #[case(Some(0), Some(2), "between 0 and 2")]
    #[case(Some(2), None, "at least 2")]
    fn group_mismatch_message(
        #[case] min: Option<usize>,
        #[case] max: Option<usize>,
        #[case] expected: &str,
    ) {
        let error = TokenizeError::GroupMismatch {
            group: "output".to_string(),
            options: vec!["json".to_string(), "yaml".to_string()],
            min,
            max,
            actual: 1,
        };

        assert_contains!(error.to_string(), expected);
        assert_contains!(error.to_string(), "'output'");
    }

    #[test]
    fn out_of_range_message() {
        let error = TokenizeError::ValueCountOutOfRange {
            option: "point".to_string(),
            argument: "--point".to_string(),
            position: 3,
            expected: ValueCountRange::exactly(2),
            actual: 1,
        };

        assert_eq!(
            error.to_string(),
            "Option 'point' expects precisely 2 value(s) but received 1 ('--point' at position 3)."
        );
        assert_eq!(error.position(), Some(3));
    }

    #[test]
    fn type_mismatch_reason() {
        let error = DeserializeError::TypeMismatch {
            argument: "abc".to_string(),
            position: 2,
            name: "count".to_string(),
            expected: "u32".to_string(),
            actual: "unconverted".to_string(),
            reason: Some("cannot convert 'abc' to u32.".to_string()),
        };

        assert_eq!(
            error.to_string(),
            "Cannot assign 'abc' (position 2) to 'count': expected u32, found unconverted. cannot convert 'abc' to u32."
        );
    }

    #[test]
    fn parse_error_position() {
        let error = ParseError::from(ConfigError::DuplicateOption("a".to_string()));
        assert_eq!(error.position(), None);
        assert_contains!(error.to_string(), "Parse error: Cannot duplicate the option 'a'.");

        let error = ParseError::from(DeserializeError::TooManyValues {
            argument: "x".to_string(),
            position: 4,
        });
        assert_eq!(error.position(), Some(4));
    }
}
