use crate::model::{Command, OptionConfig, ParserSettings};

/// A matched option, along with the raw values it collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionToken<'c> {
    option: &'c OptionConfig,
    argument: String,
    position: usize,
    matched: String,
    values: Vec<String>,
    key_value: bool,
    negated: bool,
}

impl<'c> OptionToken<'c> {
    pub(crate) fn new(
        option: &'c OptionConfig,
        argument: impl Into<String>,
        position: usize,
        matched: impl Into<String>,
    ) -> Self {
        Self {
            option,
            argument: argument.into(),
            position,
            matched: matched.into(),
            values: Vec::default(),
            key_value: false,
            negated: false,
        }
    }

    pub(crate) fn with_values(mut self, values: Vec<String>, key_value: bool) -> Self {
        self.values = values;
        self.key_value = key_value;
        self
    }

    pub(crate) fn negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// The matched option declaration.
    pub fn option(&self) -> &'c OptionConfig {
        self.option
    }

    /// The full argument text the option was matched in (ex: `-abc` for each of `a`, `b` and `c`).
    pub fn argument(&self) -> &str {
        &self.argument
    }

    /// The 1-based position of the argument.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The spelling which matched (ex: `-b`, `--name`).
    pub fn matched(&self) -> &str {
        &self.matched
    }

    /// The raw values, in order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether a value was attached via a key-value separator (ex: `--a=4`).
    pub fn is_key_value(&self) -> bool {
        self.key_value
    }

    /// Whether a negated spelling matched (ex: `--no-color`).
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

/// An unparsed positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueToken {
    argument: String,
    position: usize,
}

impl ValueToken {
    pub(crate) fn new(argument: impl Into<String>, position: usize) -> Self {
        Self {
            argument: argument.into(),
            position,
        }
    }

    /// The argument text.
    pub fn argument(&self) -> &str {
        &self.argument
    }

    /// The 1-based position of the argument.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The atomic output of tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentToken<'c> {
    /// A positional value.
    Value(ValueToken),
    /// A matched option.
    Option(OptionToken<'c>),
}

impl<'c> ArgumentToken<'c> {
    /// The argument text this token came from.
    pub fn argument(&self) -> &str {
        match self {
            ArgumentToken::Value(token) => token.argument(),
            ArgumentToken::Option(token) => token.argument(),
        }
    }

    /// The 1-based position of the argument.
    pub fn position(&self) -> usize {
        match self {
            ArgumentToken::Value(token) => token.position(),
            ArgumentToken::Option(token) => token.position(),
        }
    }

    /// The option token, if this is one.
    pub fn as_option(&self) -> Option<&OptionToken<'c>> {
        match self {
            ArgumentToken::Option(token) => Some(token),
            ArgumentToken::Value(_) => None,
        }
    }

    /// The value token, if this is one.
    pub fn as_value(&self) -> Option<&ValueToken> {
        match self {
            ArgumentToken::Value(token) => Some(token),
            ArgumentToken::Option(_) => None,
        }
    }
}

/// The tokens of one scope: the root parser, or a matched command.
#[derive(Debug, Clone)]
pub struct ArgumentTokenGroup<'c> {
    command: Option<&'c Command>,
    argument: Option<String>,
    position: Option<usize>,
    settings: ParserSettings,
    pub(crate) tokens: Vec<ArgumentToken<'c>>,
}

impl<'c> PartialEq for ArgumentTokenGroup<'c> {
    fn eq(&self, other: &Self) -> bool {
        self.command.map(Command::name) == other.command.map(Command::name)
            && self.argument == other.argument
            && self.position == other.position
            && self.settings == other.settings
            && self.tokens == other.tokens
    }
}

impl<'c> Eq for ArgumentTokenGroup<'c> {}

impl<'c> ArgumentTokenGroup<'c> {
    pub(crate) fn root(settings: ParserSettings) -> Self {
        Self {
            command: None,
            argument: None,
            position: None,
            settings,
            tokens: Vec::default(),
        }
    }

    pub(crate) fn command(
        command: &'c Command,
        argument: impl Into<String>,
        position: usize,
        settings: ParserSettings,
    ) -> Self {
        Self {
            command: Some(command),
            argument: Some(argument.into()),
            position: Some(position),
            settings,
            tokens: Vec::default(),
        }
    }

    /// The matched command, or `None` for the root group.
    pub fn matched_command(&self) -> Option<&'c Command> {
        self.command
    }

    /// The argument text which matched the command.
    pub fn command_argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The 1-based position of the command argument.
    pub fn command_position(&self) -> Option<usize> {
        self.position
    }

    /// The settings resolved for this scope.
    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// The tokens, in input order.
    pub fn tokens(&self) -> &[ArgumentToken<'c>] {
        &self.tokens
    }
}

/// The result of tokenization: the root group followed by one group per matched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedArguments<'c> {
    groups: Vec<ArgumentTokenGroup<'c>>,
    help: Option<Vec<String>>,
}

impl<'c> TokenizedArguments<'c> {
    pub(crate) fn new(groups: Vec<ArgumentTokenGroup<'c>>, help: Option<Vec<String>>) -> Self {
        assert!(
            !groups.is_empty(),
            "internal error - tokenized arguments must contain the root group."
        );
        Self { groups, help }
    }

    /// The groups, root first.
    pub fn groups(&self) -> &[ArgumentTokenGroup<'c>] {
        &self.groups
    }

    /// The root group.
    pub fn root(&self) -> &ArgumentTokenGroup<'c> {
        &self.groups[0]
    }

    /// Whether the help option was specified.
    pub fn has_help_option(&self) -> bool {
        self.help.is_some()
    }

    /// The names of the commands which were active when help was requested.
    pub fn help_command_path(&self) -> Option<&[String]> {
        self.help.as_deref()
    }

    /// The names of the matched commands, in order.
    pub fn command_path(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter_map(|group| group.matched_command().map(Command::name))
            .collect()
    }
}
