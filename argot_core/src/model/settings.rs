use crate::constant::*;
use crate::error::ConfigError;

/// The spellings of the help option.
///
/// Help is matched as a standalone token (ex: `-h` or `--help`), and only when no declared option claims the same spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOption {
    short_names: Vec<char>,
    long_names: Vec<String>,
}

impl Default for HelpOption {
    fn default() -> Self {
        Self {
            short_names: vec![HELP_SHORT],
            long_names: vec![HELP_NAME.to_string()],
        }
    }
}

impl HelpOption {
    /// A help option with no spellings; add them via [`HelpOption::short`] and [`HelpOption::long`].
    pub fn new() -> Self {
        Self {
            short_names: Vec::default(),
            long_names: Vec::default(),
        }
    }

    /// Accept the short spelling.
    pub fn short(mut self, short: char) -> Self {
        self.short_names.push(short);
        self
    }

    /// Accept the long spelling.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long_names.push(long.into());
        self
    }

    /// The short spellings.
    pub fn short_names(&self) -> &[char] {
        &self.short_names
    }

    /// The long spellings.
    pub fn long_names(&self) -> &[String] {
        &self.long_names
    }
}

/// The scalar behaviour flags of a parser scope.
///
/// Defaults:
/// * Short name prefix `-`, long name prefix `--`, key-value separator `=`.
/// * Short names accept immediate values (ex: `-ofile`).
/// * Long names and command names are case sensitive.
/// * The last value wins on scalar properties.
/// * Literal separator `--`.
/// * Unknown options, unknown short options, unexpected key-values and missing properties are errors.
/// * Help via `-h` or `--help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    pub(crate) short_name_prefix: String,
    pub(crate) long_name_prefix: String,
    pub(crate) key_value_separators: Vec<String>,
    pub(crate) short_name_immediate_value: bool,
    pub(crate) long_name_case_insensitive: bool,
    pub(crate) command_case_insensitive: bool,
    pub(crate) keep_first_value: bool,
    pub(crate) literal_separator: Option<String>,
    pub(crate) throw_on_unknown_options: bool,
    pub(crate) throw_on_unknown_short_options: bool,
    pub(crate) ignore_unknown_options: bool,
    pub(crate) throw_on_unexpected_key_value: bool,
    pub(crate) throw_on_missing_property: bool,
    pub(crate) help_option: Option<HelpOption>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            short_name_prefix: DEFAULT_SHORT_NAME_PREFIX.to_string(),
            long_name_prefix: DEFAULT_LONG_NAME_PREFIX.to_string(),
            key_value_separators: vec![DEFAULT_KEY_VALUE_SEPARATOR.to_string()],
            short_name_immediate_value: true,
            long_name_case_insensitive: false,
            command_case_insensitive: false,
            keep_first_value: false,
            literal_separator: Some(DEFAULT_LITERAL_SEPARATOR.to_string()),
            throw_on_unknown_options: true,
            throw_on_unknown_short_options: true,
            ignore_unknown_options: false,
            throw_on_unexpected_key_value: true,
            throw_on_missing_property: true,
            help_option: Some(HelpOption::default()),
        }
    }
}

macro_rules! settings_accessors {
    ($( $(#[$doc:meta])* $field:ident: $ty:ty => $setter:ident ),* $(,)?) => {
        impl ParserSettings {
            $(
                $(#[$doc])*
                pub fn $setter(mut self, value: $ty) -> Self {
                    self.$field = value;
                    self
                }
            )*
        }

        impl SettingsOverride {
            $(
                $(#[$doc])*
                pub fn $setter(mut self, value: $ty) -> Self {
                    self.$field.replace(value);
                    self
                }
            )*
        }
    };
}

settings_accessors! {
    /// Set the default short name prefix.
    short_name_prefix: String => with_short_name_prefix,
    /// Set the default long name prefix.
    long_name_prefix: String => with_long_name_prefix,
    /// Set the default key-value separators.
    key_value_separators: Vec<String> => with_key_value_separators,
    /// Set whether short names accept immediate values.
    short_name_immediate_value: bool => with_short_name_immediate_value,
    /// Set whether long names match case-insensitively.
    long_name_case_insensitive: bool => with_long_name_case_insensitive,
    /// Set whether command names match case-insensitively.
    command_case_insensitive: bool => with_command_case_insensitive,
    /// Set whether the first (rather than last) value wins on scalar properties.
    keep_first_value: bool => with_keep_first_value,
    /// Set the literal separator (`None` disables literal mode).
    literal_separator: Option<String> => with_literal_separator,
    /// Set whether unknown options are errors.
    throw_on_unknown_options: bool => with_throw_on_unknown_options,
    /// Set whether unknown characters in a short option cluster are errors.
    throw_on_unknown_short_options: bool => with_throw_on_unknown_short_options,
    /// Set whether (non-error) unknown options are dropped rather than kept as positional values.
    ignore_unknown_options: bool => with_ignore_unknown_options,
    /// Set whether a key-value on an option which takes no values is an error (otherwise the value is dropped).
    throw_on_unexpected_key_value: bool => with_throw_on_unexpected_key_value,
    /// Set whether a missing instance property is an error (otherwise the token is skipped).
    throw_on_missing_property: bool => with_throw_on_missing_property,
    /// Set the help option (`None` disables help).
    help_option: Option<HelpOption> => with_help_option,
}

impl ParserSettings {
    /// The default short name prefix.
    pub fn short_name_prefix(&self) -> &str {
        &self.short_name_prefix
    }

    /// The default long name prefix.
    pub fn long_name_prefix(&self) -> &str {
        &self.long_name_prefix
    }

    /// The default key-value separators.
    pub fn key_value_separators(&self) -> &[String] {
        &self.key_value_separators
    }

    /// Whether short names accept immediate values.
    pub fn short_name_immediate_value(&self) -> bool {
        self.short_name_immediate_value
    }

    /// Whether long names match case-insensitively.
    pub fn long_name_case_insensitive(&self) -> bool {
        self.long_name_case_insensitive
    }

    /// Whether command names match case-insensitively.
    pub fn command_case_insensitive(&self) -> bool {
        self.command_case_insensitive
    }

    /// Whether the first value wins on scalar properties.
    pub fn keep_first_value(&self) -> bool {
        self.keep_first_value
    }

    /// The literal separator.
    pub fn literal_separator(&self) -> Option<&str> {
        self.literal_separator.as_deref()
    }

    /// Whether unknown options are errors.
    pub fn throw_on_unknown_options(&self) -> bool {
        self.throw_on_unknown_options
    }

    /// Whether unknown short option characters are errors.
    pub fn throw_on_unknown_short_options(&self) -> bool {
        self.throw_on_unknown_short_options
    }

    /// Whether unknown options are dropped.
    pub fn ignore_unknown_options(&self) -> bool {
        self.ignore_unknown_options
    }

    /// Whether unexpected key-values are errors.
    pub fn throw_on_unexpected_key_value(&self) -> bool {
        self.throw_on_unexpected_key_value
    }

    /// Whether missing instance properties are errors.
    pub fn throw_on_missing_property(&self) -> bool {
        self.throw_on_missing_property
    }

    /// The help option.
    pub fn help_option(&self) -> Option<&HelpOption> {
        self.help_option.as_ref()
    }

    /// Resolve the settings of a nested scope: every field set on `overrides` shadows this one.
    pub fn overlay(&self, overrides: &SettingsOverride) -> ParserSettings {
        let SettingsOverride {
            short_name_prefix,
            long_name_prefix,
            key_value_separators,
            short_name_immediate_value,
            long_name_case_insensitive,
            command_case_insensitive,
            keep_first_value,
            literal_separator,
            throw_on_unknown_options,
            throw_on_unknown_short_options,
            ignore_unknown_options,
            throw_on_unexpected_key_value,
            throw_on_missing_property,
            help_option,
        } = overrides;

        ParserSettings {
            short_name_prefix: short_name_prefix
                .clone()
                .unwrap_or_else(|| self.short_name_prefix.clone()),
            long_name_prefix: long_name_prefix
                .clone()
                .unwrap_or_else(|| self.long_name_prefix.clone()),
            key_value_separators: key_value_separators
                .clone()
                .unwrap_or_else(|| self.key_value_separators.clone()),
            short_name_immediate_value: short_name_immediate_value
                .unwrap_or(self.short_name_immediate_value),
            long_name_case_insensitive: long_name_case_insensitive
                .unwrap_or(self.long_name_case_insensitive),
            command_case_insensitive: command_case_insensitive
                .unwrap_or(self.command_case_insensitive),
            keep_first_value: keep_first_value.unwrap_or(self.keep_first_value),
            literal_separator: literal_separator
                .clone()
                .unwrap_or_else(|| self.literal_separator.clone()),
            throw_on_unknown_options: throw_on_unknown_options
                .unwrap_or(self.throw_on_unknown_options),
            throw_on_unknown_short_options: throw_on_unknown_short_options
                .unwrap_or(self.throw_on_unknown_short_options),
            ignore_unknown_options: ignore_unknown_options.unwrap_or(self.ignore_unknown_options),
            throw_on_unexpected_key_value: throw_on_unexpected_key_value
                .unwrap_or(self.throw_on_unexpected_key_value),
            throw_on_missing_property: throw_on_missing_property
                .unwrap_or(self.throw_on_missing_property),
            help_option: help_option
                .clone()
                .unwrap_or_else(|| self.help_option.clone()),
        }
    }

    /// Check that the prefixes and separators are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_name_prefix.is_empty() || self.long_name_prefix.is_empty() {
            return Err(ConfigError::InvalidSettings(
                "the default prefixes must not be empty.".to_string(),
            ));
        }

        if self.key_value_separators.is_empty()
            || self.key_value_separators.iter().any(|s| s.is_empty())
        {
            return Err(ConfigError::InvalidSettings(
                "the default key-value separators must not be empty.".to_string(),
            ));
        }

        if matches!(&self.literal_separator, Some(separator) if separator.is_empty()) {
            return Err(ConfigError::InvalidSettings(
                "the literal separator must not be empty.".to_string(),
            ));
        }

        if let Some(help) = &self.help_option {
            if help.long_names.iter().any(|n| n.is_empty()) {
                return Err(ConfigError::InvalidSettings(
                    "the help option long names must not be empty.".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Parser settings which shadow those of the enclosing scope, when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverride {
    short_name_prefix: Option<String>,
    long_name_prefix: Option<String>,
    key_value_separators: Option<Vec<String>>,
    short_name_immediate_value: Option<bool>,
    long_name_case_insensitive: Option<bool>,
    command_case_insensitive: Option<bool>,
    keep_first_value: Option<bool>,
    literal_separator: Option<Option<String>>,
    throw_on_unknown_options: Option<bool>,
    throw_on_unknown_short_options: Option<bool>,
    ignore_unknown_options: Option<bool>,
    throw_on_unexpected_key_value: Option<bool>,
    throw_on_missing_property: Option<bool>,
    help_option: Option<Option<HelpOption>>,
}
