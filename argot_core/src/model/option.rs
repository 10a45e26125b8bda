use crate::error::ConfigError;

/// The inclusive range of values an option accepts.
///
/// A `max` of `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueCountRange {
    min: usize,
    max: Option<usize>,
}

impl ValueCountRange {
    /// Create a range over `[min, max]` (`max = None` means unbounded).
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Precisely `n` values.
    pub fn exactly(n: usize) -> Self {
        Self::new(n, Some(n))
    }

    /// At least `n` values, with no upper bound.
    pub fn at_least(n: usize) -> Self {
        Self::new(n, None)
    }

    /// Between `min` and `max` values (inclusive).
    pub fn between(min: usize, max: usize) -> Self {
        Self::new(min, Some(max))
    }

    /// The minimum number of values.
    pub fn min(&self) -> usize {
        self.min
    }

    /// The maximum number of values, if bounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Whether `count` values satisfy this range.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Whether `count` values leave room for more.
    pub(crate) fn is_open(&self, count: usize) -> bool {
        self.max.map_or(true, |max| count < max)
    }

    /// Whether this range accepts any values at all.
    pub fn takes_values(&self) -> bool {
        self.max != Some(0)
    }
}

impl std::fmt::Display for ValueCountRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "precisely {max}"),
            Some(max) => write!(f, "between {} and {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// A matchable option declaration (ex: `-v`, `--name VALUE`, `--no-color`).
///
/// The `name` binds the option to its target property; the short and long names are its Cli spellings.
/// An option is either a *switch*, a *counter*, takes a *range* of values, or (when none of those are set) takes no values.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{OptionConfig, ValueCountRange};
///
/// let verbose = OptionConfig::new("Verbose").short('v').long("verbose").counter();
/// let output = OptionConfig::new("Output")
///     .short('o')
///     .long("output")
///     .values(ValueCountRange::exactly(1))
///     .required();
///
/// assert!(verbose.validate().is_ok());
/// assert!(output.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionConfig {
    name: String,
    short_names: Vec<char>,
    long_names: Vec<String>,
    short_name_prefix: Option<String>,
    long_name_prefix: Option<String>,
    key_value_separators: Option<Vec<String>>,
    value_count_range: Option<ValueCountRange>,
    switch: bool,
    counter: bool,
    switch_negate_long_prefix: Option<String>,
    switch_negate_short_names: Vec<char>,
    required: bool,
    unique: bool,
    group_names: Vec<String>,
    short_name_immediate_value: Option<bool>,
    long_name_case_insensitive: Option<bool>,
    keep_first_value: Option<bool>,
}

impl OptionConfig {
    /// Create an option bound to the property `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_names: Vec::default(),
            long_names: Vec::default(),
            short_name_prefix: None,
            long_name_prefix: None,
            key_value_separators: None,
            value_count_range: None,
            switch: false,
            counter: false,
            switch_negate_long_prefix: None,
            switch_negate_short_names: Vec::default(),
            required: false,
            unique: false,
            group_names: Vec::default(),
            short_name_immediate_value: None,
            long_name_case_insensitive: None,
            keep_first_value: None,
        }
    }

    /// Accept the short spelling `-{short}`.
    pub fn short(mut self, short: char) -> Self {
        self.short_names.push(short);
        self
    }

    /// Accept the long spelling `--{long}`.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long_names.push(long.into());
        self
    }

    /// Override the short name prefix (default `-`).
    pub fn short_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.short_name_prefix.replace(prefix.into());
        self
    }

    /// Override the long name prefix (default `--`).
    pub fn long_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.long_name_prefix.replace(prefix.into());
        self
    }

    /// Accept `separator` between the name and an inline value.
    /// Once any separator is declared on the option, the parser defaults no longer apply to it.
    pub fn key_value_separator(mut self, separator: impl Into<String>) -> Self {
        self.key_value_separators
            .get_or_insert_with(Vec::default)
            .push(separator.into());
        self
    }

    /// Accept a range of values.
    pub fn values(mut self, range: ValueCountRange) -> Self {
        self.value_count_range.replace(range);
        self
    }

    /// Make this a switch: no values, binding `true` (or `false` when negated).
    pub fn switch(mut self) -> Self {
        self.switch = true;
        self
    }

    /// Make this a counter: no values, each occurrence increments the bound integer.
    pub fn counter(mut self) -> Self {
        self.counter = true;
        self
    }

    /// Accept the negated long spelling `{prefix}{long}` for this switch (ex: `--no-` for `--no-color`).
    pub fn negate_long_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.switch_negate_long_prefix.replace(prefix.into());
        self
    }

    /// Accept the negated short spelling `-{short}` for this switch.
    pub fn negate_short(mut self, short: char) -> Self {
        self.switch_negate_short_names.push(short);
        self
    }

    /// Require this option to be specified within its scope.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Forbid this option from being specified more than once within its scope.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Include this option in the option group `group`.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group_names.push(group.into());
        self
    }

    /// Override whether a short name may be directly followed by its value (ex: `-ofile`).
    pub fn immediate_value(mut self, immediate: bool) -> Self {
        self.short_name_immediate_value.replace(immediate);
        self
    }

    /// Override whether long names match case-insensitively.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.long_name_case_insensitive.replace(case_insensitive);
        self
    }

    /// Override whether the first (rather than last) value wins on a scalar property.
    pub fn keep_first_value(mut self, keep_first: bool) -> Self {
        self.keep_first_value.replace(keep_first);
        self
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short spellings (without prefix).
    pub fn short_names(&self) -> &[char] {
        &self.short_names
    }

    /// The long spellings (without prefix).
    pub fn long_names(&self) -> &[String] {
        &self.long_names
    }

    /// The short name prefix override.
    pub fn short_name_prefix(&self) -> Option<&str> {
        self.short_name_prefix.as_deref()
    }

    /// The long name prefix override.
    pub fn long_name_prefix(&self) -> Option<&str> {
        self.long_name_prefix.as_deref()
    }

    /// The key-value separator override.
    pub fn key_value_separators(&self) -> Option<&[String]> {
        self.key_value_separators.as_deref()
    }

    /// The declared value range, if any.
    pub fn value_count_range(&self) -> Option<ValueCountRange> {
        self.value_count_range
    }

    /// Whether this is a switch.
    pub fn is_switch(&self) -> bool {
        self.switch
    }

    /// Whether this is a counter.
    pub fn is_counter(&self) -> bool {
        self.counter
    }

    /// The negated long prefix, if any.
    pub fn switch_negate_long_prefix(&self) -> Option<&str> {
        self.switch_negate_long_prefix.as_deref()
    }

    /// The negated short spellings.
    pub fn switch_negate_short_names(&self) -> &[char] {
        &self.switch_negate_short_names
    }

    /// Whether this option must be specified.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this option may only be specified once.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// The option groups this option belongs to.
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// The immediate value override.
    pub fn short_name_immediate_value(&self) -> Option<bool> {
        self.short_name_immediate_value
    }

    /// The long name case sensitivity override.
    pub fn long_name_case_insensitive(&self) -> Option<bool> {
        self.long_name_case_insensitive
    }

    /// The keep-first-value override.
    pub fn keep_first_value_override(&self) -> Option<bool> {
        self.keep_first_value
    }

    /// The range of values this option actually accepts.
    /// Switches, counters and range-less options accept none.
    pub fn expected_range(&self) -> ValueCountRange {
        self.value_count_range
            .unwrap_or_else(|| ValueCountRange::exactly(0))
    }

    /// Check the structural invariants of this declaration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidOption {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("the name must not be empty."));
        }

        let modes = [self.value_count_range.is_some(), self.switch, self.counter]
            .iter()
            .filter(|m| **m)
            .count();

        if modes > 1 {
            return Err(invalid(
                "only one of a value range, switch, or counter may be set.",
            ));
        }

        if self.short_names.is_empty() && self.long_names.is_empty() {
            return Err(invalid("at least one short or long name is required."));
        }

        if self
            .short_names
            .iter()
            .chain(self.switch_negate_short_names.iter())
            .any(|c| c.is_whitespace())
        {
            return Err(invalid("short names must not be whitespace."));
        }

        if self.long_names.iter().any(|n| n.is_empty()) {
            return Err(invalid("long names must not be empty."));
        }

        if let Some(range) = &self.value_count_range {
            if let Some(max) = range.max() {
                if range.min() > max {
                    return Err(invalid(
                        "the value range minimum exceeds its maximum.",
                    ));
                }
            }
        }

        if [&self.short_name_prefix, &self.long_name_prefix]
            .iter()
            .any(|p| matches!(p, Some(prefix) if prefix.is_empty()))
        {
            return Err(invalid("prefixes must not be empty."));
        }

        if let Some(separators) = &self.key_value_separators {
            if separators.is_empty() || separators.iter().any(|s| s.is_empty()) {
                return Err(invalid("key-value separators must not be empty."));
            }
        }

        if !self.switch
            && (self.switch_negate_long_prefix.is_some()
                || !self.switch_negate_short_names.is_empty())
        {
            return Err(invalid("only switches may declare negated names."));
        }

        if matches!(&self.switch_negate_long_prefix, Some(prefix) if prefix.is_empty()) {
            return Err(invalid("the negated long prefix must not be empty."));
        }

        if self.switch_negate_long_prefix.is_some() && self.long_names.is_empty() {
            return Err(invalid(
                "a negated long prefix requires at least one long name.",
            ));
        }

        Ok(())
    }
}
