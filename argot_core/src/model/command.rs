use std::sync::Arc;

use crate::error::ConfigError;
use crate::instance::{Instance, InstanceFactory};
use crate::model::{OptionConfig, OptionGroup, SettingsOverride, ValueConfig};

/// A named sub-tree of declarations (ex: `git commit ...`).
///
/// Once the command's name (or alias) is matched, all subsequent tokens are tokenized against the command's own declarations.
/// Unset settings are inherited from the enclosing scope.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{Command, OptionConfig, SettingsOverride, ValueConfig, ValueCountRange};
///
/// let commit = Command::new("commit")
///     .alias("ci")
///     .option(OptionConfig::new("Message").short('m').values(ValueCountRange::exactly(1)))
///     .value(ValueConfig::starting_at("Paths", 0))
///     .settings(SettingsOverride::default().with_keep_first_value(true));
///
/// assert!(commit.validate().is_ok());
/// assert!(commit.matches("ci", false));
/// ```
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    options: Vec<OptionConfig>,
    values: Vec<ValueConfig>,
    groups: Vec<OptionGroup>,
    commands: Vec<Command>,
    settings: SettingsOverride,
    factory: Option<InstanceFactory>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("options", &self.options)
            .field("values", &self.values)
            .field("groups", &self.groups)
            .field("commands", &self.commands)
            .field("settings", &self.settings)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

impl Command {
    /// Create a command matched by `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::default(),
            options: Vec::default(),
            values: Vec::default(),
            groups: Vec::default(),
            commands: Vec::default(),
            settings: SettingsOverride::default(),
            factory: None,
        }
    }

    /// Also match this command by `alias`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Declare an option in this command's scope.
    pub fn option(mut self, option: OptionConfig) -> Self {
        self.options.push(option);
        self
    }

    /// Declare a positional value in this command's scope.
    pub fn value(mut self, value: ValueConfig) -> Self {
        self.values.push(value);
        self
    }

    /// Declare an option group in this command's scope.
    pub fn group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Declare a nested command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Override the enclosing parser settings within this command's scope.
    pub fn settings(mut self, settings: SettingsOverride) -> Self {
        self.settings = settings;
        self
    }

    /// Deserialize this command's tokens onto instances produced by `factory`.
    pub fn instance<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Instance> + Send + Sync + 'static,
    {
        self.factory.replace(Arc::new(factory));
        self
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alternate names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The settings override.
    pub fn settings_override(&self) -> &SettingsOverride {
        &self.settings
    }

    /// The instance factory, if any.
    pub fn factory(&self) -> Option<&InstanceFactory> {
        self.factory.as_ref()
    }

    /// The declarations of this command's scope.
    pub fn scope(&self) -> Scope<'_> {
        Scope {
            options: &self.options,
            values: &self.values,
            groups: &self.groups,
            commands: &self.commands,
        }
    }

    /// Every spelling which matches this command.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether `argument` matches the name or an alias.
    pub fn matches(&self, argument: &str, case_insensitive: bool) -> bool {
        self.spellings().any(|spelling| {
            if case_insensitive {
                spelling.eq_ignore_ascii_case(argument)
            } else {
                spelling == argument
            }
        })
    }

    /// Check the structural invariants of this command (not including its scope).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spellings().any(str::is_empty) {
            return Err(ConfigError::InvalidCommand {
                name: self.name.clone(),
                reason: "names and aliases must not be empty.".to_string(),
            });
        }

        Ok(())
    }
}

/// A borrowed view over the declarations of one scope: either the root parser, or a command.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'c> {
    pub(crate) options: &'c [OptionConfig],
    pub(crate) values: &'c [ValueConfig],
    pub(crate) groups: &'c [OptionGroup],
    pub(crate) commands: &'c [Command],
}

impl<'c> Scope<'c> {
    /// Create a view over the given declarations.
    pub fn new(
        options: &'c [OptionConfig],
        values: &'c [ValueConfig],
        groups: &'c [OptionGroup],
        commands: &'c [Command],
    ) -> Self {
        Self {
            options,
            values,
            groups,
            commands,
        }
    }

    /// The options of this scope.
    pub fn options(&self) -> &'c [OptionConfig] {
        self.options
    }

    /// The positional values of this scope.
    pub fn values(&self) -> &'c [ValueConfig] {
        self.values
    }

    /// The option groups of this scope.
    pub fn groups(&self) -> &'c [OptionGroup] {
        self.groups
    }

    /// The commands of this scope.
    pub fn commands(&self) -> &'c [Command] {
        self.commands
    }

    /// Find the command matching `argument`.
    pub fn find_command(&self, argument: &str, case_insensitive: bool) -> Option<&'c Command> {
        self.commands
            .iter()
            .find(|command| command.matches(argument, case_insensitive))
    }

    /// Find the value covering the positional `index`.
    pub fn find_value(&self, index: usize) -> Option<&'c ValueConfig> {
        self.values.iter().find(|value| value.contains(index))
    }
}
