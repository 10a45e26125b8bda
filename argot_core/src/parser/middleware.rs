use std::env;
use std::sync::Arc;

use crate::deserialize::{Deserializer, DeserializerRegistry, ValueAggregator, ValueListDeserializer};
use crate::error::{ConfigError, ParseError, TokenizeError};
use crate::factory::ParserInstanceFactory;
use crate::instance::{Instance, InstanceFactory};
use crate::model::{Command, OptionConfig, OptionGroup, ParserSettings, Scope, ValueConfig};
use crate::parser::interface::ConsoleInterface;
use crate::parser::{ErrorContext, UserInterface};
use crate::tokenizer::validate::validate_tree;
use crate::tokenizer::{TokenizedArguments, Tokenizer};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Handles a failed parse, returning the exit code.
pub type ErrorHandler = Box<dyn Fn(&ParseError, &ErrorContext) -> i32>;

/// The instance built for one group of tokens.
pub struct ParsedInstance {
    command_path: Vec<String>,
    instance: Box<dyn Instance>,
}

impl std::fmt::Debug for ParsedInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedInstance")
            .field("command_path", &self.command_path)
            .field("instance", &self.instance.type_name())
            .finish()
    }
}

impl ParsedInstance {
    /// The names of the commands leading to this group (empty for the root).
    pub fn command_path(&self) -> &[String] {
        &self.command_path
    }

    /// The populated instance.
    pub fn instance(&self) -> &dyn Instance {
        self.instance.as_ref()
    }

    /// Take the populated instance.
    pub fn into_instance(self) -> Box<dyn Instance> {
        self.instance
    }
}

/// The result of a successful parse.
#[derive(Debug)]
pub struct Parsed<'c> {
    tokens: TokenizedArguments<'c>,
    instances: Vec<ParsedInstance>,
}

impl<'c> Parsed<'c> {
    /// The tokenized arguments.
    pub fn tokens(&self) -> &TokenizedArguments<'c> {
        &self.tokens
    }

    /// Whether help was requested.
    /// When it was, no instances are built.
    pub fn has_help_option(&self) -> bool {
        self.tokens.has_help_option()
    }

    /// The command path which was active when help was requested.
    pub fn help_command_path(&self) -> Option<&[String]> {
        self.tokens.help_command_path()
    }

    /// The names of the matched commands, in order.
    pub fn command_path(&self) -> Vec<&str> {
        self.tokens.command_path()
    }

    /// The built instances, one per group (in order).
    pub fn instances(&self) -> &[ParsedInstance] {
        &self.instances
    }

    /// The instance built for the group reached via `path`.
    pub fn instance(&self, path: &[&str]) -> Option<&dyn Instance> {
        self.instances
            .iter()
            .find(|parsed| parsed.command_path.iter().map(String::as_str).eq(path.iter().copied()))
            .map(ParsedInstance::instance)
    }

    /// Take the built instances.
    pub fn into_instances(self) -> Vec<ParsedInstance> {
        self.instances
    }
}

/// The top-level command line parser.
///
/// Declarations are added via the builder methods, after which the parser may be used any number of times.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{CommandLineParser, DynamicInstance, OptionConfig, ValueConfig, ValueCountRange};
///
/// let parser = CommandLineParser::new("program")
///     .option(OptionConfig::new("Name").long("name").values(ValueCountRange::exactly(1)))
///     .value(ValueConfig::at("File", 0))
///     .value(ValueConfig::at("Number", 1));
///
/// let parsed = parser.parse(&["--name", "John", "output.txt", "3"]).unwrap();
/// let root = parsed.instance(&[]).unwrap().downcast_ref::<DynamicInstance>().unwrap();
///
/// assert_eq!(root.strings("Name"), vec!["John"]);
/// assert_eq!(root.strings("File"), vec!["output.txt"]);
/// assert_eq!(root.strings("Number"), vec!["3"]);
/// ```
pub struct CommandLineParser {
    program: String,
    options: Vec<OptionConfig>,
    values: Vec<ValueConfig>,
    groups: Vec<OptionGroup>,
    commands: Vec<Command>,
    settings: ParserSettings,
    registry: DeserializerRegistry,
    factory: Option<InstanceFactory>,
    error_handler: Option<ErrorHandler>,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for CommandLineParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLineParser")
            .field("program", &self.program)
            .field("options", &self.options)
            .field("values", &self.values)
            .field("groups", &self.groups)
            .field("commands", &self.commands)
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .finish()
    }
}

impl CommandLineParser {
    /// Create a command line parser for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            options: Vec::default(),
            values: Vec::default(),
            groups: Vec::default(),
            commands: Vec::default(),
            settings: ParserSettings::default(),
            registry: DeserializerRegistry::default(),
            factory: None,
            error_handler: None,
            user_interface: Box::<ConsoleInterface>::default(),
        }
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Create a command line parser which reports nothing on failure, for use in testing.
    ///
    /// ### Example
    /// ```
    /// # use argot_core as argot;
    /// use argot::{CommandLineParser, OptionConfig};
    ///
    /// // Function under test.
    /// // We want to make sure the setup_fn is wired up correctly.
    /// pub fn setup_fn(parser: CommandLineParser) -> CommandLineParser {
    ///     parser.option(OptionConfig::new("verbose").short('v').switch())
    /// }
    ///
    /// let parser = setup_fn(CommandLineParser::test_dummy());
    /// assert!(parser.run(&["-v"]).is_ok());
    /// assert_eq!(parser.run(&["-x"]).unwrap_err(), 1);
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn test_dummy() -> Self {
        Self::new("test-dummy").error_handler(|_, _| 1)
    }

    #[cfg(test)]
    pub(crate) fn with_interface(mut self, user_interface: Box<dyn UserInterface>) -> Self {
        self.user_interface = user_interface;
        self
    }

    /// Declare an option.
    pub fn option(mut self, option: OptionConfig) -> Self {
        self.options.push(option);
        self
    }

    /// Declare a positional value.
    pub fn value(mut self, value: ValueConfig) -> Self {
        self.values.push(value);
        self
    }

    /// Declare an option group.
    pub fn group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Declare a command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Replace the parser settings.
    pub fn settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a scalar deserializer, consulted ahead of the built-ins.
    pub fn deserializer(mut self, deserializer: impl Deserializer + 'static) -> Self {
        self.registry.add_deserializer(deserializer);
        self
    }

    /// Register a value-list deserializer.
    pub fn list_deserializer(mut self, deserializer: impl ValueListDeserializer + 'static) -> Self {
        self.registry.add_list_deserializer(deserializer);
        self
    }

    /// Register an assignment aggregator.
    pub fn aggregator(mut self, aggregator: impl ValueAggregator + 'static) -> Self {
        self.registry.add_aggregator(aggregator);
        self
    }

    /// Build root instances via `factory`, rather than as a [`DynamicInstance`](crate::DynamicInstance).
    pub fn instance<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Instance> + Send + Sync + 'static,
    {
        self.factory.replace(Arc::new(factory));
        self
    }

    /// Handle failures in [`CommandLineParser::run`] via `handler`, which returns the exit code.
    ///
    /// By default, the error and its context are printed to stderr, with exit code `1`.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ParseError, &ErrorContext) -> i32 + 'static,
    {
        self.error_handler.replace(Box::new(handler));
        self
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The root scope of declarations.
    pub fn scope(&self) -> Scope<'_> {
        Scope::new(&self.options, &self.values, &self.groups, &self.commands)
    }

    /// Eagerly check the declarations of the whole command tree.
    ///
    /// Tokenization checks each scope as it is entered; this checks scopes that the arguments never reach too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tree(&self.scope(), &self.settings)
    }

    /// Tokenize `args` (excluding the program name).
    pub fn tokenize<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<TokenizedArguments<'_>, TokenizeError> {
        Tokenizer::new(&self.settings, self.scope()).tokenize(args)
    }

    /// Tokenize and deserialize `args` (excluding the program name).
    ///
    /// Each group is deserialized onto an instance built by its command's factory (or the parser's, for the root group).
    /// Groups without a factory use a [`DynamicInstance`](crate::DynamicInstance).
    /// When help is requested, no instances are built.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Parsed<'_>, ParseError> {
        let tokens = self.tokenize(args)?;
        let instances = self.build(&tokens, None)?;
        Ok(Parsed { tokens, instances })
    }

    /// Like [`CommandLineParser::parse`], but deserializes the root group onto `root`.
    ///
    /// The instances of the result then only cover the command groups.
    pub fn parse_into<S: AsRef<str>>(
        &self,
        args: &[S],
        root: &mut dyn Instance,
    ) -> Result<Parsed<'_>, ParseError> {
        let tokens = self.tokenize(args)?;
        let instances = self.build(&tokens, Some(root))?;
        Ok(Parsed { tokens, instances })
    }

    fn build(
        &self,
        tokens: &TokenizedArguments,
        mut root: Option<&mut dyn Instance>,
    ) -> Result<Vec<ParsedInstance>, ParseError> {
        if tokens.has_help_option() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Help requested; skipping deserialization.");
            }

            return Ok(Vec::default());
        }

        let factory = ParserInstanceFactory::new(&self.registry);
        let mut instances = Vec::with_capacity(tokens.groups().len());
        let mut command_path = Vec::default();

        for group in tokens.groups() {
            match group.matched_command() {
                Some(command) => {
                    command_path.push(command.name().to_string());
                    let instance =
                        factory.create(group, self.scope(), command.factory(), command.name())?;
                    instances.push(ParsedInstance {
                        command_path: command_path.clone(),
                        instance,
                    });
                }
                None => match root.as_deref_mut() {
                    Some(root) => factory.populate(group, self.scope(), root)?,
                    None => {
                        let instance = factory.create(
                            group,
                            self.scope(),
                            self.factory.as_ref(),
                            &self.program,
                        )?;
                        instances.push(ParsedInstance {
                            command_path: Vec::default(),
                            instance,
                        });
                    }
                },
            }
        }

        Ok(instances)
    }

    /// Parse `args`, routing failures to the error handler.
    ///
    /// Returns the exit code on failure.
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<Parsed<'_>, i32> {
        self.parse(args).map_err(|error| self.handle(error, args))
    }

    /// Like [`CommandLineParser::run`], but deserializes the root group onto `root`.
    pub fn run_into<S: AsRef<str>>(
        &self,
        args: &[S],
        root: &mut dyn Instance,
    ) -> Result<Parsed<'_>, i32> {
        self.parse_into(args, root)
            .map_err(|error| self.handle(error, args))
    }

    /// Run the parser against the Cli [`env::args`].
    ///
    /// On failure, exits with the error handler's code (via [`std::process::exit`]).
    pub fn run_env(&self) -> Parsed<'_> {
        let args: Vec<String> = env::args().skip(1).collect();

        match self.run(&args) {
            Ok(parsed) => parsed,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }

    fn handle<S: AsRef<str>>(&self, error: ParseError, args: &[S]) -> i32 {
        let error_context = ErrorContext::at_position(error.position(), args);

        match &self.error_handler {
            Some(handler) => handler(&error, &error_context),
            None => {
                let has_position = error.position().is_some();
                self.user_interface.print_error(error);

                if has_position {
                    self.user_interface.print_error_context(error_context);
                }

                1
            }
        }
    }
}
