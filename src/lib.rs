//! `argot` is a command line argument tokenizer and typed deserialization engine for Rust.
//!
//! Where most command line parsers couple *reading* the Cli with *describing* it, `argot` splits the work into two well defined stages:
//! * *Tokenization*:
//! the raw arguments are matched against a declarative model of options, positional values, option groups, and (recursively scoped) commands.
//! The result is a list of tokens, grouped per command scope, each carrying its argument text and 1-based position.
//! * *Deserialization*:
//! each group of tokens is converted into typed values and assigned onto a target [`Instance`] by name.
//! Conversion strategies are pluggable, and may be registered alongside the built-ins.
//!
//! Specifically, `argot` attempts to prioritize the following design concerns:
//! * *Declarative configuration*:
//! The Cli is described entirely in memory, via builder style declarations; there are no configuration files nor environment variables.
//! * *Configurable syntax*:
//! Prefixes, key-value separators, case sensitivity, value retention, and the unknown-option policy are all settings, which may be overridden per command.
//! * *Typed targets*:
//! Values land in ordinary Rust structs (via [derive](./derive/index.html)) or in a [`DynamicInstance`], never in stringly typed maps the caller must re-parse.
//! * *Precise errors*:
//! Every input driven failure names the offending argument and its position, which [`ErrorContext`] renders as a caret under the argument line.
//!
//! # Usage
//! Via [derive](./derive/index.html) targets:
//! ```no_run
#![doc = include_str!("../demos/demo_derived.rs")]
//! ```
//! or equivalently with a [`DynamicInstance`]:
//! ```no_run
#![doc = include_str!("../demos/demo_summer.rs")]
//! ```
//!
//! ```console
//! $ summer -v 1 2 3
//! Items: ["1", "2", "3"]
//! Sum: 6
//!
//! $ summer --nope 1
//! Parse error: Unknown option '--nope' at position 1.
//! --nope 1
//! ^
//! ```
//!
//! # Declarations
//! Configure `argot` by starting with a [`CommandLineParser`] and declaring its scope:
//! * [`OptionConfig`]: a named option, spelled via short names (ex: `-v`) and/or long names (ex: `--verbose`).
//! An option either takes values (within a [`ValueCountRange`]), is a *switch* (binding `true`, or `false` when spelled via a negation), or is a *counter* (incrementing on each occurrence).
//! An option with none of these takes no values, and behaves as a switch.
//! * [`ValueConfig`]: a named range of positional indices (ex: `0`, or `1` onward).
//! * [`OptionGroup`]: a constraint over the number of its member options which may be specified (ex: mutually exclusive, or all-or-none).
//! * [`Command`]: a named (and aliased) sub-scope, with its own declarations, settings override, and instance factory.
//! Once a command matches, all subsequent arguments are tokenized against its scope only.
//!
//! Every declaration may be checked eagerly via [`CommandLineParser::validate`].
//! Otherwise, each scope is validated as the tokenizer enters it.
//!
//! # Cli Semantics
//! `argot` tokenizes the Cli according to the following set of rules (described using the default [`ParserSettings`]).
//!
//! * Long options are matched via the `--NAME` specifier, and short options via `-N`.
//! A value-taking option consumes the subsequent arguments, up to its maximum count, stopping early at the next option, command, or literal separator.
//! For example, `--point 1 2` matches `1` and `2` into a two-value option.
//! * The key-value syntax `--key=123` is equivalent to `--key 123`.
//! Only the first separator splits the argument (`--key=1=2` gives the value `1=2`), and the option receives no further values.
//! * Short options may be combined into a cluster: `-abc` is equivalent to `-a -b -c`.
//! The first value-taking option in a cluster consumes the remainder as its immediate value (ex: `-ofile` gives `-o file`).
//! * The literal separator `--` ends option matching: all subsequent arguments are positional values.
//! * The help option (`-h` / `--help`) is matched as a standalone argument, unless a declared option claims the same spelling.
//! When it matches, tokenization stops and no deserialization takes place; [`Parsed::help_command_path`] reports the active commands.
//! * A bare prefix (ex: `-`) is a positional value, never an option.
//! * Unknown options are errors, unless the settings choose to drop them or to treat them as positional values.
//!
//! # Deserialization
//! Each token is assigned onto the property of the same name as its declaration:
//! * Raw values are converted to the property's [`ValueType`] via the registered [`Deserializer`]s (caller strategies before the built-ins), [`ValueListDeserializer`]s, or a [`Constructor`].
//! * Scalar properties retain the last value (or the first, via [`ParserSettings::with_keep_first_value`]); collections accumulate, with insertion semantics of their kind (ex: stacks push to the top, sets de-duplicate).
//! * [`ValueAggregator`]s may intercept assignment entirely.
//!
//! Built-in conversions cover booleans, characters, every integer and float width, `rust_decimal` decimals, strings, `chrono` date-times, dates, and times, and [`ValueEnum`]s.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events while tokenizing and deserializing.
pub mod derive;
pub use argot_core::*;
pub use argot_derive::{Instance, ValueEnum};
