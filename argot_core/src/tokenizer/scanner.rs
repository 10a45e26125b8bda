use crate::buffer::BufferedEnumerator;
use crate::constant::LOOKAHEAD_BUFFER_SIZE;
use crate::error::TokenizeError;
use crate::model::{Command, OptionConfig, ParserSettings, Scope};
use crate::tokenizer::index::{LongMatch, ScopeIndex};
use crate::tokenizer::validate::post_validate;
use crate::tokenizer::{
    ArgumentToken, ArgumentTokenGroup, OptionToken, TokenizedArguments, ValueToken,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

type Input = BufferedEnumerator<std::vec::IntoIter<(usize, String)>>;

enum Step<'c> {
    Tokens(Vec<ArgumentToken<'c>>),
    Skip,
    Literal,
    Help,
    Enter(&'c Command),
}

/// Converts raw arguments into [`TokenizedArguments`], against the declarations of a root scope.
///
/// The tokenizer holds no state across calls: tokenizing the same arguments twice produces identical results.
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::{OptionConfig, ParserSettings, Scope, Tokenizer, ValueCountRange};
///
/// let options = vec![
///     OptionConfig::new("a").short('a').values(ValueCountRange::exactly(1)),
///     OptionConfig::new("b").short('b').switch(),
/// ];
/// let settings = ParserSettings::default();
/// let tokenizer = Tokenizer::new(&settings, Scope::new(&options, &[], &[], &[]));
/// let tokenized = tokenizer.tokenize(&["-bac"]).unwrap();
/// let names: Vec<&str> = tokenized
///     .root()
///     .tokens()
///     .iter()
///     .map(|t| t.as_option().unwrap().option().name())
///     .collect();
///
/// assert_eq!(names, vec!["b", "a"]);
/// ```
#[derive(Debug)]
pub struct Tokenizer<'c> {
    settings: ParserSettings,
    scope: Scope<'c>,
}

impl<'c> Tokenizer<'c> {
    /// Create a tokenizer over the root `scope`.
    pub fn new(settings: &ParserSettings, scope: Scope<'c>) -> Self {
        Self {
            settings: settings.clone(),
            scope,
        }
    }

    /// Tokenize `args` (excluding the program name).
    pub fn tokenize<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<TokenizedArguments<'c>, TokenizeError> {
        let arguments: Vec<(usize, String)> = args
            .iter()
            .enumerate()
            .map(|(i, argument)| (i + 1, argument.as_ref().to_string()))
            .collect();
        let mut input = BufferedEnumerator::new(arguments.into_iter(), LOOKAHEAD_BUFFER_SIZE)?;
        let mut scopes = vec![ScopeIndex::new(self.scope, self.settings.clone())?];
        let mut groups = Vec::default();
        let mut current = ArgumentTokenGroup::root(self.settings.clone());
        let mut literal = false;

        while input.move_next() {
            let (position, argument) = match input.current() {
                Some(item) => item.clone(),
                None => break,
            };
            let index = scopes
                .last()
                .expect("internal error - the scope stack must never be empty.");

            if literal {
                current
                    .tokens
                    .push(ArgumentToken::Value(ValueToken::new(argument, position)));
                continue;
            }

            match scan(index, &argument, position, &mut input)? {
                Step::Tokens(tokens) => current.tokens.extend(tokens),
                Step::Skip => {}
                Step::Literal => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Literal separator at position {position}; remaining arguments are values.");
                    }

                    literal = true;
                }
                Step::Help => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Help option '{argument}' at position {position}.");
                    }

                    groups.push(current);
                    let path = groups
                        .iter()
                        .filter_map(|group: &ArgumentTokenGroup| {
                            group.matched_command().map(|c| c.name().to_string())
                        })
                        .collect();
                    return Ok(TokenizedArguments::new(groups, Some(path)));
                }
                Step::Enter(command) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Entering command '{}' at position {position}.", command.name());
                    }

                    post_validate(&index.scope, current.tokens())?;
                    let settings = index.settings.overlay(command.settings_override());
                    groups.push(current);
                    current = ArgumentTokenGroup::command(
                        command,
                        argument,
                        position,
                        settings.clone(),
                    );
                    scopes.push(ScopeIndex::new(command.scope(), settings)?);
                }
            }
        }

        let index = scopes
            .last()
            .expect("internal error - the scope stack must never be empty.");
        post_validate(&index.scope, current.tokens())?;
        groups.push(current);
        Ok(TokenizedArguments::new(groups, None))
    }
}

fn scan<'c>(
    index: &ScopeIndex<'c>,
    argument: &str,
    position: usize,
    input: &mut Input,
) -> Result<Step<'c>, TokenizeError> {
    if index.is_literal_separator(argument) {
        return Ok(Step::Literal);
    }

    if let Some(long) = index.match_long(argument) {
        return Ok(Step::Tokens(vec![long_option(
            index, long, argument, position, input,
        )?]));
    }

    if index.match_help(argument) {
        return Ok(Step::Help);
    }

    if let Some(tokens) = short_options(index, argument, position, input)? {
        return Ok(Step::Tokens(tokens));
    }

    if let Some(command) = index.match_command(argument) {
        return Ok(Step::Enter(command));
    }

    let settings = &index.settings;

    if index.is_option_like(argument) {
        if settings.throw_on_unknown_options() {
            return Err(TokenizeError::UnknownOption {
                argument: argument.to_string(),
                position,
            });
        }

        if settings.ignore_unknown_options() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Ignoring unknown option '{argument}' at position {position}.");
            }

            return Ok(Step::Skip);
        }
    } else if !index.scope.commands().is_empty() && index.scope.values().is_empty() {
        return Err(TokenizeError::UnknownCommand {
            argument: argument.to_string(),
            position,
        });
    }

    Ok(Step::Tokens(vec![ArgumentToken::Value(ValueToken::new(
        argument, position,
    ))]))
}

fn long_option<'c>(
    index: &ScopeIndex<'c>,
    long: LongMatch<'c>,
    argument: &str,
    position: usize,
    input: &mut Input,
) -> Result<ArgumentToken<'c>, TokenizeError> {
    let LongMatch {
        option,
        matched,
        inline,
        negated,
    } = long;
    let token = OptionToken::new(option, argument, position, matched).negated(negated);

    if !option.expected_range().takes_values() {
        if inline.is_some() {
            unexpected_key_value(index, option, argument, position)?;
        }

        return Ok(ArgumentToken::Option(token));
    }

    let key_value = inline.is_some();
    let values = collect_values(index, option, inline.into_iter().collect(), input)?;
    check_range(option, &values, argument, position)?;
    Ok(ArgumentToken::Option(token.with_values(values, key_value)))
}

fn short_options<'c>(
    index: &ScopeIndex<'c>,
    argument: &str,
    position: usize,
    input: &mut Input,
) -> Result<Option<Vec<ArgumentToken<'c>>>, TokenizeError> {
    let (entries, length) = match index.short_entries(argument) {
        Some(found) => found,
        None => return Ok(None),
    };
    let prefix = &argument[..length];
    let cluster = &argument[length..];
    let mut tokens = Vec::default();

    for (offset, c) in cluster.char_indices() {
        let entry = match entries.iter().find(|entry| entry.short == c) {
            Some(entry) => entry,
            None => {
                if index.settings.throw_on_unknown_short_options() {
                    return Err(TokenizeError::UnknownShortOption {
                        argument: argument.to_string(),
                        position,
                        character: c,
                    });
                }

                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Skipping unknown short option '{c}' in '{argument}'.");
                }

                continue;
            }
        };
        let option = entry.option;
        let remainder = &cluster[offset + c.len_utf8()..];
        let token = OptionToken::new(option, argument, position, format!("{prefix}{c}"))
            .negated(entry.negated);
        let separator = index
            .key_value_separators(option)
            .into_iter()
            .find(|separator| remainder.starts_with(separator.as_str()));

        if !option.expected_range().takes_values() {
            tokens.push(ArgumentToken::Option(token));

            if separator.is_some() {
                unexpected_key_value(index, option, argument, position)?;
                break;
            }

            continue;
        }

        let (inline, key_value) = match separator {
            Some(separator) => (Some(remainder[separator.len()..].to_string()), true),
            None if !remainder.is_empty() && index.immediate_value(option) => {
                (Some(remainder.to_string()), false)
            }
            None if !remainder.is_empty() => {
                // The rest of the cluster continues as options.
                check_range(option, &[], argument, position)?;
                tokens.push(ArgumentToken::Option(token));
                continue;
            }
            None => (None, false),
        };

        let values = collect_values(index, option, inline.into_iter().collect(), input)?;
        check_range(option, &values, argument, position)?;
        tokens.push(ArgumentToken::Option(token.with_values(values, key_value)));
        break;
    }

    if tokens.is_empty() {
        Ok(None)
    } else {
        Ok(Some(tokens))
    }
}

fn unexpected_key_value(
    index: &ScopeIndex,
    option: &OptionConfig,
    argument: &str,
    position: usize,
) -> Result<(), TokenizeError> {
    if index.settings.throw_on_unexpected_key_value() {
        return Err(TokenizeError::UnexpectedKeyValue {
            option: option.name().to_string(),
            argument: argument.to_string(),
            position,
        });
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Dropping the key-value of '{argument}' at position {position}.");
    }

    Ok(())
}

/// Collect the values following an option, up to its maximum.
/// Collection stops (and the lookahead is rolled back) at the first argument which looks like a new option, command, or literal separator.
fn collect_values(
    index: &ScopeIndex,
    option: &OptionConfig,
    mut values: Vec<String>,
    input: &mut Input,
) -> Result<Vec<String>, TokenizeError> {
    let range = option.expected_range();

    while range.is_open(values.len()) {
        if !input.move_next() {
            break;
        }

        let argument = match input.current() {
            Some((_, argument)) => argument.clone(),
            None => break,
        };

        if index.is_boundary(&argument) {
            input.rollback(1)?;
            break;
        }

        values.push(argument);
    }

    Ok(values)
}

fn check_range(
    option: &OptionConfig,
    values: &[String],
    argument: &str,
    position: usize,
) -> Result<(), TokenizeError> {
    let expected = option.expected_range();

    if expected.contains(values.len()) {
        Ok(())
    } else {
        Err(TokenizeError::ValueCountOutOfRange {
            option: option.name().to_string(),
            argument: argument.to_string(),
            position,
            expected,
            actual: values.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionGroup, SettingsOverride, ValueConfig, ValueCountRange};
    use rstest::rstest;

    fn tokenize<'c>(
        options: &'c [OptionConfig],
        values: &'c [ValueConfig],
        commands: &'c [Command],
        settings: &ParserSettings,
        args: &[&str],
    ) -> Result<TokenizedArguments<'c>, TokenizeError> {
        Tokenizer::new(settings, Scope::new(options, values, &[], commands)).tokenize(args)
    }

    // (name, matched, values, key_value, negated) or (value, position)
    fn describe(tokens: &[ArgumentToken]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| match token {
                ArgumentToken::Option(t) => format!(
                    "{}:{}:{:?}:{}:{}",
                    t.option().name(),
                    t.matched(),
                    t.values(),
                    t.is_key_value(),
                    t.is_negated()
                ),
                ArgumentToken::Value(t) => format!("value:{}@{}", t.argument(), t.position()),
            })
            .collect()
    }

    fn switches() -> Vec<OptionConfig> {
        vec![
            OptionConfig::new("a").short('a').long("a").switch(),
            OptionConfig::new("b").short('b').long("b").switch(),
            OptionConfig::new("c").short('c').long("c").switch(),
        ]
    }

    #[test]
    fn tokenize_empty() {
        // Setup
        let tokenizer = Tokenizer::new(&ParserSettings::default(), Scope::new(&[], &[], &[], &[]));

        let args: &[&str] = &[];

        // Execute
        let tokenized = tokenizer.tokenize(args).unwrap();

        // Verify
        assert_eq!(tokenized.groups().len(), 1);
        assert!(tokenized.root().tokens().is_empty());
        assert!(!tokenized.has_help_option());
    }

    #[test]
    fn short_cluster() {
        // Setup
        let options = switches();

        // Execute
        let tokenized = tokenize(&options, &[], &[], &ParserSettings::default(), &["-abc"]).unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec![
                "a:-a:[]:false:false",
                "b:-b:[]:false:false",
                "c:-c:[]:false:false",
            ]
        );
        assert!(tokenized
            .root()
            .tokens()
            .iter()
            .all(|t| t.argument() == "-abc" && t.position() == 1));
    }

    #[test]
    fn short_cluster_value_mid() {
        // Setup
        let options = vec![
            OptionConfig::new("a").short('a').values(ValueCountRange::exactly(1)),
            OptionConfig::new("b").short('b').switch(),
            OptionConfig::new("c").short('c').switch(),
        ];

        // Execute
        let tokenized = tokenize(&options, &[], &[], &ParserSettings::default(), &["-bac"]).unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec!["b:-b:[]:false:false", "a:-a:[\"c\"]:false:false"]
        );
    }

    #[rstest]
    #[case(vec!["-a=1"], "a:-a:[\"1\"]:true:false")]
    #[case(vec!["-a1"], "a:-a:[\"1\"]:false:false")]
    #[case(vec!["-a", "1"], "a:-a:[\"1\"]:false:false")]
    #[case(vec!["--a=4"], "a:--a:[\"4\"]:true:false")]
    #[case(vec!["--a", "4"], "a:--a:[\"4\"]:false:false")]
    #[case(vec!["--a="], "a:--a:[\"\"]:true:false")]
    #[case(vec!["--a", "-"], "a:--a:[\"-\"]:false:false")]
    fn option_value(#[case] args: Vec<&str>, #[case] expected: &str) {
        // Setup
        let options = vec![OptionConfig::new("a")
            .short('a')
            .long("a")
            .values(ValueCountRange::exactly(1))];

        // Execute
        let tokenized = tokenize(&options, &[], &[], &ParserSettings::default(), &args).unwrap();

        // Verify
        assert_eq!(describe(tokenized.root().tokens()), vec![expected]);
    }

    #[test]
    fn short_immediate_disabled() {
        // Setup
        let options = vec![
            OptionConfig::new("a")
                .short('a')
                .values(ValueCountRange::between(0, 1))
                .immediate_value(false),
            OptionConfig::new("b").short('b').switch(),
        ];

        // Execute
        let tokenized = tokenize(&options, &[], &[], &ParserSettings::default(), &["-ab", "x"]).unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec!["a:-a:[]:false:false", "b:-b:[]:false:false", "value:x@2"]
        );
    }

    #[test]
    fn literal_separator() {
        // Setup
        let options = switches();

        // Execute
        let tokenized = tokenize(
            &options,
            &[],
            &[],
            &ParserSettings::default(),
            &["--a", "--", "--b"],
        )
        .unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec!["a:--a:[]:false:false", "value:--b@3"]
        );
    }

    #[test]
    fn literal_separator_disabled() {
        // Setup
        let options = switches();
        let settings = ParserSettings::default().with_literal_separator(None);

        // Execute
        let tokenized = tokenize(&options, &[], &[], &settings, &["--", "--b"]).unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec!["value:--@1", "b:--b:[]:false:false"]
        );
    }

    #[rstest]
    #[case(vec!["--point", "1"], 1)]
    #[case(vec!["--point", "1", "-a"], 1)]
    #[case(vec!["--point", "1", "--"], 1)]
    #[case(vec!["--point"], 0)]
    fn value_count_out_of_range(#[case] args: Vec<&str>, #[case] actual: usize) {
        // Setup
        let options = vec![
            OptionConfig::new("point")
                .long("point")
                .values(ValueCountRange::exactly(2)),
            OptionConfig::new("a").short('a').switch(),
        ];

        // Execute
        let error = tokenize(&options, &[], &[], &ParserSettings::default(), &args).unwrap_err();

        // Verify
        assert_eq!(
            error,
            TokenizeError::ValueCountOutOfRange {
                option: "point".to_string(),
                argument: "--point".to_string(),
                position: 1,
                expected: ValueCountRange::exactly(2),
                actual,
            }
        );
    }

    #[test]
    fn value_count_out_of_range_position() {
        // Setup
        let options = vec![
            OptionConfig::new("point")
                .short('p')
                .values(ValueCountRange::exactly(2)),
            OptionConfig::new("a").short('a').switch(),
        ];

        // Execute
        let error = tokenize(
            &options,
            &[],
            &[],
            &ParserSettings::default(),
            &["-a", "-p", "1", "-a"],
        )
        .unwrap_err();

        // Verify
        assert_eq!(error.position(), Some(2));
    }

    #[test]
    fn values_unbounded() {
        // Setup
        let options = vec![
            OptionConfig::new("items")
                .long("items")
                .values(ValueCountRange::at_least(1)),
            OptionConfig::new("a").short('a').switch(),
        ];

        // Execute
        let tokenized = tokenize(
            &options,
            &[],
            &[],
            &ParserSettings::default(),
            &["--items=1", "2", "3", "-a", "4"],
        )
        .unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec![
                "items:--items:[\"1\", \"2\", \"3\"]:true:false",
                "a:-a:[]:false:false",
                "value:4@5",
            ]
        );
    }

    #[test]
    fn negated() {
        // Setup
        let options = vec![OptionConfig::new("color")
            .short('c')
            .long("color")
            .switch()
            .negate_long_prefix("--no-")
            .negate_short('C')];

        // Execute
        let tokenized = tokenize(
            &options,
            &[],
            &[],
            &ParserSettings::default(),
            &["--color", "--no-color", "-cC"],
        )
        .unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec![
                "color:--color:[]:false:false",
                "color:--no-color:[]:false:true",
                "color:-c:[]:false:false",
                "color:-C:[]:false:true",
            ]
        );
    }

    #[rstest]
    #[case(vec!["-x"], TokenizeError::UnknownShortOption { argument: "-x".to_string(), position: 1, character: 'x' })]
    #[case(vec!["-ax"], TokenizeError::UnknownShortOption { argument: "-ax".to_string(), position: 1, character: 'x' })]
    #[case(vec!["-a", "--x"], TokenizeError::UnknownOption { argument: "--x".to_string(), position: 2 })]
    #[case(vec!["--a=1"], TokenizeError::UnexpectedKeyValue { option: "a".to_string(), argument: "--a=1".to_string(), position: 1 })]
    #[case(vec!["-a=1"], TokenizeError::UnexpectedKeyValue { option: "a".to_string(), argument: "-a=1".to_string(), position: 1 })]
    fn tokenize_invalid(#[case] args: Vec<&str>, #[case] expected: TokenizeError) {
        // Setup
        let options = switches();

        // Execute
        let error = tokenize(&options, &[], &[], &ParserSettings::default(), &args).unwrap_err();

        // Verify
        assert_eq!(error, expected);
    }

    #[test]
    fn unknown_policies() {
        // Setup
        let options = switches();
        let pass_through = ParserSettings::default()
            .with_throw_on_unknown_options(false)
            .with_throw_on_unknown_short_options(false)
            .with_throw_on_unexpected_key_value(false);
        let ignore = pass_through.clone().with_ignore_unknown_options(true);
        let args = ["-axb", "--x", "-y", "--a=1", "v"];

        // Execute
        let passed = tokenize(&options, &[], &[], &pass_through, &args).unwrap();
        let ignored = tokenize(&options, &[], &[], &ignore, &args).unwrap();

        // Verify
        assert_eq!(
            describe(passed.root().tokens()),
            vec![
                "a:-a:[]:false:false",
                "b:-b:[]:false:false",
                "value:--x@2",
                "value:-y@3",
                "a:--a:[]:false:false",
                "value:v@5",
            ]
        );
        assert_eq!(
            describe(ignored.root().tokens()),
            vec![
                "a:-a:[]:false:false",
                "b:-b:[]:false:false",
                "a:--a:[]:false:false",
                "value:v@5",
            ]
        );
    }

    #[test]
    fn custom_short_prefix() {
        // Setup
        let options = vec![
            OptionConfig::new("xray").short('x').short_prefix("-b"),
            OptionConfig::new("x").short('x'),
            OptionConfig::new("b").short('b').switch(),
        ];

        // Execute
        let tokenized = tokenize(
            &options,
            &[],
            &[],
            &ParserSettings::default(),
            &["-bx", "-x", "-b"],
        )
        .unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec![
                "xray:-bx:[]:false:false",
                "x:-x:[]:false:false",
                "b:-b:[]:false:false",
            ]
        );
    }

    #[test]
    fn case_insensitive_long() {
        // Setup
        let options = vec![OptionConfig::new("name")
            .long("name")
            .values(ValueCountRange::exactly(1))];
        let settings = ParserSettings::default().with_long_name_case_insensitive(true);

        // Execute
        let tokenized = tokenize(&options, &[], &[], &settings, &["--NAME", "x"]).unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec!["name:--NAME:[\"x\"]:false:false"]
        );
    }

    #[test]
    fn commands() {
        // Setup
        let options = vec![OptionConfig::new("verbose").short('v').counter()];
        let commands = vec![Command::new("commit")
            .alias("ci")
            .option(OptionConfig::new("message").short('m').values(ValueCountRange::exactly(1)))
            .value(ValueConfig::starting_at("paths", 0))
            .settings(SettingsOverride::default().with_keep_first_value(true))];

        // Execute
        let tokenized = tokenize(
            &options,
            &[],
            &commands,
            &ParserSettings::default(),
            &["-v", "ci", "-m", "hello", "a.txt"],
        )
        .unwrap();

        // Verify
        assert_eq!(tokenized.command_path(), vec!["commit"]);
        let groups = tokenized.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(describe(groups[0].tokens()), vec!["verbose:-v:[]:false:false"]);
        assert!(!groups[0].settings().keep_first_value());
        assert_eq!(groups[1].command_argument(), Some("ci"));
        assert_eq!(groups[1].command_position(), Some(2));
        assert!(groups[1].settings().keep_first_value());
        assert_eq!(
            describe(groups[1].tokens()),
            vec!["message:-m:[\"hello\"]:false:false", "value:a.txt@5"]
        );
    }

    #[test]
    fn command_scope_replaces_declarations() {
        // Setup
        let options = vec![OptionConfig::new("verbose").short('v').switch()];
        let commands = vec![Command::new("run")];

        // Execute
        let error = tokenize(
            &options,
            &[],
            &commands,
            &ParserSettings::default(),
            &["run", "-v"],
        )
        .unwrap_err();

        // Verify
        assert_eq!(
            error,
            TokenizeError::UnknownOption {
                argument: "-v".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn command_ends_value_collection() {
        // Setup
        let options = vec![OptionConfig::new("items")
            .long("items")
            .values(ValueCountRange::at_least(0))];
        let commands = vec![Command::new("run")];

        // Execute
        let tokenized = tokenize(
            &options,
            &[],
            &commands,
            &ParserSettings::default(),
            &["--items", "a", "b", "run"],
        )
        .unwrap();

        // Verify
        assert_eq!(
            describe(tokenized.root().tokens()),
            vec!["items:--items:[\"a\", \"b\"]:false:false"]
        );
        assert_eq!(tokenized.command_path(), vec!["run"]);
    }

    #[test]
    fn unknown_command() {
        // Setup
        let commands = vec![Command::new("run")];

        // Execute
        let error = tokenize(&[], &[], &commands, &ParserSettings::default(), &["walk"]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            TokenizeError::UnknownCommand {
                argument: "walk".to_string(),
                position: 1,
            }
        );
    }

    #[test]
    fn unknown_command_absorbed_by_values() {
        // Setup
        let commands = vec![Command::new("run")];
        let values = vec![ValueConfig::at("target", 0)];

        // Execute
        let tokenized = tokenize(&[], &values, &commands, &ParserSettings::default(), &["walk"]).unwrap();

        // Verify
        assert_eq!(describe(tokenized.root().tokens()), vec!["value:walk@1"]);
    }

    #[rstest]
    #[case(vec!["-h"], vec![])]
    #[case(vec!["-a", "--help", "--unknown"], vec![])]
    #[case(vec!["-a", "run", "-h"], vec!["run"])]
    fn help(#[case] args: Vec<&str>, #[case] path: Vec<&str>) {
        // Setup
        let options = vec![OptionConfig::new("a").short('a').required()];
        let commands = vec![Command::new("run")];

        // Execute
        let tokenized = tokenize(&options, &[], &commands, &ParserSettings::default(), &args).unwrap();

        // Verify
        assert!(tokenized.has_help_option());
        let expected: Vec<String> = path.into_iter().map(str::to_string).collect();
        assert_eq!(tokenized.help_command_path(), Some(expected.as_slice()));
    }

    #[test]
    fn help_disabled() {
        // Setup
        let settings = ParserSettings::default().with_help_option(None);

        // Execute
        let error = tokenize(&[], &[], &[], &settings, &["--help"]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            TokenizeError::UnknownOption {
                argument: "--help".to_string(),
                position: 1,
            }
        );
    }

    #[test]
    fn group_mutual_exclusion() {
        // Setup
        let options = vec![
            OptionConfig::new("json").long("json").group("format"),
            OptionConfig::new("yaml").long("yaml").group("format"),
        ];
        let groups = vec![OptionGroup::at_most_one("format")];
        let settings = ParserSettings::default();
        let tokenizer = Tokenizer::new(&settings, Scope::new(&options, &[], &groups, &[]));

        // Execute & Verify
        tokenizer.tokenize(&["--json"]).unwrap();
        tokenizer.tokenize(&["--yaml"]).unwrap();
        assert_matches!(
            tokenizer.tokenize(&["--json", "--yaml"]),
            Err(TokenizeError::GroupMutuallyExclusive { .. })
        );
    }

    #[test]
    fn invalid_configuration() {
        // Setup
        let options = vec![
            OptionConfig::new("a").short('a'),
            OptionConfig::new("b").short('a'),
        ];

        // Execute
        let error = tokenize(&options, &[], &[], &ParserSettings::default(), &[]).unwrap_err();

        // Verify
        assert_matches!(error, TokenizeError::Config(_));
    }

    #[test]
    fn idempotent() {
        // Setup
        let options = vec![
            OptionConfig::new("a").short('a').values(ValueCountRange::between(1, 2)),
            OptionConfig::new("b").short('b').long("bee").switch(),
        ];
        let values = vec![ValueConfig::starting_at("rest", 0)];
        let commands = vec![Command::new("sub").option(OptionConfig::new("c").short('c').counter())];
        let settings = ParserSettings::default();
        let tokenizer = Tokenizer::new(&settings, Scope::new(&options, &values, &[], &commands));
        let args = ["-ba", "1", "2", "x", "--bee", "sub", "-cc", "--", "-z"];

        // Execute
        let first = tokenizer.tokenize(&args).unwrap();
        let second = tokenizer.tokenize(&args).unwrap();

        // Verify
        assert_eq!(first, second);
    }
}
