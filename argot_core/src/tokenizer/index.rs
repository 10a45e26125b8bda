use crate::error::ConfigError;
use crate::model::{Command, OptionConfig, ParserSettings, Scope};
use crate::tokenizer::validate::validate_scope;
use crate::trie::Trie;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ShortEntry<'c> {
    pub(crate) short: char,
    pub(crate) option: &'c OptionConfig,
    pub(crate) negated: bool,
}

#[derive(Debug)]
struct LongEntry<'c> {
    prefix: String,
    name: String,
    option: &'c OptionConfig,
    negated: bool,
    case_insensitive: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LongMatch<'c> {
    pub(crate) option: &'c OptionConfig,
    pub(crate) matched: String,
    pub(crate) inline: Option<String>,
    pub(crate) negated: bool,
}

/// The resolved spellings of one scope, along with its settings snapshot.
#[derive(Debug)]
pub(crate) struct ScopeIndex<'c> {
    pub(crate) scope: Scope<'c>,
    pub(crate) settings: ParserSettings,
    short: Trie<ShortEntry<'c>>,
    long: Vec<LongEntry<'c>>,
    // Longest first.
    prefixes: Vec<String>,
}

fn equals(left: &str, right: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        left.eq_ignore_ascii_case(right)
    } else {
        left == right
    }
}

impl<'c> ScopeIndex<'c> {
    /// Validate the declarations of `scope`, and index their spellings.
    pub(crate) fn new(scope: Scope<'c>, settings: ParserSettings) -> Result<Self, ConfigError> {
        validate_scope(&scope, &settings)?;
        let mut short = Trie::default();
        let mut long = Vec::default();
        let mut prefixes = vec![
            settings.short_name_prefix().to_string(),
            settings.long_name_prefix().to_string(),
        ];

        for option in scope.options() {
            let short_prefix = option
                .short_name_prefix()
                .unwrap_or(settings.short_name_prefix());
            let entries = option
                .short_names()
                .iter()
                .map(|c| (*c, false))
                .chain(option.switch_negate_short_names().iter().map(|c| (*c, true)));

            for (c, negated) in entries {
                short
                    .add(
                        short_prefix,
                        ShortEntry {
                            short: c,
                            option,
                            negated,
                        },
                    )
                    .map_err(|error| ConfigError::InvalidOption {
                        name: option.name().to_string(),
                        reason: error.to_string(),
                    })?;
            }

            prefixes.push(short_prefix.to_string());

            let long_prefix = option
                .long_name_prefix()
                .unwrap_or(settings.long_name_prefix());
            let case_insensitive = option
                .long_name_case_insensitive()
                .unwrap_or(settings.long_name_case_insensitive());

            for name in option.long_names() {
                long.push(LongEntry {
                    prefix: long_prefix.to_string(),
                    name: name.clone(),
                    option,
                    negated: false,
                    case_insensitive,
                });

                if let Some(negate_prefix) = option.switch_negate_long_prefix() {
                    long.push(LongEntry {
                        prefix: negate_prefix.to_string(),
                        name: name.clone(),
                        option,
                        negated: true,
                        case_insensitive,
                    });
                }
            }

            prefixes.push(long_prefix.to_string());
        }

        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        prefixes.dedup();

        Ok(Self {
            scope,
            settings,
            short,
            long,
            prefixes,
        })
    }

    pub(crate) fn key_value_separators(&self, option: &OptionConfig) -> Vec<String> {
        option
            .key_value_separators()
            .unwrap_or(self.settings.key_value_separators())
            .to_vec()
    }

    pub(crate) fn immediate_value(&self, option: &OptionConfig) -> bool {
        option
            .short_name_immediate_value()
            .unwrap_or(self.settings.short_name_immediate_value())
    }

    /// Match `argument` against every long spelling (including negated ones).
    /// The name is compared up to the earliest key-value separator.
    pub(crate) fn match_long(&self, argument: &str) -> Option<LongMatch<'c>> {
        for entry in &self.long {
            let head = match argument.get(..entry.prefix.len()) {
                Some(head) => head,
                None => continue,
            };

            if !equals(head, &entry.prefix, entry.case_insensitive) {
                continue;
            }

            let rest = &argument[entry.prefix.len()..];
            let split = self
                .key_value_separators(entry.option)
                .iter()
                .filter_map(|separator| {
                    rest.find(separator.as_str())
                        .map(|offset| (offset, separator.len()))
                })
                .min_by_key(|(offset, _)| *offset);
            let (name, inline) = match split {
                Some((offset, length)) => (&rest[..offset], Some(rest[offset + length..].to_string())),
                None => (rest, None),
            };

            if equals(name, &entry.name, entry.case_insensitive) {
                return Some(LongMatch {
                    option: entry.option,
                    matched: argument[..entry.prefix.len() + name.len()].to_string(),
                    inline,
                    negated: entry.negated,
                });
            }
        }

        None
    }

    /// The short entries of the longest short prefix of `argument`, along with that prefix length.
    ///
    /// Arguments which start with a longer long prefix, or which consist of only the prefix, have no short entries.
    pub(crate) fn short_entries(&self, argument: &str) -> Option<(&[ShortEntry<'c>], usize)> {
        let mut query = argument;

        // A prefix must leave at least one character to match against (ex: `-b` with both `-` and `-b` prefixes).
        let (entries, length) = loop {
            let (entries, length) = self.short.get_values(query)?;

            if length < argument.len() {
                break (entries, length);
            }

            let last = query.chars().next_back()?;
            query = &query[..query.len() - last.len_utf8()];
        };

        let shadowed = self
            .long
            .iter()
            .map(|entry| entry.prefix.as_str())
            .chain(std::iter::once(self.settings.long_name_prefix()))
            .any(|prefix| prefix.len() > length && argument.starts_with(prefix));

        if shadowed {
            None
        } else {
            Some((entries, length))
        }
    }

    /// Whether `argument` is precisely one declared short spelling.
    fn claims_short(&self, argument: &str) -> bool {
        match self.short_entries(argument) {
            Some((entries, length)) => {
                let mut rest = argument[length..].chars();

                match (rest.next(), rest.next()) {
                    (Some(c), None) => entries.iter().any(|entry| entry.short == c),
                    _ => false,
                }
            }
            None => false,
        }
    }

    /// Whether `argument` is the standalone help option.
    pub(crate) fn match_help(&self, argument: &str) -> bool {
        let help = match self.settings.help_option() {
            Some(help) => help,
            None => return false,
        };
        let short_prefix = self.settings.short_name_prefix();
        let long_prefix = self.settings.long_name_prefix();

        let short = help.short_names().iter().any(|c| {
            argument.strip_prefix(short_prefix) == Some(c.to_string().as_str())
        });

        let long = argument
            .get(..long_prefix.len())
            .filter(|head| *head == long_prefix)
            .map(|_| &argument[long_prefix.len()..])
            .map_or(false, |name| {
                help.long_names().iter().any(|long| {
                    equals(name, long, self.settings.long_name_case_insensitive())
                })
            });

        (short && !self.claims_short(argument)) || (long && self.match_long(argument).is_none())
    }

    /// Whether `argument` matches a command of this scope.
    pub(crate) fn match_command(&self, argument: &str) -> Option<&'c Command> {
        self.scope
            .find_command(argument, self.settings.command_case_insensitive())
    }

    /// Whether `argument` is the literal separator.
    pub(crate) fn is_literal_separator(&self, argument: &str) -> bool {
        self.settings.literal_separator() == Some(argument)
    }

    /// Whether `argument` has the shape of an option: a known prefix followed by at least one character.
    pub(crate) fn is_option_like(&self, argument: &str) -> bool {
        self.prefixes
            .iter()
            .find(|prefix| argument.starts_with(prefix.as_str()))
            .map_or(false, |prefix| argument.len() > prefix.len())
    }

    /// Whether `argument` would end the value collection of an option.
    pub(crate) fn is_boundary(&self, argument: &str) -> bool {
        self.is_literal_separator(argument)
            || self.is_option_like(argument)
            || self.match_long(argument).is_some()
            || self.match_command(argument).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueCountRange;
    use rstest::rstest;

    fn options() -> Vec<OptionConfig> {
        vec![
            OptionConfig::new("apple").short('a').long("apple"),
            OptionConfig::new("banana")
                .short('b')
                .long("Banana")
                .case_insensitive(true)
                .values(ValueCountRange::exactly(1)),
            OptionConfig::new("color")
                .long("color")
                .switch()
                .negate_long_prefix("--no-")
                .negate_short('C'),
            OptionConfig::new("xray").short('x').short_prefix("-b"),
            OptionConfig::new("kv")
                .long("kv")
                .key_value_separator(":")
                .values(ValueCountRange::exactly(1)),
        ]
    }

    #[rstest]
    #[case("--apple", Some(("apple", "--apple", None, false)))]
    #[case("--apple=1", Some(("apple", "--apple", Some("1"), false)))]
    #[case("--apple=1=2", Some(("apple", "--apple", Some("1=2"), false)))]
    #[case("--APPLE", None)]
    #[case("--BANANA", Some(("banana", "--BANANA", None, false)))]
    #[case("--banana=", Some(("banana", "--banana", Some(""), false)))]
    #[case("--color", Some(("color", "--color", None, false)))]
    #[case("--no-color", Some(("color", "--no-color", None, true)))]
    #[case("--kv:x=y", Some(("kv", "--kv", Some("x=y"), false)))]
    #[case("--kv=x", None)]
    #[case("--appl", None)]
    #[case("-apple", None)]
    #[case("apple", None)]
    fn match_long(
        #[case] argument: &str,
        #[case] expected: Option<(&str, &str, Option<&str>, bool)>,
    ) {
        // Setup
        let options = options();
        let index = ScopeIndex::new(
            Scope::new(&options, &[], &[], &[]),
            ParserSettings::default(),
        )
        .unwrap();

        // Execute
        let result = index.match_long(argument);

        // Verify
        assert_eq!(
            result.map(|m| (
                m.option.name().to_string(),
                m.matched,
                m.inline,
                m.negated
            )),
            expected.map(|(name, matched, inline, negated)| (
                name.to_string(),
                matched.to_string(),
                inline.map(str::to_string),
                negated
            ))
        );
    }

    #[rstest]
    #[case("-a", Some(1))]
    #[case("-abC", Some(1))]
    #[case("-bx", Some(2))]
    #[case("-b", Some(1))]
    #[case("-bxa", Some(2))]
    #[case("-", None)]
    #[case("--apple", None)]
    #[case("a", None)]
    fn short_entries(#[case] argument: &str, #[case] expected: Option<usize>) {
        // Setup
        let options = options();
        let index = ScopeIndex::new(
            Scope::new(&options, &[], &[], &[]),
            ParserSettings::default(),
        )
        .unwrap();

        // Execute
        let result = index.short_entries(argument);

        // Verify
        assert_eq!(result.map(|(_, length)| length), expected);
    }

    #[rstest]
    #[case("-h", true)]
    #[case("--help", true)]
    #[case("--HELP", false)]
    #[case("-hh", false)]
    #[case("-a", false)]
    #[case("help", false)]
    fn match_help(#[case] argument: &str, #[case] expected: bool) {
        let options = options();
        let index = ScopeIndex::new(
            Scope::new(&options, &[], &[], &[]),
            ParserSettings::default(),
        )
        .unwrap();

        assert_eq!(index.match_help(argument), expected);
    }

    #[test]
    fn match_help_claimed() {
        // Setup
        let options = vec![
            OptionConfig::new("host").short('h'),
            OptionConfig::new("helper").long("help"),
        ];
        let index = ScopeIndex::new(
            Scope::new(&options, &[], &[], &[]),
            ParserSettings::default(),
        )
        .unwrap();

        // Execute & Verify
        assert!(!index.match_help("-h"));
        assert!(!index.match_help("--help"));
    }

    #[rstest]
    #[case("-", false)]
    #[case("--", false)]
    #[case("-1", true)]
    #[case("--x", true)]
    #[case("x-", false)]
    #[case("+x", false)]
    fn is_option_like(#[case] argument: &str, #[case] expected: bool) {
        let index = ScopeIndex::new(
            Scope::new(&[], &[], &[], &[]),
            ParserSettings::default(),
        )
        .unwrap();

        assert_eq!(index.is_option_like(argument), expected);
    }

    #[test]
    fn is_boundary() {
        // Setup
        let commands = vec![Command::new("run")];
        let index = ScopeIndex::new(
            Scope::new(&[], &[], &[], &commands),
            ParserSettings::default(),
        )
        .unwrap();

        // Execute & Verify
        assert!(index.is_boundary("--"));
        assert!(index.is_boundary("run"));
        assert!(index.is_boundary("-v"));
        assert!(!index.is_boundary("value"));
        assert!(!index.is_boundary("-"));
    }
}
