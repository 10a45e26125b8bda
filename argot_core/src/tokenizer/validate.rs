use std::collections::{HashMap, HashSet};

use crate::error::{ConfigError, TokenizeError};
use crate::model::{Command, OptionConfig, ParserSettings, Scope};
use crate::tokenizer::ArgumentToken;

/// Check the declarations of a single scope (not including nested commands).
pub(crate) fn validate_scope(scope: &Scope, settings: &ParserSettings) -> Result<(), ConfigError> {
    settings.validate()?;

    let mut names: HashSet<&str> = HashSet::default();

    for option in scope.options() {
        option.validate()?;

        if !names.insert(option.name()) {
            return Err(ConfigError::DuplicateOption(option.name().to_string()));
        }
    }

    for value in scope.values() {
        value.validate()?;

        if !names.insert(value.name()) {
            return Err(ConfigError::DuplicateValue(value.name().to_string()));
        }
    }

    validate_spellings(scope.options(), settings)?;

    let mut groups: HashSet<&str> = HashSet::default();

    for group in scope.groups() {
        group.validate()?;

        if !groups.insert(group.name()) {
            return Err(ConfigError::DuplicateGroup(group.name().to_string()));
        }
    }

    for option in scope.options() {
        for group in option.group_names() {
            if !groups.contains(group.as_str()) {
                return Err(ConfigError::UnknownGroup {
                    option: option.name().to_string(),
                    group: group.clone(),
                });
            }
        }
    }

    let mut values: Vec<_> = scope.values().iter().collect();
    values.sort_by_key(|value| value.start_index());

    for pair in values.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(ConfigError::OverlappingValues {
                first: pair[0].name().to_string(),
                second: pair[1].name().to_string(),
            });
        }
    }

    let mut spellings: HashMap<String, &str> = HashMap::default();

    for command in scope.commands() {
        command.validate()?;

        for spelling in command.spellings() {
            let key = if settings.command_case_insensitive() {
                spelling.to_lowercase()
            } else {
                spelling.to_string()
            };

            if let Some(first) = spellings.insert(key, command.name()) {
                return Err(ConfigError::DuplicateCommand {
                    spelling: spelling.to_string(),
                    first: first.to_string(),
                    second: command.name().to_string(),
                });
            }
        }
    }

    Ok(())
}

fn validate_spellings(options: &[OptionConfig], settings: &ParserSettings) -> Result<(), ConfigError> {
    let mut shorts: HashMap<String, &str> = HashMap::default();
    let mut longs: HashMap<String, &str> = HashMap::default();

    for option in options {
        let short_prefix = option
            .short_name_prefix()
            .unwrap_or(settings.short_name_prefix());

        for short in option
            .short_names()
            .iter()
            .chain(option.switch_negate_short_names())
        {
            let spelling = format!("{short_prefix}{short}");

            if let Some(first) = shorts.insert(spelling.clone(), option.name()) {
                return Err(ConfigError::DuplicateShortName {
                    spelling,
                    first: first.to_string(),
                    second: option.name().to_string(),
                });
            }
        }

        let case_insensitive = option
            .long_name_case_insensitive()
            .unwrap_or(settings.long_name_case_insensitive());
        let long_prefix = option
            .long_name_prefix()
            .unwrap_or(settings.long_name_prefix());
        let negated = option
            .switch_negate_long_prefix()
            .into_iter()
            .flat_map(|prefix| option.long_names().iter().map(move |name| (prefix, name)));

        for (prefix, long) in option
            .long_names()
            .iter()
            .map(|name| (long_prefix, name))
            .chain(negated)
        {
            let spelling = format!("{prefix}{long}");
            let key = if case_insensitive {
                spelling.to_lowercase()
            } else {
                spelling.clone()
            };

            if let Some(first) = longs.insert(key, option.name()) {
                return Err(ConfigError::DuplicateLongName {
                    spelling,
                    first: first.to_string(),
                    second: option.name().to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Check the declarations of the whole command tree rooted at `scope`.
pub(crate) fn validate_tree(scope: &Scope, settings: &ParserSettings) -> Result<(), ConfigError> {
    validate_scope(scope, settings)?;

    for command in scope.commands() {
        validate_command(command, settings)?;
    }

    Ok(())
}

fn validate_command(command: &Command, parent: &ParserSettings) -> Result<(), ConfigError> {
    let settings = parent.overlay(command.settings_override());
    validate_tree(&command.scope(), &settings)
}

/// Check the constraints over the options specified in a completed scope.
pub(crate) fn post_validate(scope: &Scope, tokens: &[ArgumentToken]) -> Result<(), TokenizeError> {
    let mut occurrences: HashMap<&str, Vec<usize>> = HashMap::default();

    for token in tokens {
        if let ArgumentToken::Option(token) = token {
            occurrences
                .entry(token.option().name())
                .or_default()
                .push(token.position());
        }
    }

    for option in scope.options() {
        if option.is_required() && !occurrences.contains_key(option.name()) {
            return Err(TokenizeError::RequiredOptionMissing(
                option.name().to_string(),
            ));
        }
    }

    for option in scope.options() {
        if option.is_unique() {
            if let Some(positions) = occurrences.get(option.name()) {
                if positions.len() > 1 {
                    return Err(TokenizeError::MultipleUniqueOption {
                        option: option.name().to_string(),
                        first: positions[0],
                        second: positions[1],
                    });
                }
            }
        }
    }

    for group in scope.groups() {
        let members: Vec<String> = scope
            .options()
            .iter()
            .filter(|option| option.group_names().iter().any(|g| g == group.name()))
            .map(|option| option.name().to_string())
            .collect();
        let specified: Vec<String> = members
            .iter()
            .filter(|member| occurrences.contains_key(member.as_str()))
            .cloned()
            .collect();

        if group.matches_count(specified.len(), members.len()) {
            continue;
        }

        if group.is_mutually_exclusive() && specified.len() > 1 {
            return Err(TokenizeError::GroupMutuallyExclusive {
                group: group.name().to_string(),
                options: specified,
            });
        }

        if group.is_required() && specified.is_empty() {
            return Err(TokenizeError::GroupRequired {
                group: group.name().to_string(),
                options: members,
            });
        }

        return Err(TokenizeError::GroupMismatch {
            group: group.name().to_string(),
            options: members,
            min: group.min(),
            max: group.max(),
            actual: specified.len(),
        });
    }

    Ok(())
}
