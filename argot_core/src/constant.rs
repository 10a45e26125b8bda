pub(crate) const DEFAULT_SHORT_NAME_PREFIX: &str = "-";
pub(crate) const DEFAULT_LONG_NAME_PREFIX: &str = "--";
pub(crate) const DEFAULT_KEY_VALUE_SEPARATOR: &str = "=";
pub(crate) const DEFAULT_LITERAL_SEPARATOR: &str = "--";
pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';

// One token of lookahead, plus the current token.
pub(crate) const LOOKAHEAD_BUFFER_SIZE: usize = 2;
