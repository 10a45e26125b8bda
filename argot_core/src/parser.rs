mod interface;
mod middleware;

pub use interface::ErrorContext;
#[cfg(test)]
pub(crate) use interface::util;
pub(crate) use interface::UserInterface;
pub use middleware::{CommandLineParser, ErrorHandler, Parsed, ParsedInstance};
