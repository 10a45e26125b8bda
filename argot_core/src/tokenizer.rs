mod index;
mod scanner;
mod token;
pub(crate) mod validate;

pub use scanner::Tokenizer;
pub use token::*;
