//! Core module for `argot`: the declarative model, tokenizer, and deserialization pipeline.
//! See [documentation root](https://docs.rs/argot/latest/argot/index.html) for full details.
#![deny(missing_docs)]
mod buffer;
mod constant;
mod deserialize;
mod error;
mod factory;
mod instance;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod tokenizer;
mod trie;

pub use buffer::{BufferError, BufferedEnumerator};
pub use deserialize::*;
pub use error::*;
pub use factory::*;
pub use instance::*;
pub use model::*;
pub use parser::{CommandLineParser, ErrorContext, ErrorHandler, Parsed, ParsedInstance};
pub use prelude::Collectable;
pub use tokenizer::*;
pub use trie::{Trie, TrieError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
