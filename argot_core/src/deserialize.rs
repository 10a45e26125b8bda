mod collection;
mod strategy;
mod value;

pub use collection::Stack;
pub use strategy::*;
pub use value::*;
