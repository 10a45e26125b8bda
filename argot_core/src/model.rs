mod command;
mod group;
mod option;
mod settings;
mod value;

pub use command::*;
pub use group::*;
pub use option::*;
pub use settings::*;
pub use value::*;
