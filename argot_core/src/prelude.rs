//! Traits which, typically, may be imported without concern: `use argot::prelude::*`.

pub use crate::instance::{Constructible, Instance, ScalarSlot, Slot, ValueEnum};

/// Behaviour for multiple (0 to many) items T to be collected together.
// Needs to be imported in order to implement a custom `Collectable`.
pub trait Collectable<T> {
    /// Add a value to this `Collectable`.
    fn add(&mut self, item: T);
}
