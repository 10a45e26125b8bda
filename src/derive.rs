//! Derive Api for `argot` deserialization targets.
//!
//! ### Instances
//! Use `#[derive(Instance)]` on a struct with named fields to make it an [`Instance`](crate::Instance).
//! Each field becomes a property, whose type is inferred from the field's Rust type:
//! ```console
//! Rust type                                   | ValueType
//! ---------------------------------------------------------------------
//! bool, char, integers, floats, String, chrono  | Scalar
//! rust_decimal::Decimal                         | Scalar
//! T: ValueEnum (via #[derive(ValueEnum)])       | Scalar (enum)
//! T: Constructible (via constructible!)         | Scalar (custom)
//! Option<T>                                     | Optional
//! Vec<T>, Box<[T]>, VecDeque<T>, LinkedList<T>  | Collection
//! Stack<T>, HashSet<T>, BTreeSet<T>             | Collection
//! ```
//!
//! The following attributes configure the derivation:
//! * `#[argot(name = "..")]` on a field, to address the property by a name other than the field's identifier (ex: to match an [`OptionConfig`](crate::OptionConfig) name).
//! * `#[argot(skip)]` on a field, to hide it from deserialization.
//! * `#[argot(type_name = "..")]` on the struct, to set the instance's type name (used in error messages).
//!
//! ### Enums
//! Use `#[derive(ValueEnum)]` on an enum of unit variants to parse it from the Cli.
//! Variants are matched case-insensitively against their identifier, or the name given via `#[argot(name = "..")]`.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_derived.rs")]
//! ```
//!
//! ```console
//! $ exporter -vv x --format YML -- a.json b.json
//! verbosity: 2
//! ExportArgs { format: Some(Yaml), limit: None, paths: ["a.json", "b.json"] }
//!
//! $ exporter export --limit many
//! Parse error: Cannot assign '--limit' (position 2) to 'Limit': expected usize, found unconverted. Cannot convert 'many' into usize: invalid digit found in string
//! export --limit many
//!        ^
//! ```
pub use argot_derive::*;
