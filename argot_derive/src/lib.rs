extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::{DeriveInstance, DeriveValueEnum};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

pub(crate) const MACRO_INSTANCE: &str = "Instance";
pub(crate) const MACRO_VALUE_ENUM: &str = "ValueEnum";

/// Implement `argot::Instance` for a struct with named fields.
///
/// Every field type must implement `argot::Slot`.
/// Fields are addressed by their identifier, unless renamed via `#[argot(name = "..")]`, or hidden via `#[argot(skip)]`.
/// The instance's type name defaults to the struct name, and may be set via `#[argot(type_name = "..")]`.
#[proc_macro_derive(Instance, attributes(argot))]
pub fn instance(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveInstance::try_from(input) {
        Ok(instance) => TokenStream2::from(instance).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// Implement `argot::ValueEnum`, `argot::ScalarSlot`, and `argot::Slot` for an enum of unit variants.
///
/// Variants are spelled by their identifier (matched case-insensitively), unless renamed via `#[argot(name = "..")]`.
#[proc_macro_derive(ValueEnum, attributes(argot))]
pub fn value_enum(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveValueEnum::try_from(input) {
        Ok(value_enum) => TokenStream2::from(value_enum).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
