use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;

use crate::model::{DeriveValueEnum, DeriveVariant};

impl From<DeriveValueEnum> for TokenStream2 {
    fn from(value: DeriveValueEnum) -> Self {
        let DeriveValueEnum {
            enum_name,
            type_name,
            variants,
        } = value;
        let type_name = type_name.tokens;
        let mut names = Vec::default();
        let mut from_index = Vec::default();
        let mut index = Vec::default();

        for (i, DeriveVariant { variant_name, name }) in variants.into_iter().enumerate() {
            let i = Literal::usize_unsuffixed(i);
            names.push(name.tokens);
            from_index.push(quote! { #i => Some(#enum_name::#variant_name), });
            index.push(quote! { #enum_name::#variant_name => #i, });
        }

        quote! {
            impl ::argot::ValueEnum for #enum_name {
                fn enum_type() -> ::argot::EnumType {
                    ::argot::EnumType::of::<#enum_name>(#type_name, &[#( #names ),*])
                }

                fn from_index(index: usize) -> Option<Self> {
                    match index {
                        #( #from_index )*
                        _ => None,
                    }
                }

                fn index(&self) -> usize {
                    match *self {
                        #( #index )*
                    }
                }
            }

            impl ::argot::ScalarSlot for #enum_name {
                fn scalar_type() -> ::argot::ScalarType {
                    ::argot::ScalarType::Enum(<Self as ::argot::ValueEnum>::enum_type())
                }

                fn from_value(value: ::argot::Value) -> Result<Self, ::argot::Value> {
                    ::argot::enum_from_value(value)
                }

                fn to_value(&self) -> ::argot::Value {
                    ::argot::enum_to_value(self)
                }
            }

            impl ::argot::Slot for #enum_name {
                fn value_type() -> ::argot::ValueType {
                    ::argot::ValueType::Scalar(<Self as ::argot::ScalarSlot>::scalar_type())
                }

                fn get(&self) -> Option<::argot::Value> {
                    ::argot::scalar_get(self)
                }

                fn set(&mut self, value: ::argot::Value) -> Result<(), ::argot::SlotError> {
                    ::argot::scalar_set(self, value)
                }
            }
        }
    }
}
