use crate::load::invalid_target;
use crate::model::{DeriveValue, DeriveValueEnum, DeriveVariant, IntermediateAttributes};
use crate::MACRO_VALUE_ENUM;
use proc_macro2::Literal;
use quote::ToTokens;

impl TryFrom<syn::DeriveInput> for DeriveValueEnum {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let enum_name = value.ident.clone();
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        let type_name = attributes
            .string("type_name", enum_name.span())?
            .unwrap_or_else(|| DeriveValue {
                tokens: Literal::string(&enum_name.to_string()).into_token_stream(),
            });

        match &value.data {
            syn::Data::Enum(de) => {
                let variants = de
                    .variants
                    .iter()
                    .map(DeriveVariant::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DeriveValueEnum {
                    enum_name,
                    type_name,
                    variants,
                })
            }
            _ => Err(invalid_target(
                enum_name.span(),
                MACRO_VALUE_ENUM,
                "enums of unit variants",
            )),
        }
    }
}

impl TryFrom<&syn::Variant> for DeriveVariant {
    type Error = syn::Error;

    fn try_from(value: &syn::Variant) -> Result<Self, Self::Error> {
        let variant_name = value.ident.clone();

        if !matches!(value.fields, syn::Fields::Unit) {
            return Err(invalid_target(
                variant_name.span(),
                MACRO_VALUE_ENUM,
                "enums of unit variants",
            ));
        }

        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        let name = attributes
            .string("name", variant_name.span())?
            .unwrap_or_else(|| DeriveValue {
                tokens: Literal::string(&variant_name.to_string()).into_token_stream(),
            });

        Ok(DeriveVariant { variant_name, name })
    }
}
