use crate::load::invalid_target;
use crate::model::{DeriveField, DeriveInstance, DeriveValue, IntermediateAttributes};
use crate::MACRO_INSTANCE;
use proc_macro2::Literal;
use quote::ToTokens;
use std::collections::HashSet;

impl TryFrom<syn::DeriveInput> for DeriveInstance {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let struct_name = value.ident.clone();
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        let type_name = attributes
            .string("type_name", struct_name.span())?
            .unwrap_or_else(|| DeriveValue {
                tokens: Literal::string(&struct_name.to_string()).into_token_stream(),
            });

        let fields = match &value.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => &fields.named,
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Unit,
                ..
            }) => {
                return Ok(DeriveInstance {
                    struct_name,
                    type_name,
                    fields: Vec::default(),
                })
            }
            _ => {
                return Err(invalid_target(
                    struct_name.span(),
                    MACRO_INSTANCE,
                    "structs with named fields",
                ))
            }
        };

        let mut derived = Vec::default();
        let mut names = HashSet::new();

        for field in fields {
            if let Some(field) = DeriveField::load(field)? {
                let name = field.name.tokens.to_string();

                if !names.insert(name.clone()) {
                    return Err(syn::Error::new(
                        field.field_name.span(),
                        format!("Invalid - the name {name} is used by more than one field."),
                    ));
                }

                derived.push(field);
            }
        }

        Ok(DeriveInstance {
            struct_name,
            type_name,
            fields: derived,
        })
    }
}

impl DeriveField {
    fn load(value: &syn::Field) -> Result<Option<Self>, syn::Error> {
        let field_name = value
            .ident
            .clone()
            .expect("internal error - named fields must have an ident.");
        let attributes = IntermediateAttributes::collect(&value.attrs)?;

        if attributes.singletons.contains("skip") {
            if attributes.pairs.contains_key("name") {
                return Err(syn::Error::new(
                    field_name.span(),
                    "Invalid - a field cannot be both `#[argot(skip)]` and `#[argot(name = ..)]`.",
                ));
            }

            return Ok(None);
        }

        let name = attributes
            .string("name", field_name.span())?
            .unwrap_or_else(|| DeriveValue {
                tokens: Literal::string(&field_name.to_string()).into_token_stream(),
            });

        Ok(Some(DeriveField {
            field_name,
            name,
            field_type: DeriveValue {
                tokens: value.ty.to_token_stream(),
            },
        }))
    }
}
