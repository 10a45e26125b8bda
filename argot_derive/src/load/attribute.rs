use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;
use std::collections::{HashMap, HashSet};

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let expressions = value.parse_args_with(attributes_parser)?;
        let mut singletons = HashSet::default();
        let mut pairs: HashMap<String, Vec<DeriveValue>> = HashMap::default();

        for expression in expressions {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let left = assignment.left.to_token_stream();
                    pairs
                        .entry(left.to_string())
                        .or_default()
                        .push(DeriveValue {
                            tokens: assignment.right.to_token_stream(),
                        });
                }
                syn::Expr::Path(path) if path.path.get_ident().is_some() => {
                    if let Some(ident) = path.path.get_ident() {
                        singletons.insert(ident.to_string());
                    }
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        &other,
                        format!("Unparseable attribute: {}", other.to_token_stream()),
                    ));
                }
            };
        }

        Ok(Self { singletons, pairs })
    }
}

impl IntermediateAttributes {
    /// Merge every `#[argot(..)]` attribute of an item.
    pub(crate) fn collect(attributes: &[syn::Attribute]) -> Result<Self, syn::Error> {
        let mut merged = IntermediateAttributes::default();

        for attribute in attributes {
            if attribute.path().is_ident("argot") {
                let IntermediateAttributes { singletons, pairs } =
                    IntermediateAttributes::try_from(attribute)?;
                merged.singletons.extend(singletons);

                for (key, values) in pairs {
                    merged.pairs.entry(key).or_default().extend(values);
                }
            }
        }

        Ok(merged)
    }

    /// The last value of the pair `key`, which must be a string literal.
    pub(crate) fn string(
        &self,
        key: &str,
        span: proc_macro2::Span,
    ) -> Result<Option<DeriveValue>, syn::Error> {
        match self.pairs.get(key).and_then(|values| values.last()) {
            Some(value) => match syn::parse2::<syn::LitStr>(value.tokens.clone()) {
                Ok(_) => Ok(Some(value.clone())),
                Err(_) => Err(syn::Error::new(
                    span,
                    format!("Invalid - `{key}` must be a string literal."),
                )),
            },
            None => Ok(None),
        }
    }
}
