use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveField, DeriveInstance};

impl From<DeriveInstance> for TokenStream2 {
    fn from(value: DeriveInstance) -> Self {
        let DeriveInstance {
            struct_name,
            type_name,
            fields,
        } = value;
        let type_name = type_name.tokens;
        let mut has_name = Vec::default();
        let mut value_type = Vec::default();
        let mut get_value = Vec::default();
        let mut set_value = Vec::default();

        for DeriveField {
            field_name,
            name,
            field_type,
        } in fields
        {
            let name = name.tokens;
            let field_type = field_type.tokens;
            has_name.push(quote! { #name => true, });
            value_type.push(quote! {
                #name => Some(<#field_type as ::argot::Slot>::value_type()),
            });
            get_value.push(quote! {
                #name => ::argot::Slot::get(&self.#field_name),
            });
            set_value.push(quote! {
                #name => ::argot::Slot::set(&mut self.#field_name, value),
            });
        }

        quote! {
            impl ::argot::Instance for #struct_name {
                fn type_name(&self) -> &str {
                    #type_name
                }

                fn has_name(&self, name: &str) -> bool {
                    match name {
                        #( #has_name )*
                        _ => false,
                    }
                }

                fn value_type(&self, name: &str) -> Option<::argot::ValueType> {
                    match name {
                        #( #value_type )*
                        _ => None,
                    }
                }

                fn get_value(&self, name: &str) -> Option<::argot::Value> {
                    match name {
                        #( #get_value )*
                        _ => None,
                    }
                }

                #[allow(unused_variables)]
                fn set_value(&mut self, name: &str, value: ::argot::Value) -> Result<(), ::argot::SlotError> {
                    match name {
                        #( #set_value )*
                        _ => Err(::argot::SlotError::Missing(name.to_string())),
                    }
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeriveValue;
    use proc_macro2::{Literal, Span};
    use quote::ToTokens;

    #[test]
    fn render_instance_empty() {
        // Setup
        let instance = DeriveInstance {
            struct_name: ident("my_struct"),
            type_name: string("my_struct"),
            fields: vec![],
        };

        // Execute
        let token_stream = TokenStream2::from(instance);

        // Verify
        assert_eq!(
            simple_format(token_stream.to_string()),
            r#"impl :: argot :: Instance for my_struct {
 fn type_name (& self) -> & str {
 "my_struct" }
 fn has_name (& self , name : & str) -> bool {
 match name {
 _ => false , }
 }
 fn value_type (& self , name : & str) -> Option < :: argot :: ValueType > {
 match name {
 _ => None , }
 }
 fn get_value (& self , name : & str) -> Option < :: argot :: Value > {
 match name {
 _ => None , }
 }
 # [allow (unused_variables)] fn set_value (& mut self , name : & str , value : :: argot :: Value) -> Result < () , :: argot :: SlotError > {
 match name {
 _ => Err (:: argot :: SlotError :: Missing (name . to_string ())) , }
 }
 fn as_any (& self) -> & dyn :: std :: any :: Any {
 self }
 fn as_any_mut (& mut self) -> & mut dyn :: std :: any :: Any {
 self }
 }
"#,
        );
    }

    #[test]
    fn render_instance() {
        // Setup
        let instance = DeriveInstance {
            struct_name: ident("my_struct"),
            type_name: string("Args"),
            fields: vec![DeriveField {
                field_name: ident("my_field"),
                name: string("field"),
                field_type: DeriveValue {
                    tokens: quote! { Vec<u32> },
                },
            }],
        };

        // Execute
        let token_stream = TokenStream2::from(instance);

        // Verify
        let rendered = simple_format(token_stream.to_string());
        assert!(rendered.contains(r#""field" => true ,"#));
        assert!(rendered.contains(
            r#""field" => Some (< Vec < u32 > as :: argot :: Slot > :: value_type ()) ,"#
        ));
        assert!(rendered.contains(r#""field" => :: argot :: Slot :: get (& self . my_field) ,"#));
        assert!(rendered
            .contains(r#""field" => :: argot :: Slot :: set (& mut self . my_field , value) ,"#));
        assert!(rendered.contains(r#"fn type_name (& self) -> & str {
 "Args" }"#));
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }

    fn string(value: &str) -> DeriveValue {
        DeriveValue {
            tokens: Literal::string(value).into_token_stream(),
        }
    }

    fn simple_format(rust_str: String) -> String {
        rust_str
            .replace("{", "{\n")
            .replace("}", "}\n")
            .replace(";", ";\n")
    }
}
