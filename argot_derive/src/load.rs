mod attribute;
mod instance;
mod value_enum;

pub(self) fn invalid_target(span: proc_macro2::Span, macro_name: &str, target: &str) -> syn::Error {
    syn::Error::new(
        span,
        format!("Invalid - {macro_name} only applies to {target}."),
    )
}
