use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Ident};

/// Expansion of `#[record]` and `#[record(params)]`
///
/// The derives are added to the struct as written; the `Record` and `Params`
/// names must be in scope at the use site (the prelude brings them in).
pub fn record_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let with_params = match parse_options(proc_macro2::TokenStream::from(attr)) {
        Ok(with_params) => with_params,
        Err(e) => return e.to_compile_error().into(),
    };

    let input = parse_macro_input!(item as DeriveInput);

    if !matches!(input.data, Data::Struct(_)) {
        return Error::new_spanned(&input.ident, "#[record] can only be used on structs")
            .to_compile_error()
            .into();
    }

    let derives = if with_params {
        quote! { #[derive(Debug, Clone, Default, Record, Params)] }
    } else {
        quote! { #[derive(Debug, Clone, Default, Record)] }
    };

    TokenStream::from(quote! {
        #derives
        #input
    })
}

/// Accepts an empty attribute or `params`
fn parse_options(attr: proc_macro2::TokenStream) -> syn::Result<bool> {
    if attr.is_empty() {
        return Ok(false);
    }

    let option: Ident = syn::parse2(attr)?;
    if option == "params" {
        Ok(true)
    } else {
        Err(Error::new_spanned(
            &option,
            format!("unknown record option `{}`, expected `params`", option),
        ))
    }
}
