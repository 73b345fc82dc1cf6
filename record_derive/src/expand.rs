//! Code generation for the `Record` and `Params` derives
//!
//! Generated code only names items through `field_map::`, so the derives work
//! from any crate that depends on `field_map` directly or through the
//! top-level `rowmap` re-export.

use proc_macro2::TokenStream;
use quote::quote;

use crate::parsing::{FieldInfo, RecordInfo, ShapeInfo};

fn field_defs(fields: &[FieldInfo]) -> Vec<TokenStream> {
    fields
        .iter()
        .map(|field| {
            let declared = &field.declared;
            match &field.column {
                Some(column) => quote! { field_map::FieldDef::renamed(#declared, #column) },
                None => quote! { field_map::FieldDef::new(#declared) },
            }
        })
        .collect()
}

/// Body of `record_type()` / `param_type()`
fn record_type_body(record: &RecordInfo) -> TokenStream {
    let type_name = record.ident.to_string();

    match &record.shape {
        ShapeInfo::Named(fields) => {
            let defs = field_defs(fields);
            quote! {
                const FIELDS: &[field_map::FieldDef] = &[#(#defs),*];
                field_map::RecordType::named(#type_name, FIELDS)
            }
        }
        ShapeInfo::Tuple(arity) => quote! {
            field_map::RecordType {
                name: #type_name,
                shape: field_map::Shape::Tuple(#arity),
            }
        },
        ShapeInfo::Unit => quote! {
            field_map::RecordType {
                name: #type_name,
                shape: field_map::Shape::Unit,
            }
        },
    }
}

pub fn expand_record(record: &RecordInfo) -> TokenStream {
    let name = &record.ident;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();
    let record_type = record_type_body(record);

    // Tuple and unit shapes never get a descriptor, so they expose no handles
    let handles = match &record.shape {
        ShapeInfo::Named(fields) => {
            let idents = fields.iter().map(|f| &f.ident);
            quote! {
                vec![#(&mut self.#idents as &mut dyn field_map::Scan),*]
            }
        }
        ShapeInfo::Tuple(_) | ShapeInfo::Unit => quote! { Vec::new() },
    };

    quote! {
        impl #impl_generics field_map::Record for #name #ty_generics #where_clause {
            fn record_type() -> field_map::RecordType {
                #record_type
            }

            fn fields_mut(&mut self) -> Vec<&mut dyn field_map::Scan> {
                #handles
            }
        }

        impl #impl_generics field_map::Element for #name #ty_generics #where_clause {
            type Record = Self;

            const KIND: field_map::ElementKind = field_map::ElementKind::Value;

            fn wrap(record: Self) -> Self {
                record
            }
        }
    }
}

pub fn expand_params(record: &RecordInfo) -> TokenStream {
    let name = &record.ident;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();
    let param_type = record_type_body(record);

    let values = match &record.shape {
        ShapeInfo::Named(fields) => {
            let idents = fields.iter().map(|f| &f.ident);
            quote! {
                vec![#(field_map::Value::from(::core::clone::Clone::clone(&self.#idents))),*]
            }
        }
        ShapeInfo::Tuple(_) | ShapeInfo::Unit => quote! { Vec::new() },
    };

    quote! {
        impl #impl_generics field_map::Params for #name #ty_generics #where_clause {
            fn param_type() -> field_map::RecordType {
                #param_type
            }

            fn param_values(&self) -> Vec<field_map::Value> {
                #values
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_record;
    use syn::{parse_quote, DeriveInput};

    fn render(tokens: TokenStream) -> String {
        tokens.to_string().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_record_lists_only_mapped_fields() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[column("id")]
                user_id: i64,
                name: String,
                #[column(skip)]
                scratch: u8,
            }
        };
        let output = render(expand_record(&parse_record(&input).unwrap()));

        assert!(output.contains("field_map :: FieldDef :: renamed (\"user_id\" , \"id\")"));
        assert!(output.contains("field_map :: FieldDef :: new (\"name\")"));
        assert!(output.contains("& mut self . user_id as & mut dyn field_map :: Scan"));
        assert!(!output.contains("scratch"));
        assert!(output.contains("field_map :: ElementKind :: Value"));
    }

    #[test]
    fn test_tuple_record_has_no_handles() {
        let input: DeriveInput = parse_quote! { struct Pair(i32, i32); };
        let output = render(expand_record(&parse_record(&input).unwrap()));

        assert!(output.contains("field_map :: Shape :: Tuple (2usize)"));
        assert!(output.contains("Vec :: new ()"));
    }

    #[test]
    fn test_params_clone_each_field_into_value() {
        let input: DeriveInput = parse_quote! {
            struct NewUser {
                name: String,
                #[column("mail")]
                email: String,
            }
        };
        let output = render(expand_params(&parse_record(&input).unwrap()));

        assert!(output.contains("impl field_map :: Params for NewUser"));
        assert!(output.contains(
            "field_map :: Value :: from (:: core :: clone :: Clone :: clone (& self . email))"
        ));
    }
}
