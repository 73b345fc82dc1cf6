//! Parsing of record structs and their `#[column]` attributes
//!
//! Column names are resolved here exactly the way the runtime descriptor
//! builder resolves them, so a duplicate name is reported at compile time
//! instead of on the first query.

use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::{
    parse::Parse, parse::ParseStream, Attribute, Data, DeriveInput, Error, Fields, Generics,
    Ident, LitStr, Result,
};

mod kw {
    syn::custom_keyword!(skip);
}

/// Contents of one `#[column(...)]` attribute
///
/// Allowed syntax:
///
/// #[column("name")]
/// #[column(skip)]
#[derive(Debug, Default)]
struct ColumnAttr {
    name: Option<LitStr>,
    skip: bool,
}

impl Parse for ColumnAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut result = ColumnAttr::default();

        loop {
            let lookahead = input.lookahead1();

            if lookahead.peek(LitStr) {
                if result.name.is_some() {
                    return Err(Error::new(input.span(), "duplicate column name"));
                }
                result.name = Some(input.parse()?);
            } else if lookahead.peek(kw::skip) {
                let _: kw::skip = input.parse()?;
                result.skip = true;
            } else {
                return Err(lookahead.error());
            }

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }

        if result.skip && result.name.is_some() {
            return Err(Error::new(
                input.span(),
                "a skipped field cannot have a column name",
            ));
        }

        Ok(result)
    }
}

#[derive(Debug)]
pub struct FieldInfo {
    pub ident: Ident,
    /// Declared name without a raw-identifier prefix
    pub declared: String,
    pub column: Option<String>,
}

impl FieldInfo {
    /// Name the runtime descriptor will resolve this field to
    pub fn resolved_name(&self) -> String {
        match &self.column {
            Some(column) => column.clone(),
            None => self.declared.to_lowercase(),
        }
    }
}

#[derive(Debug)]
pub enum ShapeInfo {
    /// Mapped fields only, in declaration order
    Named(Vec<FieldInfo>),
    Tuple(usize),
    Unit,
}

#[derive(Debug)]
pub struct RecordInfo {
    pub ident: Ident,
    pub generics: Generics,
    pub shape: ShapeInfo,
}

pub fn parse_record(input: &DeriveInput) -> Result<RecordInfo> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "Record and Params can only be derived for structs",
            ))
        }
    };

    let shape = match &data.fields {
        Fields::Named(fields) => {
            let mut mapped = Vec::new();
            for field in &fields.named {
                let ident = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
                let attr = parse_column_attribute(&field.attrs)?;
                if attr.skip {
                    continue;
                }
                if let Some(name) = &attr.name {
                    validate_column_name_syn(&name.value(), name.span())?;
                }
                mapped.push(FieldInfo {
                    ident: ident.clone(),
                    declared: ident.unraw().to_string(),
                    column: attr.name.map(|name| name.value()),
                });
            }
            check_duplicate_names(&mapped)?;
            ShapeInfo::Named(mapped)
        }
        Fields::Unnamed(fields) => {
            for field in &fields.unnamed {
                if let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("column")) {
                    return Err(Error::new_spanned(
                        attr,
                        "#[column] requires a struct with named fields",
                    ));
                }
            }
            ShapeInfo::Tuple(fields.unnamed.len())
        }
        Fields::Unit => ShapeInfo::Unit,
    };

    Ok(RecordInfo {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        shape,
    })
}

fn parse_column_attribute(attrs: &[Attribute]) -> Result<ColumnAttr> {
    let mut found: Option<ColumnAttr> = None;

    for attr in attrs {
        if attr.path().is_ident("column") {
            if found.is_some() {
                return Err(Error::new_spanned(attr, "duplicate #[column] attribute"));
            }
            found = Some(attr.parse_args()?);
        }
    }

    Ok(found.unwrap_or_default())
}

/// Validate an explicit column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_column_name(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Column overrides are matched verbatim against driver-reported names, so
/// only names no driver can report are rejected.
fn validate_column_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.trim() != name {
        return Err("Name cannot start or end with whitespace".to_string());
    }

    if name.chars().any(char::is_control) {
        return Err("Name cannot contain control characters".to_string());
    }

    Ok(())
}

fn check_duplicate_names(fields: &[FieldInfo]) -> Result<()> {
    let mut seen: HashMap<String, &Ident> = HashMap::new();

    for field in fields {
        let name = field.resolved_name();
        if let Some(first) = seen.get(&name) {
            return Err(Error::new(
                field.ident.span(),
                format!(
                    "fields `{}` and `{}` both resolve to column `{}`",
                    first.unraw(),
                    field.declared,
                    name
                ),
            ));
        }
        seen.insert(name, &field.ident);
    }

    Ok(())
}
