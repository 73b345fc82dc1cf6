//! Procedural macros that describe record shapes to the row mapper
//!
//! `#[derive(Record)]` generates the field list and the mutable field
//! handles the scanner writes through, `#[derive(Params)]` generates the
//! named-parameter view of a struct, and `#[record]` adds the usual derives
//! in one go.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod expand;
mod parsing;
mod record_macro;

use expand::{expand_params, expand_record};
use parsing::parse_record;
use record_macro::record_attribute;

/// Derive macro for the `Record` trait
///
/// Note: `#[record]` adds this derive together with `Debug`, `Clone` and
/// `Default`, which `Record` requires.
///
/// ```rust,ignore
/// #[derive(Debug, Default, Record)]
/// pub struct User {
///     #[column("id")]
///     pub user_id: i64,
///
///     // resolves to "name"
///     pub Name: String,
///
///     // never read from or bound to a query
///     #[column(skip)]
///     pub cached_avatar: Option<Vec<u8>>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let record = match parse_record(&input) {
        Ok(record) => record,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(expand_record(&record))
}

/// Derive macro for the `Params` trait
///
/// Every mapped field must be `Clone` and convertible into `Value`.
///
/// ```rust,ignore
/// #[derive(Params)]
/// pub struct NewUser {
///     pub name: String,
///     #[column("mail")]
///     pub email: String,
/// }
///
/// db.named_exec("INSERT INTO users (name, email) VALUES (:name, :mail)", &new_user).await?;
/// ```
#[proc_macro_derive(Params, attributes(column))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let record = match parse_record(&input) {
        Ok(record) => record,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(expand_params(&record))
}

/// Convenience attribute macro that adds all derives a mapped record needs
///
/// Usage:
/// ```rust,ignore
/// #[record]
/// pub struct User {
///     #[column("id")]
///     pub user_id: i64,
///     pub name: String,
/// }
///
/// // Also derive Params for binding the same struct to named queries
/// #[record(params)]
/// pub struct Tag {
///     pub label: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn record(attr: TokenStream, item: TokenStream) -> TokenStream {
    record_attribute(attr, item)
}
