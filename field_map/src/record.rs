//! Record shape traits
//!
//! These traits are normally implemented by `#[derive(Record)]` and
//! `#[derive(Params)]`. Hand-written impls must list fields in declaration
//! order and return handles in the same order from [`Record::fields_mut`].

use std::sync::Arc;
use type_mapping::{Scan, Value};

/// One mapped field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared field name
    pub ident: &'static str,
    /// Explicit column name override, used verbatim
    pub column: Option<&'static str>,
}

impl FieldDef {
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            column: None,
        }
    }

    pub const fn renamed(ident: &'static str, column: &'static str) -> Self {
        Self {
            ident,
            column: Some(column),
        }
    }
}

/// Field layout of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Struct with named fields, listed in declaration order
    Named(&'static [FieldDef]),
    /// Tuple struct with the given arity
    Tuple(usize),
    Unit,
}

/// Static description of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordType {
    pub name: &'static str,
    pub shape: Shape,
}

impl RecordType {
    pub const fn named(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            name,
            shape: Shape::Named(fields),
        }
    }
}

/// A type whose instances can be filled from result rows
pub trait Record: Default + Send + 'static {
    fn record_type() -> RecordType;

    /// Mutable handles to every mapped field, in declaration order
    fn fields_mut(&mut self) -> Vec<&mut dyn Scan>;
}

/// A type whose fields can be bound to named query parameters
pub trait Params: 'static {
    fn param_type() -> RecordType;

    /// Values of every mapped field, in declaration order
    fn param_values(&self) -> Vec<Value>;
}

/// How a populated record is stored in an output collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Owned copy (`Vec<R>`)
    Value,
    /// Heap allocation (`Vec<Box<R>>`)
    Boxed,
    /// Shared handle (`Vec<Arc<R>>`)
    Shared,
}

/// Element type of a collection the materializer can append to
pub trait Element: Send + Sized {
    type Record: Record;

    const KIND: ElementKind;

    fn wrap(record: Self::Record) -> Self;
}

impl<R: Record> Element for Box<R> {
    type Record = R;

    const KIND: ElementKind = ElementKind::Boxed;

    fn wrap(record: R) -> Self {
        Box::new(record)
    }
}

impl<R: Record + Sync> Element for Arc<R> {
    type Record = R;

    const KIND: ElementKind = ElementKind::Shared;

    fn wrap(record: R) -> Self {
        Arc::new(record)
    }
}
