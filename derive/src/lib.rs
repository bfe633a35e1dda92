//! This crate provides macros for deriving some useful methods and traits for
//! the minibase.

#![recursion_limit = "128"]
#![deny(unsafe_code, bare_trait_objects)]
#![warn(missing_docs, missing_debug_implementations)]

extern crate proc_macro;

mod record;

use proc_macro::TokenStream;

/// Derives `Record` trait for a struct with named fields, mapping the struct
/// to a schema and its instances to tuples.
///
/// Every field becomes an attribute of the schema, in declaration order.
/// Supported field types and their domains: `i8`, `i16`, `i32`, `i64`,
/// `f32`, `f64`, `char` and `String` (the fixed-width string domain).
///
/// # Field Attributes
///
/// ## `key`
///
/// ```text
/// #[record(key)]
/// ```
///
/// Marks the field as part of the primary key. At least one field must be
/// marked; key columns keep their declaration order.
///
/// ## `rename`
///
/// ```text
/// #[record(rename = "name")]
/// ```
///
/// Overrides the attribute name used in the schema.
///
/// # Examples
///
/// ```ignore
/// use minibase::{Record, Table};
/// use minibase_derive::Record;
///
/// #[derive(Debug, Record)]
/// pub struct Movie {
///     #[record(key)]
///     pub title: String,
///     #[record(key)]
///     pub year: i16,
///     pub length: i32,
/// }
///
/// let mut table = Table::new("movie", Movie::schema());
/// table.insert(
///     Movie {
///         title: "Star_Wars".to_owned(),
///         year: 1977,
///         length: 124,
///     }
///     .to_tuple(),
/// )?;
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record(input: TokenStream) -> TokenStream {
    record::impl_record(input)
}
