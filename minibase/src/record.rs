//! A bridge between plain Rust structs and schema-typed tuples.

use crate::schema::{Schema, Tuple};

/// A struct representable as a row of a fixed schema.
///
/// Implementations are normally generated with `#[derive(Record)]` from the
/// `minibase-derive` crate: every named field of a supported type (`i8`,
/// `i16`, `i32`, `i64`, `f32`, `f64`, `char`, `String`) becomes an
/// attribute, and fields marked `#[record(key)]` form the primary key.
pub trait Record: Sized {
    /// Returns the schema describing this record type, including its
    /// primary key.
    fn schema() -> Schema;

    /// Converts the record into a tuple of [`Self::schema`].
    ///
    /// [`Self::schema`]: #tymethod.schema
    fn to_tuple(&self) -> Tuple;

    /// Rebuilds a record from a tuple of [`Self::schema`].
    ///
    /// Fails when the tuple does not positionally match the schema of the
    /// record type.
    ///
    /// [`Self::schema`]: #tymethod.schema
    fn from_tuple(tuple: Tuple) -> anyhow::Result<Self>;
}
