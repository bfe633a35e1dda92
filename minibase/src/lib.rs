//! Interfaces to work with in-memory relational data.
//!
//! # Tables
//!
//! A [`Table`] is a relation: an ordered set of typed attributes (a
//! [`Schema`]) with a designated primary key, an append-only store of
//! packed byte rows and an index over the primary key. Tuples are
//! validated on insertion, serialized through the byte [`codec`] and
//! registered in the index; the relational operators (`select`, `project`,
//! `union`, `minus`, `join`) derive new tables, using the index for the
//! equality-based lookups.
//!
//! # Indexes
//!
//! Two index structures are provided, interchangeable behind the narrow
//! [`Index`] interface:
//!
//! - [`BPlusTree`] keeps keys totally ordered with logarithmic point
//!   access, first/last keys and range subviews ([`SubMap`]) over
//!   half-open intervals.
//! - [`ExtHashMap`] hashes keys into a directory of power-of-two size that
//!   doubles as buckets fill, giving constant-time point access.
//!
//! Neither index supports deletion; capacity only grows.
//!
//! # Selection predicates
//!
//! Conditions such as `1979 < year & year < 1990` are whitespace-tokenized
//! infix expressions without parentheses. [`Predicate`] converts them to
//! postfix once and evaluates them against a schema and a tuple; see the
//! [`expr`] module for the token grammar and the precedence table.
//!
//! # `IndexKey` and `IndexValue` traits
//!
//! Index keys need a total order and a hash ([`IndexKey`]); values are
//! opaque ([`IndexValue`]). Both traits are blanket-implemented, so any
//! suitable type works out of the box — including [`KeyValue`], the
//! projection of a tuple onto its primary-key columns.
//!
//! # Typed rows
//!
//! The [`Record`] trait bridges plain structs and tuples; the
//! `minibase-derive` crate generates implementations with
//! `#[derive(Record)]`.
//!
//! [`Table`]: struct.Table.html
//! [`Schema`]: struct.Schema.html
//! [`codec`]: codec/index.html
//! [`Index`]: indexes/trait.Index.html
//! [`BPlusTree`]: indexes/struct.BPlusTree.html
//! [`ExtHashMap`]: indexes/struct.ExtHashMap.html
//! [`SubMap`]: indexes/struct.SubMap.html
//! [`Predicate`]: struct.Predicate.html
//! [`expr`]: expr/index.html
//! [`IndexKey`]: trait.IndexKey.html
//! [`IndexValue`]: trait.IndexValue.html
//! [`KeyValue`]: struct.KeyValue.html
//! [`Record`]: trait.Record.html

#![warn(
    missing_debug_implementations,
    unsafe_code,
    bare_trait_objects,
    missing_docs
)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    // Next `cast_*` lints don't give alternatives.
    clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss,
    // Next lints produce too much noise/false positives.
    clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate,
    // '... may panic' lints.
    clippy::indexing_slicing,
    // Too much work to fix.
    clippy::missing_errors_doc, clippy::missing_const_for_fn, clippy::missing_panics_doc
)]

// Re-exports for use in the derive macros.
#[doc(hidden)]
pub mod _reexports {
    pub use anyhow::Error;
}

pub use self::{
    error::Error,
    expr::Predicate,
    keys::IndexKey,
    options::{IndexKind, TableOptions},
    record::Record,
    records::{MemoryRecords, RecordList},
    schema::{Attribute, Domain, KeyValue, Schema, Tuple, Value, STRING_WIDTH},
    table::Table,
    values::IndexValue,
};
// Workaround for 'Linked file at path {minibase_path}/struct.BPlusTree.html
// does not exist!'
#[doc(no_inline)]
pub use self::indexes::{BPlusTree, Entries, ExtHashMap, Index, Keys, SubMap, Values};

pub mod codec;
mod error;
pub mod expr;
pub mod indexes;
mod keys;
mod options;
mod record;
mod records;
mod schema;
mod table;
mod values;

/// A specialized `Result` type for table and index operations.
pub type Result<T> = std::result::Result<T, Error>;
