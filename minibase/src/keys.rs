//! A definition of `IndexKey` trait.

use std::fmt::Debug;
use std::hash::Hash;

/// A type usable as a key of an index.
///
/// Keys are totally ordered through [`Ord`]; equality is the one derived from
/// that order. The hashed index additionally feeds keys through [`Hash`] with
/// an unsigned reduction, so the same key type works with both index kinds.
///
/// The trait is blanket-implemented; there is nothing to implement manually.
///
/// [`Ord`]: https://doc.rust-lang.org/std/cmp/trait.Ord.html
/// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
pub trait IndexKey: Clone + Ord + Hash + Debug {}

impl<T: Clone + Ord + Hash + Debug> IndexKey for T {}
