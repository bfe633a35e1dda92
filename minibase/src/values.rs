//! A definition of `IndexValue` trait.

use std::fmt::Debug;

/// A type usable as a value of an index.
///
/// Values are opaque payloads: the indexes never order, hash or otherwise
/// inspect them. The trait is blanket-implemented.
pub trait IndexValue: Clone + Debug {}

impl<T: Clone + Debug> IndexValue for T {}
