//! Abstract settings for tables.

use serde::{Deserialize, Serialize};

/// Options for a table.
///
/// These parameters select and size the primary-key index backing the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct TableOptions {
    /// The index structure maintained over the primary key.
    ///
    /// Defaults to [`IndexKind::BTree`], which additionally supports ordered
    /// and range access through submap views.
    ///
    /// [`IndexKind::BTree`]: enum.IndexKind.html#variant.BTree
    pub index: IndexKind,
    /// Initial directory size of the extendible hash index, used when
    /// `index` is [`IndexKind::ExtHash`]. Must be a power of two ≥ 1.
    ///
    /// Defaults to `4`.
    ///
    /// [`IndexKind::ExtHash`]: enum.IndexKind.html#variant.ExtHash
    pub hash_directory_size: usize,
}

impl TableOptions {
    /// Creates a new `TableOptions` object.
    pub fn new(index: IndexKind, hash_directory_size: usize) -> Self {
        Self {
            index,
            hash_directory_size,
        }
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self::new(IndexKind::BTree, 4)
    }
}

/// Index structures available for the primary key of a table.
///
/// Both kinds answer point lookups; the B+Tree additionally keeps keys in
/// order, which enables `first_key`/`last_key` and range subviews.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Ordered index: a B+Tree of fanout 5.
    BTree,
    /// Hashed index: an extendible hash table with four slots per bucket.
    ExtHash,
}
