//! All available `minibase` indexes.
//!
//! Indexes are structures mapping primary keys to opaque values. Two kinds
//! are provided, both usable behind the narrow [`Index`] interface:
//!
//! - [`BPlusTree`] keeps keys ordered and supports first/last access and
//!   range subviews ([`SubMap`]) on top of point lookups.
//! - [`ExtHashMap`] is an extendible hash table for point lookups only; its
//!   directory grows by doubling as buckets fill up.
//!
//! [`Index`]: trait.Index.html
//! [`BPlusTree`]: struct.BPlusTree.html
//! [`ExtHashMap`]: struct.ExtHashMap.html
//! [`SubMap`]: struct.SubMap.html

pub use self::{
    btree::BPlusTree,
    exthash::ExtHashMap,
    iter::{Entries, Keys, Values},
    submap::SubMap,
};

mod btree;
mod exthash;
mod iter;
mod submap;

use crate::{keys::IndexKey, values::IndexValue};

/// The narrow interface shared by both index kinds.
///
/// `size` reports what the structure naturally counts: the B+Tree returns
/// its number of keys, while the extendible hash returns its slot capacity
/// (`SLOTS × nBuckets`); see [`ExtHashMap::population`] for the latter's
/// pair count.
///
/// [`ExtHashMap::population`]: struct.ExtHashMap.html#method.population
pub trait Index<K: IndexKey, V: IndexValue> {
    /// Returns the value mapped to `key`, if any.
    fn get(&self, key: &K) -> Option<&V>;

    /// Maps `key` to `value`, replacing any previous mapping.
    fn put(&mut self, key: K, value: V);

    /// Returns a snapshot of all entries, in no particular order.
    fn entries(&self) -> Entries<K, V>;

    /// Returns the structure's size measure (see the trait docs).
    fn size(&self) -> usize;
}
