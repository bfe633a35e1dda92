//! An implementation of `Error` type.

use thiserror::Error;

/// The error type for operations on tables, indexes and selection predicates.
///
/// All errors are surfaced to the caller of the public operation that triggered
/// them; nothing is caught internally. Duplicate-key overwrites in the B+Tree
/// are deliberately *not* an error: they are reported on the logging facade and
/// counted by [`BPlusTree::overwrites`].
///
/// [`BPlusTree::overwrites`]: indexes/struct.BPlusTree.html#method.overwrites
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// `first_key` or `last_key` was requested from a tree or view that
    /// contains no keys.
    #[error("the map contains no keys")]
    Empty,

    /// A range view was requested with `from` greater than `to`.
    #[error("inconsistent range: `from` is greater than `to`")]
    InconsistentRange,

    /// A submap refinement would broaden the parent view.
    #[error("key out of range of the parent view")]
    KeyOutOfRange,

    /// The selection condition could not be evaluated: an operator with
    /// missing operands, a comparison with no attribute side, an unknown
    /// attribute or literal, or a leftover that is not a single Boolean.
    #[error("ill-formed predicate: {0}")]
    IllFormedPredicate(String),

    /// A tuple (or a schema pairing) does not match the expected domains.
    #[error("domain mismatch: {0}")]
    DomainMismatch(String),

    /// An attribute name outside the schema was used in a projection or join.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
}
