use alloc::vec::Vec;

use crate::graph::event::EventId;
use crate::history::types::Value;

/// Fatal input-invariant violation during graph construction.
///
/// These abort the check outright and are distinct from G1a/G1b, which are
/// findings reported alongside the constructed graph. A history that trips
/// one of these does not satisfy the checker's preconditions; no verdict
/// can be derived from it.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<K> {
    /// Two write events produced the same `(key, value)` pair. Each value
    /// must be written at most once per key (a "conflicting fork" history
    /// is unsupported by design, not resolved silently).
    DuplicateWrite {
        key: K,
        value: i64,
        ids: [EventId; 2],
    },
    /// A shorter read of a key is not a prefix of a longer one; once
    /// appended, a value can never disappear from later reads.
    NonPrefixRead {
        key: K,
        shorter: Vec<i64>,
        longer: Vec<i64>,
    },
    /// Register variant: the write log carries a key with no versions.
    BrokenWriteLog { key: K },
    /// A read observed a value of the wrong shape for the history variant
    /// (a scalar in a list-append history, a sequence in a register one).
    MalformedValue { id: EventId, value: Value },
    /// An operation reached construction without an ordinal index.
    MissingIndex,
}
